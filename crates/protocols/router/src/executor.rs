//! Multi-Hop Execution
//!
//! Executes a quoted route hop by hop against the pool store. Each hop
//! consumes the previous hop's realized output, so execution can diverge
//! from the quote when reserves moved in between.
//!
//! Hops are not rolled back: a failure part-way through leaves the earlier
//! hops applied, and a failed end-to-end minimum-output check leaves every
//! hop applied.

use std::time::Instant;

use amm::{PoolStore, SwapEngine};
use dex_core::PoolError;
use tracing::{debug, info, warn};

use crate::state::{AutoSwapResult, HopExecution, Route};

/// Execute `route`, then check the final realized output against
/// `min_amount_out`.
pub fn execute_route(
    store: &mut PoolStore,
    engine: &SwapEngine,
    route: &Route,
    min_amount_out: f64,
    recipient: &str,
) -> AutoSwapResult {
    let started = Instant::now();
    let gas_per_hop = route.gas_estimate / route.hop_count.max(1) as u64;

    let mut result = AutoSwapResult {
        success: false,
        route_id: route.route_id.clone(),
        path: route.path.clone(),
        recipient: recipient.to_string(),
        amount_in: route.amount_in,
        expected_out: route.expected_out,
        amount_out: 0.0,
        min_amount_out,
        hops: Vec::with_capacity(route.hops.len()),
        total_fee: 0.0,
        gas_used: 0,
        execution_time_ms: 0.0,
        error: None,
    };

    if route.hops.is_empty() {
        result.error = Some(format!("Route {} has no hops", route.route_id));
        return finish(result, started);
    }

    let mut current_amount = route.amount_in;

    for (index, hop) in route.hops.iter().enumerate() {
        let executed = engine.execute(
            store,
            &hop.pool_id,
            &hop.token_in,
            current_amount,
            0.0,
            route.slippage_tolerance_percent,
        );

        let record = match executed {
            Ok(record) if record.success => record,
            Ok(record) => {
                let reason = record.error.unwrap_or_default();
                return abort(result, started, index, &hop.pool_id.to_string(), &reason);
            }
            Err(e) => {
                return abort(result, started, index, &hop.pool_id.to_string(), &e.to_string());
            }
        };

        debug!(
            "Hop {} via {}: {} {} -> {} {}",
            index + 1,
            hop.pool_id,
            current_amount,
            record.quote.token_in,
            record.amount_out(),
            record.quote.token_out
        );

        current_amount = record.amount_out();
        result.total_fee += record.quote.fee;
        result.gas_used += gas_per_hop;
        result.hops.push(HopExecution {
            hop_index: index,
            swap_id: record.swap_id,
            pool_id: hop.pool_id.clone(),
            token_in: record.quote.token_in,
            token_out: record.quote.token_out,
            amount_in: record.quote.amount_in,
            amount_out: current_amount,
            fee: record.quote.fee,
            price_impact_percent: record.quote.price_impact_percent,
            gas_used: gas_per_hop,
        });
    }

    result.amount_out = current_amount;

    if current_amount < min_amount_out {
        let error = PoolError::MinimumOutputNotMet {
            got: current_amount,
            min: min_amount_out,
        };
        warn!(
            "Route {} executed all {} hops but failed the final check: {}",
            route.route_id,
            result.hops.len(),
            error
        );
        result.error = Some(error.to_string());
        return finish(result, started);
    }

    result.success = true;
    info!(
        "Route {} executed: {} {} -> {:.6} {} (quoted {:.6})",
        route.route_id,
        route.amount_in,
        route.path.first().map(String::as_str).unwrap_or_default(),
        current_amount,
        route.path.last().map(String::as_str).unwrap_or_default(),
        route.expected_out
    );
    finish(result, started)
}

fn abort(
    mut result: AutoSwapResult,
    started: Instant,
    hop_index: usize,
    pool_id: &str,
    reason: &str,
) -> AutoSwapResult {
    warn!(
        "Route {} aborted at hop {} ({}): {}",
        result.route_id,
        hop_index + 1,
        pool_id,
        reason
    );
    result.amount_out = 0.0;
    result.error = Some(format!("Hop {} ({}) failed: {}", hop_index + 1, pool_id, reason));
    finish(result, started)
}

fn finish(mut result: AutoSwapResult, started: Instant) -> AutoSwapResult {
    result.execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    result
}
