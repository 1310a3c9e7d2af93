//! Route Quoting
//!
//! Turns a token path into a fully quoted `Route` by chaining single-pool
//! simulations hop by hop.

use amm::calculator::calculate_spot_price;
use amm::{PoolStore, SwapEngine};
use dex_core::{RouteError, RouterConfig};
use tracing::debug;

use crate::state::{HopDetail, Route, RouteType};

/// Singleton gas model: one external call, per-hop computation only.
pub fn estimate_gas(config: &RouterConfig, hop_count: usize) -> u64 {
    config.base_gas + hop_count as u64 * config.per_hop_gas
}

/// Per-contract gas model: every hop re-pays the full call overhead.
pub fn estimate_regular_dex_gas(config: &RouterConfig, hop_count: usize) -> u64 {
    (config.base_gas + config.per_hop_gas) * hop_count.max(1) as u64
}

/// Quote a route by chaining `simulate` through each hop.
///
/// Returns `None` only when a consecutive pair has no pool. A hop that cannot
/// be simulated (e.g. a previous hop produced zero output) and guard-rail
/// violations do not discard the route; they land in `errors` and clear
/// `feasible`.
pub fn quote_route(
    store: &PoolStore,
    engine: &SwapEngine,
    config: &RouterConfig,
    path: &[String],
    amount_in: f64,
    slippage_tolerance_percent: f64,
) -> Option<Route> {
    if path.len() < 2 {
        return None;
    }

    let mut current_amount = amount_in;
    let mut hops = Vec::with_capacity(path.len() - 1);
    let mut pools = Vec::with_capacity(path.len() - 1);
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut total_fee = 0.0;
    let mut cumulative_price_impact = 0.0;

    for (index, pair) in path.windows(2).enumerate() {
        let (token_in, token_out) = (&pair[0], &pair[1]);

        let Some(pool) = store.find_pool_by_tokens(token_in, token_out) else {
            debug!("No pool for {} -> {}, discarding path", token_in, token_out);
            return None;
        };

        let simulated = engine.simulate(
            pool,
            token_in,
            current_amount,
            0.0,
            slippage_tolerance_percent,
        );
        let quote = match simulated {
            Ok(q) => q,
            Err(e) => {
                // Keep the route with its diagnostics; the hop moves nothing.
                debug!("Hop {} via {} not quotable: {}", index + 1, pool.id, e);
                errors.push(format!("hop {} ({}): {}", index + 1, pool.id, e));
                let (reserve_in, reserve_out) = pool.reserves_for(token_in).unwrap_or_default();
                let spot = calculate_spot_price(reserve_in, reserve_out);
                pools.push(pool.id.clone());
                hops.push(HopDetail {
                    pool_id: pool.id.clone(),
                    token_in: token_in.clone(),
                    token_out: token_out.clone(),
                    amount_in: current_amount,
                    amount_out: 0.0,
                    fee: 0.0,
                    price_impact_percent: 0.0,
                    price_before: spot,
                    price_after: spot,
                });
                current_amount = 0.0;
                continue;
            }
        };

        for w in &quote.warnings {
            warnings.push(format!("hop {} ({}): {}", index + 1, pool.id, w));
        }
        for e in &quote.errors {
            errors.push(format!("hop {} ({}): {}", index + 1, pool.id, e));
        }

        total_fee += quote.fee;
        cumulative_price_impact += quote.price_impact_percent;
        pools.push(pool.id.clone());
        hops.push(HopDetail {
            pool_id: pool.id.clone(),
            token_in: quote.token_in.clone(),
            token_out: quote.token_out.clone(),
            amount_in: current_amount,
            amount_out: quote.expected_out,
            fee: quote.fee,
            price_impact_percent: quote.price_impact_percent,
            price_before: quote.price_before,
            price_after: quote.price_after,
        });

        current_amount = quote.expected_out;
    }

    let hop_count = hops.len();
    let route_id = path.join("->");
    let hops_clean = errors.is_empty();

    if cumulative_price_impact > config.max_route_impact_percent {
        errors.push(
            RouteError::InfeasibleRoute {
                route_id: route_id.clone(),
                impact: cumulative_price_impact,
                max_impact: config.max_route_impact_percent,
            }
            .to_string(),
        );
    } else if cumulative_price_impact > slippage_tolerance_percent {
        warnings.push(format!(
            "Cumulative price impact {:.4}% exceeds slippage tolerance {}%",
            cumulative_price_impact, slippage_tolerance_percent
        ));
    }

    let feasible = hops_clean && cumulative_price_impact <= config.max_route_impact_percent;

    Some(Route {
        route_id,
        path: path.to_vec(),
        pools,
        hop_count,
        route_type: RouteType::for_hops(hop_count),
        amount_in,
        expected_out: current_amount,
        cumulative_price_impact,
        hops,
        gas_estimate: estimate_gas(config, hop_count),
        total_fee,
        feasible,
        warnings,
        errors,
        recommended: false,
        reason: None,
        slippage_tolerance_percent,
    })
}
