//! Route Selection
//!
//! Picks the best route from a quoted candidate set and compares the direct
//! route against the best multi-hop alternative.

use dex_core::{ComparisonConfig, RouterConfig};
use tracing::{debug, warn};

use crate::evaluator::{estimate_gas, estimate_regular_dex_gas};
use crate::state::{ComparisonReport, GasComparison, Recommendation, Route, RouteType};

/// Highest `expected_out`; the first route wins ties.
fn index_of_best<'a>(routes: impl Iterator<Item = (usize, &'a Route)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, route) in routes {
        match best {
            Some((_, out)) if route.expected_out <= out => {}
            _ => best = Some((i, route.expected_out)),
        }
    }
    best.map(|(i, _)| i)
}

/// Mark and return the best route.
///
/// Feasible routes are preferred. When none is feasible the highest-output
/// route overall is returned as a best-effort pick, so the result is only
/// `None` for an empty candidate set.
pub fn select_best(routes: &mut [Route]) -> Option<&Route> {
    for route in routes.iter_mut() {
        route.recommended = false;
        route.reason = None;
    }

    let feasible = index_of_best(routes.iter().enumerate().filter(|(_, r)| r.feasible));
    let (index, reason) = match feasible {
        Some(i) => {
            let reason = format!(
                "Highest output among feasible routes: {:.6} {}",
                routes[i].expected_out,
                routes[i].path.last().map(String::as_str).unwrap_or_default()
            );
            (i, reason)
        }
        None => {
            let i = index_of_best(routes.iter().enumerate())?;
            warn!(
                "No feasible route among {}; falling back to {}",
                routes.len(),
                routes[i].route_id
            );
            let reason = format!(
                "No feasible route; best-effort pick with highest output {:.6}",
                routes[i].expected_out
            );
            (i, reason)
        }
    };

    let best = &mut routes[index];
    best.recommended = true;
    best.reason = Some(reason);
    debug!("Selected route {}", best);
    Some(&*best)
}

/// Singleton vs per-contract gas for a route of `hop_count` hops.
pub fn compare_gas(config: &RouterConfig, hop_count: usize) -> GasComparison {
    let singleton_gas = estimate_gas(config, hop_count);
    let regular_dex_gas_equivalent = estimate_regular_dex_gas(config, hop_count);
    let gas_saved = regular_dex_gas_equivalent.saturating_sub(singleton_gas);
    let gas_saved_percent = if regular_dex_gas_equivalent > 0 {
        gas_saved as f64 / regular_dex_gas_equivalent as f64 * 100.0
    } else {
        0.0
    };

    GasComparison {
        singleton_gas,
        regular_dex_gas_equivalent,
        gas_saved,
        gas_saved_percent,
    }
}

/// Compare the direct route against the best feasible multi-hop route.
///
/// Returns `None` for an empty candidate set.
pub fn compare_direct_vs_multi_hop(
    routes: &[Route],
    router_config: &RouterConfig,
    thresholds: &ComparisonConfig,
) -> Option<ComparisonReport> {
    let mut candidates = routes.to_vec();
    let best_route = select_best(&mut candidates)?.clone();

    let direct_route = candidates.iter().find(|r| r.is_direct()).cloned();
    let best_multi_hop_route = index_of_best(
        candidates
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_direct() && r.feasible),
    )
    .map(|i| candidates[i].clone());

    let mut output_diff = 0.0;
    let mut output_diff_percent = 0.0;
    let mut impact_diff = 0.0;
    let mut gas_diff = 0i64;

    let (recommendation, recommendation_reason) = match (&direct_route, &best_multi_hop_route) {
        (Some(direct), Some(multi)) => {
            output_diff = multi.expected_out - direct.expected_out;
            output_diff_percent = if direct.expected_out > 0.0 {
                output_diff / direct.expected_out * 100.0
            } else {
                0.0
            };
            impact_diff = multi.cumulative_price_impact - direct.cumulative_price_impact;
            gas_diff = multi.gas_estimate as i64 - direct.gas_estimate as i64;

            if output_diff_percent > thresholds.output_advantage_percent {
                (
                    Recommendation::MultiHop,
                    format!(
                        "Multi-hop returns {:.2}% more output than direct",
                        output_diff_percent
                    ),
                )
            } else if gas_diff > thresholds.gas_penalty_threshold as i64 {
                (
                    Recommendation::Direct,
                    format!(
                        "Multi-hop costs {} more gas for only {:.2}% more output",
                        gas_diff, output_diff_percent
                    ),
                )
            } else if impact_diff < -thresholds.impact_advantage_points {
                (
                    Recommendation::MultiHop,
                    format!(
                        "Multi-hop has {:.2} points lower price impact",
                        -impact_diff
                    ),
                )
            } else if multi.expected_out > direct.expected_out {
                (
                    Recommendation::MultiHop,
                    "Multi-hop returns slightly more output".to_string(),
                )
            } else {
                (
                    Recommendation::Direct,
                    "Direct returns at least as much output".to_string(),
                )
            }
        }
        (Some(_), None) => (
            Recommendation::Direct,
            "No feasible multi-hop route".to_string(),
        ),
        (None, Some(_)) => (
            Recommendation::MultiHop,
            "No direct pool for this pair".to_string(),
        ),
        (None, None) => (
            match best_route.route_type {
                RouteType::Direct => Recommendation::Direct,
                RouteType::MultiHop => Recommendation::MultiHop,
            },
            "No direct pool and no feasible multi-hop route; best-effort route only".to_string(),
        ),
    };

    let gas = compare_gas(router_config, best_route.hop_count);

    Some(ComparisonReport {
        best_route,
        direct_route,
        best_multi_hop_route,
        output_diff,
        output_diff_percent,
        impact_diff,
        gas_diff,
        recommendation,
        recommendation_reason,
        gas,
    })
}
