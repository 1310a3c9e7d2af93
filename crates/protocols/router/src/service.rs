//! Router Operations
//!
//! Validated entry points combining path search, quoting, selection and
//! execution against a caller-owned `PoolStore`.

use std::time::Instant;

use amm::{PoolStore, SwapEngine};
use dex_core::{normalize_symbol, symbol_violation, EngineConfig, RouteError};
use tracing::{debug, info};

use crate::evaluator::quote_route;
use crate::executor::execute_route;
use crate::path_finder::{build_token_graph, find_paths};
use crate::selector::{compare_direct_vs_multi_hop, select_best};
use crate::state::{
    AutoSwapParams, AutoSwapResult, ComparisonReport, Route, RouteSearchSummary, SearchOptions,
};

/// Multi-hop router over a shared pool store.
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: EngineConfig,
    engine: SwapEngine,
}

/// A validated route request.
struct RouteRequest {
    token_in: String,
    token_out: String,
    amount_in: f64,
    max_hops: usize,
    slippage_tolerance_percent: f64,
}

impl Router {
    pub fn new(config: EngineConfig) -> Self {
        let engine = SwapEngine::new(config.swap.clone());
        Self { config, engine }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &SwapEngine {
        &self.engine
    }

    /// Find and quote every route from `token_in` to `token_out`.
    ///
    /// Routes come back ordered by expected output (highest first) with the
    /// best one marked `recommended`.
    pub fn find_all_routes(
        &self,
        store: &PoolStore,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<Vec<Route>, RouteError> {
        let request = self.validate(store, token_in, token_out, amount_in, options)?;

        let graph = build_token_graph(store);
        let paths = find_paths(
            &graph,
            &request.token_in,
            &request.token_out,
            request.max_hops,
            self.config.router.max_routes,
        );

        let mut routes: Vec<Route> = paths
            .iter()
            .filter_map(|path| {
                quote_route(
                    store,
                    &self.engine,
                    &self.config.router,
                    path,
                    request.amount_in,
                    request.slippage_tolerance_percent,
                )
            })
            .collect();

        if routes.is_empty() {
            return Err(RouteError::NoRouteFound {
                token_in: request.token_in,
                token_out: request.token_out,
            });
        }

        routes.sort_by(|a, b| b.expected_out.total_cmp(&a.expected_out));
        select_best(&mut routes);

        debug!(
            "{} routes {} -> {} for {} (from {} paths)",
            routes.len(),
            request.token_in,
            request.token_out,
            request.amount_in,
            paths.len()
        );
        Ok(routes)
    }

    /// Compare the direct route against the best multi-hop route.
    pub fn compare_routes(
        &self,
        store: &PoolStore,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<ComparisonReport, RouteError> {
        let routes = self.find_all_routes(store, token_in, token_out, amount_in, options)?;
        compare_direct_vs_multi_hop(&routes, &self.config.router, &self.config.comparison).ok_or_else(
            || RouteError::NoRouteFound {
                token_in: normalize_symbol(token_in),
                token_out: normalize_symbol(token_out),
            },
        )
    }

    /// Route search with a breakdown by hop count. An empty result is not an
    /// error here.
    pub fn search_routes(
        &self,
        store: &PoolStore,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<RouteSearchSummary, RouteError> {
        let started = Instant::now();
        let routes = match self.find_all_routes(store, token_in, token_out, amount_in, options) {
            Ok(routes) => routes,
            Err(RouteError::NoRouteFound { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };

        let count_hops = |n: usize| routes.iter().filter(|r| r.hop_count == n).count();
        let direct_count = count_hops(1);
        let two_hop_count = count_hops(2);
        let three_hop_count = count_hops(3);

        Ok(RouteSearchSummary {
            total_routes: routes.len(),
            direct_count,
            two_hop_count,
            three_hop_count,
            routes,
            search_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Find the best route and execute it.
    ///
    /// Refuses to execute when even the best route is infeasible.
    pub fn auto_swap(
        &self,
        store: &mut PoolStore,
        params: &AutoSwapParams,
    ) -> Result<AutoSwapResult, RouteError> {
        if !params.min_amount_out.is_finite() || params.min_amount_out < 0.0 {
            return Err(RouteError::validation(format!(
                "min_amount_out must be non-negative and finite (got {})",
                params.min_amount_out
            )));
        }

        let mut routes = self.find_all_routes(
            store,
            &params.token_in,
            &params.token_out,
            params.amount_in,
            &params.options,
        )?;

        let best = select_best(&mut routes)
            .cloned()
            .ok_or_else(|| RouteError::NoRouteFound {
                token_in: normalize_symbol(&params.token_in),
                token_out: normalize_symbol(&params.token_out),
            })?;

        if !best.feasible {
            return Err(RouteError::InfeasibleRoute {
                route_id: best.route_id,
                impact: best.cumulative_price_impact,
                max_impact: self.config.router.max_route_impact_percent,
            });
        }

        info!(
            "Auto swap {} {} -> {} via {}",
            params.amount_in, best.path[0], params.token_out, best.route_id
        );
        Ok(self.execute_multi_hop_swap(store, &best, params.min_amount_out, &params.recipient))
    }

    /// Execute an already quoted route.
    pub fn execute_multi_hop_swap(
        &self,
        store: &mut PoolStore,
        route: &Route,
        min_amount_out: f64,
        recipient: &str,
    ) -> AutoSwapResult {
        execute_route(store, &self.engine, route, min_amount_out, recipient)
    }

    fn validate(
        &self,
        store: &PoolStore,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<RouteRequest, RouteError> {
        let token_in = normalize_symbol(token_in);
        let token_out = normalize_symbol(token_out);

        for symbol in [&token_in, &token_out] {
            if let Some(message) = symbol_violation(symbol) {
                return Err(RouteError::validation(message));
            }
        }
        if token_in == token_out {
            return Err(RouteError::validation(format!(
                "token_in and token_out must differ (got {})",
                token_in
            )));
        }
        if !amount_in.is_finite() || amount_in <= 0.0 {
            return Err(RouteError::validation(format!(
                "amount_in must be positive and finite (got {})",
                amount_in
            )));
        }

        let max_hops = options.max_hops.unwrap_or(self.config.router.max_hops);
        if max_hops == 0 {
            return Err(RouteError::validation("max_hops must be at least 1"));
        }
        let slippage_tolerance_percent = options
            .slippage_tolerance_percent
            .unwrap_or(self.config.swap.default_slippage_tolerance_percent);
        if !slippage_tolerance_percent.is_finite() || slippage_tolerance_percent < 0.0 {
            return Err(RouteError::validation(format!(
                "slippage_tolerance_percent must be non-negative (got {})",
                slippage_tolerance_percent
            )));
        }

        for token in [&token_in, &token_out] {
            if !store.has_token(token) {
                return Err(RouteError::TokenNotFound {
                    token: token.clone(),
                });
            }
        }

        Ok(RouteRequest {
            token_in,
            token_out,
            amount_in,
            max_hops,
            slippage_tolerance_percent,
        })
    }
}
