//! Application state shared across callers
//!
//! The pool store lives behind a single `RwLock`. Quotes and route searches
//! take the read lock; swaps and resets take the write lock, so every
//! read-modify-write on the registry is serialized.

use std::sync::Arc;

use amm::{
    CreatePoolParams, ImpactAnalysis, Pool, PoolFilter, PoolSort, PoolStore, SwapExecutionRecord,
    SwapParams, SwapQuote,
};
use dex_core::{EngineConfig, PoolError, PoolId, RouteError};
use router::{
    AutoSwapParams, AutoSwapResult, ComparisonReport, Route, RouteSearchSummary, Router,
    SearchOptions,
};
use tokio::sync::RwLock;

use crate::config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: RwLock<PoolStore>,
    router: Router,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        let store = if config.seed_default_pools {
            PoolStore::seeded()
        } else {
            PoolStore::new()
        };
        tracing::info!("Engine state ready with {} pools", store.len());

        Self {
            inner: Arc::new(AppStateInner {
                router: Router::new(config.engine.clone()),
                store: RwLock::new(store),
                config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn engine_config(&self) -> &EngineConfig {
        self.inner.router.config()
    }

    pub async fn create_pool(&self, params: CreatePoolParams) -> Result<Pool, PoolError> {
        let mut store = self.inner.store.write().await;
        store.create_pool(params)
    }

    pub async fn get_pool(&self, id: &PoolId) -> Option<Pool> {
        self.inner.store.read().await.get_pool(id).cloned()
    }

    pub async fn find_pool_by_tokens(&self, token_a: &str, token_b: &str) -> Option<Pool> {
        self.inner
            .store
            .read()
            .await
            .find_pool_by_tokens(token_a, token_b)
            .cloned()
    }

    pub async fn list_pools(&self, filter: &PoolFilter, sort: Option<PoolSort>) -> Vec<Pool> {
        let store = self.inner.store.read().await;
        store.list_pools(filter, sort).into_iter().cloned().collect()
    }

    pub async fn simulate_swap(&self, params: &SwapParams) -> Result<SwapQuote, PoolError> {
        let store = self.inner.store.read().await;
        self.inner.router.engine().simulate_swap(&store, params)
    }

    pub async fn execute_swap(
        &self,
        params: &SwapParams,
    ) -> Result<SwapExecutionRecord, PoolError> {
        let mut store = self.inner.store.write().await;
        self.inner.router.engine().execute_swap(&mut store, params)
    }

    pub async fn analyze_price_impact(
        &self,
        pool_id: &PoolId,
        token_in: &str,
        amount_in: f64,
    ) -> Result<ImpactAnalysis, PoolError> {
        let store = self.inner.store.read().await;
        self.inner
            .router
            .engine()
            .analyze_price_impact(&store, pool_id, token_in, amount_in)
    }

    /// Clear every pool and restore the default topology.
    pub async fn reset_all(&self) {
        self.inner.store.write().await.reset_all();
    }

    pub async fn find_all_routes(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<Vec<Route>, RouteError> {
        let store = self.inner.store.read().await;
        self.inner
            .router
            .find_all_routes(&store, token_in, token_out, amount_in, options)
    }

    pub async fn compare_routes(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<ComparisonReport, RouteError> {
        let store = self.inner.store.read().await;
        self.inner
            .router
            .compare_routes(&store, token_in, token_out, amount_in, options)
    }

    pub async fn search_routes(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        options: &SearchOptions,
    ) -> Result<RouteSearchSummary, RouteError> {
        let store = self.inner.store.read().await;
        self.inner
            .router
            .search_routes(&store, token_in, token_out, amount_in, options)
    }

    /// Search, select and execute under one write lock.
    pub async fn auto_swap(&self, params: &AutoSwapParams) -> Result<AutoSwapResult, RouteError> {
        let mut store = self.inner.store.write().await;
        self.inner.router.auto_swap(&mut store, params)
    }

    /// Execute a previously quoted route. The quote may be stale by now;
    /// hops run on realized outputs against current reserves.
    pub async fn execute_multi_hop_swap(
        &self,
        route: &Route,
        min_amount_out: f64,
        recipient: &str,
    ) -> AutoSwapResult {
        let mut store = self.inner.store.write().await;
        self.inner
            .router
            .execute_multi_hop_swap(&mut store, route, min_amount_out, recipient)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
