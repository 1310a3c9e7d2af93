//! Singleton AMM
//!
//! Hosts many constant-product token-pair pools in one registry and
//! implements single-pool quoting and execution against them.

pub mod calculator;
pub mod constants;
pub mod pool_store;
pub mod state;
pub mod swap_engine;

// Re-exports
pub use calculator::{calculate_output, calculate_price_impact, classify_impact};
pub use constants::{default_seed_pools, fees, tokens, usd_price};
pub use pool_store::PoolStore;
pub use state::{
    CreatePoolParams, DepthTier, ImpactAnalysis, ImpactLevel, Pool, PoolFilter, PoolSnapshot,
    PoolSort, PoolSortField, SwapExecutionRecord, SwapParams, SwapQuote,
};
pub use swap_engine::SwapEngine;
