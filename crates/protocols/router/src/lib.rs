//! Multi-Hop Router
//!
//! Discovers token paths through the singleton AMM, quotes them, picks the
//! best one and executes it hop by hop.

pub mod evaluator;
pub mod executor;
pub mod path_finder;
pub mod selector;
pub mod service;
pub mod state;

// Re-exports
pub use evaluator::{estimate_gas, estimate_regular_dex_gas, quote_route};
pub use executor::execute_route;
pub use path_finder::{build_token_graph, find_paths, GraphEdge, TokenGraph};
pub use selector::{compare_direct_vs_multi_hop, compare_gas, select_best};
pub use service::Router;
pub use state::{
    AutoSwapParams, AutoSwapResult, ComparisonReport, GasComparison, HopDetail, HopExecution,
    Recommendation, Route, RouteSearchSummary, RouteType, SearchOptions,
};
