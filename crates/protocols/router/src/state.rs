//! Router State Types
//!
//! Routes, comparison reports, search options and execution results.

use std::fmt;

use dex_core::{PoolId, SwapId};
use serde::{Deserialize, Serialize};

/// Direct (one pool) or multi-hop route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteType {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "multi-hop")]
    MultiHop,
}

impl RouteType {
    pub fn for_hops(hop_count: usize) -> Self {
        if hop_count <= 1 {
            Self::Direct
        } else {
            Self::MultiHop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MultiHop => "multi-hop",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single quoted hop in a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopDetail {
    pub pool_id: PoolId,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub amount_out: f64,
    pub fee: f64,
    pub price_impact_percent: f64,
    pub price_before: f64,
    pub price_after: f64,
}

/// A complete quoted route from source token to target token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,
    pub path: Vec<String>,
    pub pools: Vec<PoolId>,
    pub hop_count: usize,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub amount_in: f64,
    pub expected_out: f64,
    /// Sum of per-hop impacts (not compounded)
    pub cumulative_price_impact: f64,
    pub hops: Vec<HopDetail>,
    pub gas_estimate: u64,
    /// Sum of per-hop fees, each in its own hop's input token
    pub total_fee: f64,
    pub feasible: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub recommended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Tolerance the route was quoted with; reused per hop on execution
    pub slippage_tolerance_percent: f64,
}

impl Route {
    pub fn is_direct(&self) -> bool {
        self.route_type == RouteType::Direct
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | out {:.6} | impact {:.4}% | gas {}{}",
            self.route_id,
            self.expected_out,
            self.cumulative_price_impact,
            self.gas_estimate,
            if self.feasible { "" } else { " | infeasible" }
        )
    }
}

/// Path search options; absent fields fall back to the engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_hops: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_tolerance_percent: Option<f64>,
}

impl SearchOptions {
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    pub fn with_slippage(mut self, slippage_tolerance_percent: f64) -> Self {
        self.slippage_tolerance_percent = Some(slippage_tolerance_percent);
        self
    }
}

/// Which route the comparison recommends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "multi-hop")]
    MultiHop,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::MultiHop => "multi-hop",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Singleton vs per-contract gas for the best route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasComparison {
    pub singleton_gas: u64,
    pub regular_dex_gas_equivalent: u64,
    pub gas_saved: u64,
    pub gas_saved_percent: f64,
}

/// Direct vs multi-hop comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub best_route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_route: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_multi_hop_route: Option<Route>,
    /// multi-hop output minus direct output
    pub output_diff: f64,
    pub output_diff_percent: f64,
    /// multi-hop impact minus direct impact (percentage points)
    pub impact_diff: f64,
    /// multi-hop gas minus direct gas
    pub gas_diff: i64,
    pub recommendation: Recommendation,
    pub recommendation_reason: String,
    pub gas: GasComparison,
}

/// Route search with per-hop-count breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSearchSummary {
    pub routes: Vec<Route>,
    pub total_routes: usize,
    pub direct_count: usize,
    pub two_hop_count: usize,
    pub three_hop_count: usize,
    pub search_time_ms: f64,
}

/// One executed hop of a multi-hop swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopExecution {
    pub hop_index: usize,
    pub swap_id: SwapId,
    pub pool_id: PoolId,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    pub amount_out: f64,
    pub fee: f64,
    pub price_impact_percent: f64,
    pub gas_used: u64,
}

/// Find-best-then-execute request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSwapParams {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    #[serde(default)]
    pub min_amount_out: f64,
    pub recipient: String,
    #[serde(default)]
    pub options: SearchOptions,
}

/// Outcome of a multi-hop execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSwapResult {
    pub success: bool,
    pub route_id: String,
    pub path: Vec<String>,
    pub recipient: String,
    pub amount_in: f64,
    /// Output the route was quoted at
    pub expected_out: f64,
    /// Realized output; zero when a hop failed
    pub amount_out: f64,
    pub min_amount_out: f64,
    /// Hops that executed, in order
    pub hops: Vec<HopExecution>,
    pub total_fee: f64,
    pub gas_used: u64,
    pub execution_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_type_for_hops() {
        assert_eq!(RouteType::for_hops(1), RouteType::Direct);
        assert_eq!(RouteType::for_hops(3), RouteType::MultiHop);
        assert_eq!(serde_json::to_string(&RouteType::MultiHop).unwrap(), "\"multi-hop\"");
    }

    #[test]
    fn test_recommendation_display() {
        assert_eq!(Recommendation::MultiHop.to_string(), "multi-hop");
        assert_eq!(Recommendation::Direct.to_string(), "direct");
    }

    #[test]
    fn test_auto_swap_params_defaults() {
        let params: AutoSwapParams = serde_json::from_str(
            r#"{"token_in": "ETH", "token_out": "DAI", "amount_in": 1.5, "recipient": "alice"}"#,
        )
        .unwrap();
        assert_eq!(params.min_amount_out, 0.0);
        assert_eq!(params.options, SearchOptions::default());
    }
}
