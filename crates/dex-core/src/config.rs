//! Configuration types for the singleton DEX engine

use serde::{Deserialize, Serialize};

/// Single-swap guard rails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Price impact (percent) above which a quote carries a warning
    #[serde(default = "default_high_impact_warning_percent")]
    pub high_impact_warning_percent: f64,

    /// Largest fraction of the output reserve one swap may remove
    #[serde(default = "default_max_reserve_out_fraction")]
    pub max_reserve_out_fraction: f64,

    /// Slippage tolerance applied when the caller does not pass one
    #[serde(default = "default_slippage_tolerance_percent")]
    pub default_slippage_tolerance_percent: f64,
}

fn default_high_impact_warning_percent() -> f64 {
    5.0
}

fn default_max_reserve_out_fraction() -> f64 {
    0.9
}

fn default_slippage_tolerance_percent() -> f64 {
    3.0
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            high_impact_warning_percent: default_high_impact_warning_percent(),
            max_reserve_out_fraction: default_max_reserve_out_fraction(),
            default_slippage_tolerance_percent: default_slippage_tolerance_percent(),
        }
    }
}

/// Path search and route quoting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum number of hops in a searched path
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Hard ceiling on cumulative route price impact (percent)
    #[serde(default = "default_max_route_impact_percent")]
    pub max_route_impact_percent: f64,

    /// Gas charged once per routed swap
    #[serde(default = "default_base_gas")]
    pub base_gas: u64,

    /// Gas charged for every hop
    #[serde(default = "default_per_hop_gas")]
    pub per_hop_gas: u64,

    /// Optional cap on the number of paths collected (first found, shortest first)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_routes: Option<usize>,
}

fn default_max_hops() -> usize {
    3
}

fn default_max_route_impact_percent() -> f64 {
    10.0
}

fn default_base_gas() -> u64 {
    100_000
}

fn default_per_hop_gas() -> u64 {
    30_000
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            max_route_impact_percent: default_max_route_impact_percent(),
            base_gas: default_base_gas(),
            per_hop_gas: default_per_hop_gas(),
            max_routes: None,
        }
    }
}

/// Thresholds for the direct vs multi-hop recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Multi-hop wins outright when its output is this many percent higher
    #[serde(default = "default_output_advantage_percent")]
    pub output_advantage_percent: f64,

    /// Direct wins when multi-hop costs more than this much extra gas
    #[serde(default = "default_gas_penalty_threshold")]
    pub gas_penalty_threshold: u64,

    /// Multi-hop wins when its cumulative impact is this many points lower
    #[serde(default = "default_impact_advantage_points")]
    pub impact_advantage_points: f64,
}

fn default_output_advantage_percent() -> f64 {
    5.0
}

fn default_gas_penalty_threshold() -> u64 {
    50_000
}

fn default_impact_advantage_points() -> f64 {
    5.0
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            output_advantage_percent: default_output_advantage_percent(),
            gas_penalty_threshold: default_gas_penalty_threshold(),
            impact_advantage_points: default_impact_advantage_points(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub swap: SwapConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub comparison: ComparisonConfig,
}

impl EngineConfig {
    /// Check that thresholds are within meaningful ranges.
    pub fn validate(&self) -> crate::Result<()> {
        if self.router.max_hops == 0 {
            return Err(crate::Error::Config("router.max_hops must be at least 1".into()));
        }
        if !(self.swap.max_reserve_out_fraction > 0.0 && self.swap.max_reserve_out_fraction <= 1.0)
        {
            return Err(crate::Error::Config(
                "swap.max_reserve_out_fraction must be in (0, 1]".into(),
            ));
        }
        if self.swap.default_slippage_tolerance_percent < 0.0
            || self.router.max_route_impact_percent < 0.0
        {
            return Err(crate::Error::Config(
                "percent thresholds must not be negative".into(),
            ));
        }
        if self.router.max_routes == Some(0) {
            return Err(crate::Error::Config("router.max_routes must be at least 1".into()));
        }
        Ok(())
    }
}
