//! AMM State Types
//!
//! Data structures for pools, quotes, execution records and listings.

use std::fmt;

use dex_core::{PoolId, SortOrder, SwapId};
use serde::{Deserialize, Serialize};

use crate::constants::usd_price;

/// Constant-product pool state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    /// Canonical pool id (sorted, lower-cased symbols)
    pub id: PoolId,
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: f64,
    pub reserve_b: f64,
    /// Fee as a fraction of the input (0.003 = 0.3%)
    pub fee_rate: f64,
    /// reserve_a * reserve_b, refreshed after every execution
    pub invariant_k: f64,
    /// reserve_b / reserve_a
    pub current_price: f64,
    pub total_volume: f64,
    pub swap_count: u64,
    /// Milliseconds since the UNIX epoch
    pub created_at: u64,
    pub last_updated: u64,
}

impl Pool {
    pub fn has_token(&self, token: &str) -> bool {
        self.token_a == token || self.token_b == token
    }

    /// The counterpart of `token` in this pool.
    pub fn other_token(&self, token: &str) -> Option<&str> {
        if token == self.token_a {
            Some(&self.token_b)
        } else if token == self.token_b {
            Some(&self.token_a)
        } else {
            None
        }
    }

    /// `(reserve_in, reserve_out)` when selling `token_in` into this pool.
    pub fn reserves_for(&self, token_in: &str) -> Option<(f64, f64)> {
        if token_in == self.token_a {
            Some((self.reserve_a, self.reserve_b))
        } else if token_in == self.token_b {
            Some((self.reserve_b, self.reserve_a))
        } else {
            None
        }
    }

    /// USD value of both reserves against the static price table.
    pub fn liquidity_usd(&self) -> f64 {
        self.reserve_a * usd_price(&self.token_a) + self.reserve_b * usd_price(&self.token_b)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            reserve_a: self.reserve_a,
            reserve_b: self.reserve_b,
            invariant_k: self.invariant_k,
            current_price: self.current_price,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool {} | {}: {:.4} | {}: {:.4} | fee {:.2}% | price {:.6}",
            self.id,
            self.token_a,
            self.reserve_a,
            self.token_b,
            self.reserve_b,
            self.fee_rate * 100.0,
            self.current_price
        )
    }
}

/// Reserves and derived values at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub invariant_k: f64,
    pub current_price: f64,
}

/// Pool creation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePoolParams {
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub fee_rate: f64,
}

impl CreatePoolParams {
    pub fn new(
        token_a: impl Into<String>,
        token_b: impl Into<String>,
        reserve_a: f64,
        reserve_b: f64,
        fee_rate: f64,
    ) -> Self {
        Self {
            token_a: token_a.into(),
            token_b: token_b.into(),
            reserve_a,
            reserve_b,
            fee_rate,
        }
    }
}

/// Single-pool swap request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapParams {
    pub pool_id: PoolId,
    pub token_in: String,
    pub amount_in: f64,
    /// Minimum acceptable output (slippage protection)
    #[serde(default)]
    pub min_amount_out: f64,
    /// Falls back to the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_tolerance_percent: Option<f64>,
}

/// Swap quote with calculated values and guard-rail diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub pool_id: PoolId,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: f64,
    /// Output after fees
    pub expected_out: f64,
    /// Fee retained by the pool, in `token_in` units
    pub fee: f64,
    pub amount_in_after_fee: f64,
    /// Spot price (out per in) before the trade
    pub price_before: f64,
    /// Spot price (out per in) after the trade
    pub price_after: f64,
    pub price_impact_percent: f64,
    /// expected_out / amount_in
    pub effective_rate: f64,
    pub executable: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Outcome of one `execute` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapExecutionRecord {
    pub swap_id: SwapId,
    #[serde(flatten)]
    pub quote: SwapQuote,
    pub pool_state_before: PoolSnapshot,
    pub pool_state_after: PoolSnapshot,
    pub timestamp: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SwapExecutionRecord {
    /// Realized output; zero for failed executions.
    pub fn amount_out(&self) -> f64 {
        if self.success {
            self.quote.expected_out
        } else {
            0.0
        }
    }
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolFilter {
    /// Only pools containing this token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Only pools whose USD liquidity is at least this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_liquidity_usd: Option<f64>,
}

/// Listing sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSortField {
    Liquidity,
    Volume,
    Price,
    CreatedAt,
}

/// Listing sort key and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSort {
    pub field: PoolSortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl PoolSort {
    pub fn new(field: PoolSortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Severity bucket for a trade's price impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Largest input that keeps impact at or below `impact_percent`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthTier {
    pub impact_percent: f64,
    pub max_amount_in: f64,
}

/// Price impact analysis for a prospective trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub pool_id: PoolId,
    pub token_in: String,
    pub amount_in: f64,
    pub expected_out: f64,
    pub price_impact_percent: f64,
    pub level: ImpactLevel,
    pub recommendation: String,
    pub depth_tiers: Vec<DepthTier>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pool() -> Pool {
        Pool {
            id: PoolId::canonical("ETH", "DAI"),
            token_a: "ETH".into(),
            token_b: "DAI".into(),
            reserve_a: 500.0,
            reserve_b: 1_000_000.0,
            fee_rate: 0.003,
            invariant_k: 500_000_000.0,
            current_price: 2_000.0,
            total_volume: 0.0,
            swap_count: 0,
            created_at: 0,
            last_updated: 0,
        }
    }

    #[test]
    fn test_reserves_for_direction() {
        let pool = make_pool();
        assert_eq!(pool.reserves_for("ETH"), Some((500.0, 1_000_000.0)));
        assert_eq!(pool.reserves_for("DAI"), Some((1_000_000.0, 500.0)));
        assert_eq!(pool.reserves_for("USDC"), None);
        assert_eq!(pool.other_token("DAI"), Some("ETH"));
    }

    #[test]
    fn test_liquidity_usd() {
        assert_eq!(make_pool().liquidity_usd(), 2_000_000.0);
    }

    #[test]
    fn test_display() {
        let s = make_pool().to_string();
        assert!(s.starts_with("Pool dai-eth | ETH: 500.0000"));
    }

    #[test]
    fn test_sort_and_level_serialization() {
        let sort: PoolSort = serde_json::from_str(r#"{"field": "created_at"}"#).unwrap();
        assert_eq!(sort.field, PoolSortField::CreatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
        assert_eq!(serde_json::to_string(&ImpactLevel::Extreme).unwrap(), "\"extreme\"");
    }
}
