//! AMM Constants
//!
//! Default seed topology and the static USD price table used for liquidity
//! valuation.

use crate::state::CreatePoolParams;

/// Fee constants
pub mod fees {
    /// Standard volatile-pair fee (0.3%)
    pub const STANDARD_FEE_RATE: f64 = 0.003;

    /// Stable-pair fee (0.05%)
    pub const STABLE_FEE_RATE: f64 = 0.0005;

    /// Wrap pool fee (0.01%)
    pub const WRAP_FEE_RATE: f64 = 0.0001;
}

/// Token symbols used by the default topology
pub mod tokens {
    pub const ETH: &str = "ETH";
    pub const WETH: &str = "WETH";
    pub const BTC: &str = "BTC";
    pub const USDC: &str = "USDC";
    pub const USDT: &str = "USDT";
    pub const DAI: &str = "DAI";
}

/// Static USD reference price for a symbol; unknown tokens are valued at zero.
pub fn usd_price(symbol: &str) -> f64 {
    match symbol {
        tokens::ETH | tokens::WETH => 2_000.0,
        tokens::BTC => 40_000.0,
        tokens::USDC | tokens::USDT | tokens::DAI => 1.0,
        _ => 0.0,
    }
}

/// The ten pools seeded at startup and by `PoolStore::reset_all`.
///
/// Sized so several pairs have both a cheap shallow direct pool and a
/// better-priced route through the deep USDC pools.
pub fn default_seed_pools() -> Vec<CreatePoolParams> {
    use fees::*;
    use tokens::*;

    vec![
        // Main liquidity
        CreatePoolParams::new(ETH, USDC, 10_000.0, 20_000_000.0, STANDARD_FEE_RATE),
        CreatePoolParams::new(BTC, USDC, 500.0, 20_000_000.0, STANDARD_FEE_RATE),
        // Medium
        CreatePoolParams::new(BTC, ETH, 100.0, 2_000.0, STANDARD_FEE_RATE),
        // Stable pools
        CreatePoolParams::new(USDC, DAI, 5_000_000.0, 5_000_000.0, STABLE_FEE_RATE),
        CreatePoolParams::new(USDC, USDT, 5_000_000.0, 5_000_000.0, STABLE_FEE_RATE),
        CreatePoolParams::new(DAI, USDT, 2_000_000.0, 2_000_000.0, STABLE_FEE_RATE),
        // Shallow direct pools
        CreatePoolParams::new(ETH, DAI, 500.0, 1_000_000.0, STANDARD_FEE_RATE),
        CreatePoolParams::new(BTC, DAI, 25.0, 1_000_000.0, STANDARD_FEE_RATE),
        // Wrap pools
        CreatePoolParams::new(WETH, USDC, 1_000.0, 2_000_000.0, STANDARD_FEE_RATE),
        CreatePoolParams::new(WETH, ETH, 5_000.0, 5_000.0, WRAP_FEE_RATE),
    ]
}
