//! Core type definitions for the singleton DEX

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the two symbols of a canonical pool id. Symbols may not
/// contain it.
pub const POOL_ID_SEPARATOR: char = '-';

/// Canonical pool identifier.
///
/// Derived from the normalized token symbols, lower-cased, sorted
/// lexicographically and joined with `-`, so both token orders resolve to
/// the same pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the canonical id for a token pair.
    pub fn canonical(token_a: &str, token_b: &str) -> Self {
        let a = normalize_symbol(token_a).to_lowercase();
        let b = normalize_symbol(token_b).to_lowercase();
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}{}{}", first, POOL_ID_SEPARATOR, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Monotonically increasing swap identifier assigned by the pool store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapId(pub u64);

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap_{}", self.0)
    }
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a token symbol for comparisons (trimmed, upper-cased).
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Check that a normalized symbol can take part in a canonical pool id.
///
/// Returns a description of the problem, if any.
pub fn symbol_violation(symbol: &str) -> Option<String> {
    if symbol.is_empty() {
        Some("token symbols must not be empty".to_string())
    } else if symbol.contains(POOL_ID_SEPARATOR) {
        Some(format!(
            "token symbol {} must not contain '{}'",
            symbol, POOL_ID_SEPARATOR
        ))
    } else {
        None
    }
}

/// Milliseconds since the UNIX epoch.
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_id_is_order_independent() {
        let pairs = [
            ("ETH", "USDC"),
            ("usdc", "eth"),
            ("BTC", "DAI"),
            ("WETH", "ETH"),
            ("a", "b"),
        ];
        for (a, b) in pairs {
            assert_eq!(PoolId::canonical(a, b), PoolId::canonical(b, a));
        }
    }

    #[test]
    fn test_canonical_id_format() {
        assert_eq!(PoolId::canonical("USDC", "ETH").as_str(), "eth-usdc");
        assert_eq!(PoolId::canonical(" Dai ", "USDT").as_str(), "dai-usdt");
    }

    #[test]
    fn test_canonical_id_normalizes_like_creation() {
        // Upper-casing "ß" yields "SS", so lookups must go through the same path.
        assert_eq!(
            PoolId::canonical("straße", "usdc"),
            PoolId::canonical(&normalize_symbol("straße"), "USDC")
        );
        assert_eq!(PoolId::canonical("straße", "usdc").as_str(), "strasse-usdc");
    }

    #[test]
    fn test_symbol_violation() {
        assert!(symbol_violation("ETH").is_none());
        assert!(symbol_violation("").is_some());
        assert!(symbol_violation("A-B").unwrap().contains("'-'"));
    }

    #[test]
    fn test_swap_id_display() {
        assert_eq!(SwapId(7).to_string(), "swap_7");
        assert!(SwapId(1) < SwapId(2));
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" eth "), "ETH");
    }
}
