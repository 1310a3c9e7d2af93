//! AMM Calculator
//!
//! Swap math using the constant product formula (x * y = k).

use crate::state::{DepthTier, ImpactLevel};

/// Standard price impact tiers (fractions).
const IMPACT_TIERS: [f64; 5] = [0.005, 0.01, 0.02, 0.05, 0.10];

/// Split an input into `(fee, amount_in_after_fee)`.
pub fn calculate_fee(amount_in: f64, fee_rate: f64) -> (f64, f64) {
    let fee = amount_in * fee_rate;
    (fee, amount_in - fee)
}

/// Calculate swap output using the constant product formula
///
/// Formula: output = reserve_out - k / (reserve_in + input_after_fee)
///
/// The fee is excluded from the invariant-preserving term, so `k` grows when
/// the full input is later credited to the reserves.
pub fn calculate_output(
    reserve_in: f64,
    reserve_out: f64,
    invariant_k: f64,
    amount_in_after_fee: f64,
) -> f64 {
    let denominator = reserve_in + amount_in_after_fee;
    if reserve_in <= 0.0 || reserve_out <= 0.0 || denominator <= 0.0 {
        return 0.0;
    }
    (reserve_out - invariant_k / denominator).max(0.0)
}

/// Reserves after crediting the full input and debiting the output.
pub fn post_trade_reserves(
    reserve_in: f64,
    reserve_out: f64,
    amount_in: f64,
    amount_out: f64,
) -> (f64, f64) {
    (reserve_in + amount_in, reserve_out - amount_out)
}

/// Calculate spot price (reserve_out / reserve_in)
pub fn calculate_spot_price(reserve_in: f64, reserve_out: f64) -> f64 {
    if reserve_in <= 0.0 {
        return 0.0;
    }
    reserve_out / reserve_in
}

/// Calculate price impact as percentage
pub fn calculate_price_impact(price_before: f64, price_after: f64) -> f64 {
    if price_before <= 0.0 {
        return 0.0;
    }
    ((price_after - price_before) / price_before).abs() * 100.0
}

/// Calculate effective rate after fees
pub fn calculate_effective_rate(amount_in: f64, amount_out: f64) -> f64 {
    if amount_in <= 0.0 {
        return 0.0;
    }
    amount_out / amount_in
}

/// Bucket a price impact percentage.
pub fn classify_impact(impact_percent: f64) -> ImpactLevel {
    if impact_percent < 1.0 {
        ImpactLevel::Low
    } else if impact_percent < 5.0 {
        ImpactLevel::Medium
    } else if impact_percent < 10.0 {
        ImpactLevel::High
    } else {
        ImpactLevel::Extreme
    }
}

/// Calculate max input for each impact tier.
///
/// Fee-less constant product: `price_after / price_before = (r / (r + x))^2`,
/// so `max_input = reserve_in * (1 / sqrt(1 - impact) - 1)`.
pub fn calculate_depth_tiers(reserve_in: f64) -> Vec<DepthTier> {
    IMPACT_TIERS
        .iter()
        .map(|&impact| DepthTier {
            impact_percent: impact * 100.0,
            max_amount_in: reserve_in * (1.0 / (1.0 - impact).sqrt() - 1.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_split() {
        let (fee, after) = calculate_fee(100.0, 0.003);
        assert!((fee - 0.3).abs() < 1e-12);
        assert!((after - 99.7).abs() < 1e-12);
    }

    #[test]
    fn test_output_formula() {
        let k = 10_000.0 * 20_000_000.0;
        let out = calculate_output(10_000.0, 20_000_000.0, k, 99.7);
        let expected = 20_000_000.0 - k / 10_099.7;
        assert!((out - expected).abs() < 1e-6);
        assert!(out > 197_000.0 && out < 198_000.0);
    }

    #[test]
    fn test_output_zero_reserves() {
        assert_eq!(calculate_output(0.0, 100.0, 0.0, 10.0), 0.0);
        assert_eq!(calculate_output(100.0, 0.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_price_impact() {
        assert!((calculate_price_impact(2000.0, 1980.0) - 1.0).abs() < 1e-9);
        assert_eq!(calculate_price_impact(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_classify_impact() {
        assert_eq!(classify_impact(0.2), ImpactLevel::Low);
        assert_eq!(classify_impact(1.0), ImpactLevel::Medium);
        assert_eq!(classify_impact(7.5), ImpactLevel::High);
        assert_eq!(classify_impact(10.0), ImpactLevel::Extreme);
    }

    #[test]
    fn test_depth_tiers_formula() {
        let tiers = calculate_depth_tiers(10_000.0);
        assert_eq!(tiers.len(), IMPACT_TIERS.len());

        // Feeding the 1% tier back through the fee-less curve lands on 1%.
        let one = tiers[1];
        let r_in = 10_000.0;
        let r_out = 20_000_000.0;
        let k = r_in * r_out;
        let out = calculate_output(r_in, r_out, k, one.max_amount_in);
        let (new_in, new_out) = post_trade_reserves(r_in, r_out, one.max_amount_in, out);
        let impact = calculate_price_impact(
            calculate_spot_price(r_in, r_out),
            calculate_spot_price(new_in, new_out),
        );
        assert!((impact - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_tiers_increasing() {
        let tiers = calculate_depth_tiers(500.0);
        for pair in tiers.windows(2) {
            assert!(pair[1].max_amount_in > pair[0].max_amount_in);
        }
    }
}
