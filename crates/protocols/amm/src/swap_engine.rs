//! Swap Engine
//!
//! Pure quoting (`simulate`) and stateful execution (`execute`) of a single
//! swap against one constant-product pool.

use dex_core::{normalize_symbol, now_millis, PoolError, PoolId, SwapConfig};
use tracing::{debug, info, warn};

use crate::calculator::{
    calculate_depth_tiers, calculate_effective_rate, calculate_fee, calculate_output,
    calculate_price_impact, calculate_spot_price, classify_impact, post_trade_reserves,
};
use crate::pool_store::PoolStore;
use crate::state::{ImpactAnalysis, ImpactLevel, Pool, SwapExecutionRecord, SwapParams, SwapQuote};

/// Single-pool swap engine carrying the guard-rail configuration.
#[derive(Debug, Clone, Default)]
pub struct SwapEngine {
    config: SwapConfig,
}

impl SwapEngine {
    pub fn new(config: SwapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Quote a swap without touching pool state.
    ///
    /// Only malformed requests (unknown token, non-positive amount) are
    /// returned as `Err`. Guard-rail violations are reported on the quote,
    /// which is then marked not executable.
    pub fn simulate(
        &self,
        pool: &Pool,
        token_in: &str,
        amount_in: f64,
        min_amount_out: f64,
        slippage_tolerance_percent: f64,
    ) -> Result<SwapQuote, PoolError> {
        let token_in = normalize_symbol(token_in);
        let (reserve_in, reserve_out) = pool.reserves_for(&token_in).ok_or_else(|| {
            PoolError::validation(format!("token {} is not part of pool {}", token_in, pool.id))
        })?;
        let token_out = pool.other_token(&token_in).unwrap_or_default().to_string();

        if !amount_in.is_finite() || amount_in <= 0.0 {
            return Err(PoolError::validation(format!(
                "amount_in must be positive and finite (got {})",
                amount_in
            )));
        }

        let (fee, amount_in_after_fee) = calculate_fee(amount_in, pool.fee_rate);
        let expected_out =
            calculate_output(reserve_in, reserve_out, pool.invariant_k, amount_in_after_fee);

        let price_before = calculate_spot_price(reserve_in, reserve_out);
        let (new_reserve_in, new_reserve_out) =
            post_trade_reserves(reserve_in, reserve_out, amount_in, expected_out);
        let price_after = calculate_spot_price(new_reserve_in, new_reserve_out);
        let price_impact_percent = calculate_price_impact(price_before, price_after);

        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        if price_impact_percent > self.config.high_impact_warning_percent {
            warnings.push(format!(
                "High price impact: {:.4}% exceeds {}%",
                price_impact_percent, self.config.high_impact_warning_percent
            ));
        }
        if price_impact_percent > slippage_tolerance_percent {
            errors.push(
                PoolError::SlippageExceeded {
                    impact: price_impact_percent,
                    tolerance: slippage_tolerance_percent,
                }
                .to_string(),
            );
        }
        if expected_out < min_amount_out {
            errors.push(
                PoolError::MinimumOutputNotMet {
                    got: expected_out,
                    min: min_amount_out,
                }
                .to_string(),
            );
        }
        let max_out = self.config.max_reserve_out_fraction * reserve_out;
        if expected_out > max_out {
            errors.push(
                PoolError::LiquidityExhaustion {
                    amount_out: expected_out,
                    reserve_out,
                    max_fraction_percent: self.config.max_reserve_out_fraction * 100.0,
                }
                .to_string(),
            );
        }

        Ok(SwapQuote {
            pool_id: pool.id.clone(),
            token_in,
            token_out,
            amount_in,
            expected_out,
            fee,
            amount_in_after_fee,
            price_before,
            price_after,
            price_impact_percent,
            effective_rate: calculate_effective_rate(amount_in, expected_out),
            executable: errors.is_empty(),
            warnings,
            errors,
        })
    }

    /// Quote against a pool held by the store.
    pub fn simulate_swap(
        &self,
        store: &PoolStore,
        params: &SwapParams,
    ) -> Result<SwapQuote, PoolError> {
        let pool = store
            .get_pool(&params.pool_id)
            .ok_or_else(|| PoolError::PoolNotFound {
                pool_id: params.pool_id.to_string(),
            })?;
        self.simulate(
            pool,
            &params.token_in,
            params.amount_in,
            params.min_amount_out,
            self.tolerance_or_default(params.slippage_tolerance_percent),
        )
    }

    /// Execute a swap, mutating the pool in place.
    ///
    /// A quote that fails its guard rails yields a failed record with
    /// identical before/after snapshots; the pool is left untouched.
    pub fn execute(
        &self,
        store: &mut PoolStore,
        pool_id: &PoolId,
        token_in: &str,
        amount_in: f64,
        min_amount_out: f64,
        slippage_tolerance_percent: f64,
    ) -> Result<SwapExecutionRecord, PoolError> {
        let quote = {
            let pool = store.get_pool(pool_id).ok_or_else(|| PoolError::PoolNotFound {
                pool_id: pool_id.to_string(),
            })?;
            self.simulate(
                pool,
                token_in,
                amount_in,
                min_amount_out,
                slippage_tolerance_percent,
            )?
        };

        let swap_id = store.next_swap_id();
        let pool = store
            .get_pool_mut(pool_id)
            .ok_or_else(|| PoolError::PoolNotFound {
                pool_id: pool_id.to_string(),
            })?;
        let before = pool.snapshot();

        if !quote.executable {
            let error = quote.errors.join("; ");
            warn!("Swap {} on {} rejected: {}", swap_id, pool_id, error);
            return Ok(SwapExecutionRecord {
                swap_id,
                quote,
                pool_state_before: before,
                pool_state_after: before,
                timestamp: now_millis(),
                success: false,
                error: Some(error),
            });
        }

        // The full input is credited so the fee stays in reserves.
        if quote.token_in == pool.token_a {
            pool.reserve_a += quote.amount_in;
            pool.reserve_b -= quote.expected_out;
        } else {
            pool.reserve_b += quote.amount_in;
            pool.reserve_a -= quote.expected_out;
        }
        pool.invariant_k = pool.reserve_a * pool.reserve_b;
        pool.current_price = calculate_spot_price(pool.reserve_a, pool.reserve_b);
        pool.total_volume += quote.amount_in;
        pool.swap_count += 1;
        pool.last_updated = now_millis();

        let after = pool.snapshot();
        debug!(
            "K {} -> {} on {} after {}",
            before.invariant_k, after.invariant_k, pool_id, swap_id
        );
        info!(
            "Swap {} on {}: {} {} -> {:.6} {} (impact {:.4}%)",
            swap_id,
            pool_id,
            quote.amount_in,
            quote.token_in,
            quote.expected_out,
            quote.token_out,
            quote.price_impact_percent
        );

        Ok(SwapExecutionRecord {
            swap_id,
            quote,
            pool_state_before: before,
            pool_state_after: after,
            timestamp: pool.last_updated,
            success: true,
            error: None,
        })
    }

    /// Execute a swap described by request parameters.
    pub fn execute_swap(
        &self,
        store: &mut PoolStore,
        params: &SwapParams,
    ) -> Result<SwapExecutionRecord, PoolError> {
        self.execute(
            store,
            &params.pool_id,
            &params.token_in,
            params.amount_in,
            params.min_amount_out,
            self.tolerance_or_default(params.slippage_tolerance_percent),
        )
    }

    /// Classify the price impact of a prospective trade.
    pub fn analyze_price_impact(
        &self,
        store: &PoolStore,
        pool_id: &PoolId,
        token_in: &str,
        amount_in: f64,
    ) -> Result<ImpactAnalysis, PoolError> {
        let pool = store.get_pool(pool_id).ok_or_else(|| PoolError::PoolNotFound {
            pool_id: pool_id.to_string(),
        })?;
        // Tolerance is irrelevant here; only the numbers are used.
        let quote = self.simulate(pool, token_in, amount_in, 0.0, f64::INFINITY)?;
        let (reserve_in, _) = pool.reserves_for(&quote.token_in).unwrap_or_default();
        let level = classify_impact(quote.price_impact_percent);

        let recommendation = match level {
            ImpactLevel::Low => "Trade size is small relative to pool depth".to_string(),
            ImpactLevel::Medium => "Noticeable impact; consider a tighter slippage limit".to_string(),
            ImpactLevel::High => {
                "High impact; consider splitting the trade or routing through deeper pools"
                    .to_string()
            }
            ImpactLevel::Extreme => format!(
                "Extreme impact; trade exceeds what {} can absorb efficiently",
                pool.id
            ),
        };

        Ok(ImpactAnalysis {
            pool_id: pool.id.clone(),
            token_in: quote.token_in,
            amount_in,
            expected_out: quote.expected_out,
            price_impact_percent: quote.price_impact_percent,
            level,
            recommendation,
            depth_tiers: calculate_depth_tiers(reserve_in),
        })
    }

    fn tolerance_or_default(&self, tolerance: Option<f64>) -> f64 {
        tolerance.unwrap_or(self.config.default_slippage_tolerance_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tokens::*;
    use crate::state::CreatePoolParams;

    fn make_store() -> (PoolStore, PoolId) {
        let mut store = PoolStore::new();
        let pool = store
            .create_pool(CreatePoolParams::new(ETH, USDC, 10_000.0, 20_000_000.0, 0.003))
            .unwrap();
        (store, pool.id)
    }

    #[test]
    fn test_simulate_reference_scenario() {
        let (store, id) = make_store();
        let engine = SwapEngine::default();
        let pool = store.get_pool(&id).unwrap();

        let quote = engine.simulate(pool, ETH, 100.0, 0.0, 5.0).unwrap();

        assert!((quote.fee - 0.3).abs() < 1e-9);
        assert!((quote.amount_in_after_fee - 99.7).abs() < 1e-9);
        let expected = 20_000_000.0 - (10_000.0 * 20_000_000.0) / (10_000.0 + 99.7);
        assert!((quote.expected_out - expected).abs() < 1e-6);
        assert_eq!(quote.price_before, 2_000.0);

        let post_price = (20_000_000.0 - expected) / 10_100.0;
        assert!((quote.price_after - post_price).abs() < 1e-9);
        let impact = (post_price - 2_000.0).abs() / 2_000.0 * 100.0;
        assert!((quote.price_impact_percent - impact).abs() < 1e-9);
        assert_eq!(quote.token_out, USDC);
        assert!(quote.executable);
    }

    #[test]
    fn test_simulate_is_pure() {
        let (store, id) = make_store();
        let engine = SwapEngine::default();
        let pool = store.get_pool(&id).unwrap().clone();

        let q1 = engine.simulate(&pool, USDC, 50_000.0, 0.0, 3.0).unwrap();
        let q2 = engine.simulate(&pool, USDC, 50_000.0, 0.0, 3.0).unwrap();
        assert_eq!(q1, q2);
        assert_eq!(store.get_pool(&id).unwrap(), &pool);
    }

    #[test]
    fn test_simulate_rejects_foreign_token() {
        let (store, id) = make_store();
        let pool = store.get_pool(&id).unwrap();
        let err = SwapEngine::default()
            .simulate(pool, DAI, 1.0, 0.0, 3.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "validation_error");
    }

    #[test]
    fn test_simulate_rejects_non_positive_amount() {
        let (store, id) = make_store();
        let pool = store.get_pool(&id).unwrap();
        let engine = SwapEngine::default();
        assert!(engine.simulate(pool, ETH, 0.0, 0.0, 3.0).is_err());
        assert!(engine.simulate(pool, ETH, -5.0, 0.0, 3.0).is_err());
        assert!(engine.simulate(pool, ETH, f64::INFINITY, 0.0, 3.0).is_err());
    }

    #[test]
    fn test_guard_rails_accumulate() {
        let (store, id) = make_store();
        let pool = store.get_pool(&id).unwrap();
        let engine = SwapEngine::default();

        // ~10x the reserve: drains >90% of USDC, blows through tolerance and min out.
        let quote = engine
            .simulate(pool, ETH, 100_000.0, 30_000_000.0, 1.0)
            .unwrap();
        assert!(!quote.executable);
        assert_eq!(quote.errors.len(), 3);
        assert_eq!(quote.warnings.len(), 1);
        assert!(quote.expected_out > 0.0);
    }

    #[test]
    fn test_warning_without_error() {
        let (store, id) = make_store();
        let pool = store.get_pool(&id).unwrap();
        let quote = SwapEngine::default()
            .simulate(pool, ETH, 500.0, 0.0, 50.0)
            .unwrap();
        assert!(quote.price_impact_percent > 5.0);
        assert!(quote.executable);
        assert_eq!(quote.warnings.len(), 1);
    }

    #[test]
    fn test_execute_updates_pool_and_grows_k() {
        let (mut store, id) = make_store();
        let engine = SwapEngine::default();
        let k_before = store.get_pool(&id).unwrap().invariant_k;

        let record = engine.execute(&mut store, &id, ETH, 100.0, 0.0, 5.0).unwrap();
        assert!(record.success);
        assert_eq!(record.swap_id.0, 1);

        let pool = store.get_pool(&id).unwrap();
        assert_eq!(pool.reserve_a, 10_100.0);
        assert!((pool.reserve_b - (20_000_000.0 - record.quote.expected_out)).abs() < 1e-6);
        assert!(pool.invariant_k >= k_before);
        assert_eq!(pool.invariant_k, pool.reserve_a * pool.reserve_b);
        assert_eq!(pool.current_price, pool.reserve_b / pool.reserve_a);
        assert_eq!(pool.total_volume, 100.0);
        assert_eq!(pool.swap_count, 1);
        assert_eq!(record.pool_state_after, pool.snapshot());
        assert!((record.quote.price_after - pool.current_price).abs() < 1e-9);
    }

    #[test]
    fn test_k_never_decreases_across_executions() {
        let (mut store, id) = make_store();
        let engine = SwapEngine::default();
        let trades = [
            (ETH, 10.0),
            (USDC, 75_000.0),
            (ETH, 42.5),
            (USDC, 1_000.0),
            (ETH, 0.01),
        ];
        for (token, amount) in trades {
            let k_before = store.get_pool(&id).unwrap().invariant_k;
            let record = engine
                .execute(&mut store, &id, token, amount, 0.0, 10.0)
                .unwrap();
            assert!(record.success);
            let k_after = store.get_pool(&id).unwrap().invariant_k;
            assert!(k_after >= k_before * (1.0 - 1e-12));
        }
        let ids_ok = store.get_pool(&id).unwrap().swap_count;
        assert_eq!(ids_ok, trades.len() as u64);
    }

    #[test]
    fn test_zero_fee_preserves_k() {
        let mut store = PoolStore::new();
        let id = store
            .create_pool(CreatePoolParams::new(DAI, USDT, 1_000_000.0, 1_000_000.0, 0.0))
            .unwrap()
            .id;
        let engine = SwapEngine::default();
        let k_before = store.get_pool(&id).unwrap().invariant_k;
        engine.execute(&mut store, &id, DAI, 1_000.0, 0.0, 5.0).unwrap();
        let k_after = store.get_pool(&id).unwrap().invariant_k;
        assert!(((k_after - k_before) / k_before).abs() < 1e-9);
    }

    #[test]
    fn test_execute_rejected_leaves_pool_untouched() {
        let (mut store, id) = make_store();
        let engine = SwapEngine::default();
        let before = store.get_pool(&id).unwrap().clone();

        let record = engine
            .execute(&mut store, &id, ETH, 100.0, 1_000_000.0, 5.0)
            .unwrap();
        assert!(!record.success);
        assert!(record.error.as_deref().unwrap().contains("Output below minimum"));
        assert_eq!(record.pool_state_before, record.pool_state_after);
        assert_eq!(record.amount_out(), 0.0);
        assert_eq!(store.get_pool(&id).unwrap(), &before);
    }

    #[test]
    fn test_swap_ids_increase() {
        let (mut store, id) = make_store();
        let engine = SwapEngine::default();
        let a = engine.execute(&mut store, &id, ETH, 1.0, 0.0, 5.0).unwrap();
        let b = engine.execute(&mut store, &id, USDC, 1.0, 0.0, 5.0).unwrap();
        assert!(b.swap_id > a.swap_id);
    }

    #[test]
    fn test_execute_unknown_pool() {
        let (mut store, _) = make_store();
        let err = SwapEngine::default()
            .execute(&mut store, &PoolId::from("eth-xyz"), ETH, 1.0, 0.0, 5.0)
            .unwrap_err();
        assert!(matches!(err, PoolError::PoolNotFound { .. }));
    }

    #[test]
    fn test_swap_params_use_default_tolerance() {
        let (store, id) = make_store();
        let engine = SwapEngine::default();
        let params = SwapParams {
            pool_id: id,
            token_in: "eth".into(),
            amount_in: 200.0,
            min_amount_out: 0.0,
            slippage_tolerance_percent: None,
        };
        // ~4% impact against the 3% default
        let quote = engine.simulate_swap(&store, &params).unwrap();
        assert!(!quote.executable);
    }

    #[test]
    fn test_analyze_price_impact_levels() {
        let store = PoolStore::seeded();
        let engine = SwapEngine::default();
        let id = PoolId::canonical(ETH, USDC);

        let small = engine.analyze_price_impact(&store, &id, ETH, 1.0).unwrap();
        assert_eq!(small.level, ImpactLevel::Low);
        assert_eq!(small.depth_tiers.len(), 5);

        let huge = engine
            .analyze_price_impact(&store, &id, ETH, 5_000.0)
            .unwrap();
        assert_eq!(huge.level, ImpactLevel::Extreme);
    }
}
