//! Pool Registry
//!
//! Canonical store of pools keyed by their canonical pair id. One instance
//! is constructed by the host and shared by reference with the router.

use std::collections::{BTreeSet, HashMap};

use dex_core::{
    normalize_symbol, now_millis, symbol_violation, PoolError, PoolId, SortOrder, SwapId,
};
use tracing::{debug, info, warn};

use crate::calculator::calculate_spot_price;
use crate::constants::default_seed_pools;
use crate::state::{CreatePoolParams, Pool, PoolFilter, PoolSort, PoolSortField};

/// In-memory pool registry.
#[derive(Debug, Clone, Default)]
pub struct PoolStore {
    pools: HashMap<PoolId, Pool>,
    /// Creation order, used for unsorted listings
    order: Vec<PoolId>,
    last_swap_id: u64,
}

impl PoolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the default seed topology.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.seed_defaults();
        store
    }

    /// Register a new pool.
    ///
    /// Fails with `DuplicatePool` when the canonical id is already taken.
    pub fn create_pool(&mut self, params: CreatePoolParams) -> Result<Pool, PoolError> {
        validate_create_params(&params)?;

        let token_a = normalize_symbol(&params.token_a);
        let token_b = normalize_symbol(&params.token_b);
        let id = PoolId::canonical(&token_a, &token_b);

        if self.pools.contains_key(&id) {
            return Err(PoolError::DuplicatePool {
                pool_id: id.to_string(),
            });
        }

        let now = now_millis();
        let pool = Pool {
            id: id.clone(),
            token_a,
            token_b,
            reserve_a: params.reserve_a,
            reserve_b: params.reserve_b,
            fee_rate: params.fee_rate,
            invariant_k: params.reserve_a * params.reserve_b,
            current_price: calculate_spot_price(params.reserve_a, params.reserve_b),
            total_volume: 0.0,
            swap_count: 0,
            created_at: now,
            last_updated: now,
        };

        info!("Created pool {}", pool);
        self.order.push(id.clone());
        self.pools.insert(id, pool.clone());
        Ok(pool)
    }

    pub fn get_pool(&self, id: &PoolId) -> Option<&Pool> {
        self.pools.get(id)
    }

    pub fn get_pool_mut(&mut self, id: &PoolId) -> Option<&mut Pool> {
        self.pools.get_mut(id)
    }

    /// Look up the pool for a pair in either token order.
    pub fn find_pool_by_tokens(&self, token_a: &str, token_b: &str) -> Option<&Pool> {
        self.get_pool(&PoolId::canonical(token_a, token_b))
    }

    /// Iterate pools in creation order.
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.order.iter().filter_map(|id| self.pools.get(id))
    }

    /// List pools with an optional filter and sort.
    ///
    /// Without a sort, pools come back in creation order. Sorting is stable,
    /// so equal keys keep creation order too.
    pub fn list_pools(&self, filter: &PoolFilter, sort: Option<PoolSort>) -> Vec<&Pool> {
        let token = filter.token.as_deref().map(normalize_symbol);

        let mut pools: Vec<&Pool> = self
            .pools()
            .filter(|p| token.as_deref().map_or(true, |t| p.has_token(t)))
            .filter(|p| {
                filter
                    .min_liquidity_usd
                    .map_or(true, |min| p.liquidity_usd() >= min)
            })
            .collect();

        if let Some(sort) = sort {
            pools.sort_by(|a, b| {
                let ordering = match sort.field {
                    PoolSortField::Liquidity => a.liquidity_usd().total_cmp(&b.liquidity_usd()),
                    PoolSortField::Volume => a.total_volume.total_cmp(&b.total_volume),
                    PoolSortField::Price => a.current_price.total_cmp(&b.current_price),
                    PoolSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                match sort.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        pools
    }

    /// Every token symbol present in at least one pool.
    pub fn tokens(&self) -> BTreeSet<String> {
        self.pools
            .values()
            .flat_map(|p| [p.token_a.clone(), p.token_b.clone()])
            .collect()
    }

    pub fn has_token(&self, token: &str) -> bool {
        let token = normalize_symbol(token);
        self.pools.values().any(|p| p.has_token(&token))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Allocate the next swap id.
    pub fn next_swap_id(&mut self) -> SwapId {
        self.last_swap_id += 1;
        SwapId(self.last_swap_id)
    }

    /// Clear the registry and re-seed the default topology.
    pub fn reset_all(&mut self) {
        info!("Resetting pool registry ({} pools)", self.pools.len());
        self.pools.clear();
        self.order.clear();
        self.last_swap_id = 0;
        self.seed_defaults();
    }

    fn seed_defaults(&mut self) {
        for params in default_seed_pools() {
            if let Err(e) = self.create_pool(params) {
                warn!("Skipping seed pool: {}", e);
            }
        }
        debug!("Seeded {} default pools", self.pools.len());
    }
}

fn validate_create_params(params: &CreatePoolParams) -> Result<(), PoolError> {
    let token_a = normalize_symbol(&params.token_a);
    let token_b = normalize_symbol(&params.token_b);

    for symbol in [&token_a, &token_b] {
        if let Some(message) = symbol_violation(symbol) {
            return Err(PoolError::validation(message));
        }
    }
    if token_a == token_b {
        return Err(PoolError::validation(format!(
            "pool tokens must differ (got {} twice)",
            token_a
        )));
    }
    for (name, reserve) in [("reserve_a", params.reserve_a), ("reserve_b", params.reserve_b)] {
        if !reserve.is_finite() || reserve <= 0.0 {
            return Err(PoolError::validation(format!(
                "{} must be positive and finite (got {})",
                name, reserve
            )));
        }
    }
    if !params.fee_rate.is_finite() || !(0.0..1.0).contains(&params.fee_rate) {
        return Err(PoolError::validation(format!(
            "fee_rate must be in [0, 1) (got {})",
            params.fee_rate
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tokens::*;

    fn make_params(a: &str, b: &str, ra: f64, rb: f64) -> CreatePoolParams {
        CreatePoolParams::new(a, b, ra, rb, 0.003)
    }

    #[test]
    fn test_create_pool_sets_invariant_and_price() {
        let mut store = PoolStore::new();
        let pool = store
            .create_pool(make_params(ETH, USDC, 10_000.0, 20_000_000.0))
            .unwrap();
        assert_eq!(pool.id.as_str(), "eth-usdc");
        assert_eq!(pool.invariant_k, 10_000.0 * 20_000_000.0);
        assert_eq!(pool.current_price, 2_000.0);
        assert_eq!(pool.swap_count, 0);
        assert_eq!(pool.total_volume, 0.0);
    }

    #[test]
    fn test_create_duplicate_pool_fails_in_either_order() {
        let mut store = PoolStore::new();
        store.create_pool(make_params(ETH, USDC, 1.0, 2.0)).unwrap();
        let err = store
            .create_pool(make_params(USDC, ETH, 2.0, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            PoolError::DuplicatePool {
                pool_id: "eth-usdc".into()
            }
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_pool_validation() {
        let mut store = PoolStore::new();
        assert!(store.create_pool(make_params(ETH, "eth", 1.0, 1.0)).is_err());
        assert!(store.create_pool(make_params(ETH, USDC, 0.0, 1.0)).is_err());
        assert!(store.create_pool(make_params(ETH, USDC, 1.0, f64::NAN)).is_err());
        assert!(store
            .create_pool(CreatePoolParams::new(ETH, USDC, 1.0, 1.0, 1.0))
            .is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_separator_in_symbol_rejected() {
        let mut store = PoolStore::new();
        let err = store
            .create_pool(make_params("A-B", "C", 1.0, 1.0))
            .unwrap_err();
        assert_eq!(err.error_code(), "validation_error");

        // The pair that would have collided on "a-b-c" is free to exist.
        store.create_pool(make_params("A", "BC", 1.0, 1.0)).unwrap();
        assert!(store.create_pool(make_params("A", "B-C", 1.0, 1.0)).is_err());
        assert!(store.find_pool_by_tokens("A", "B-C").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_pool_by_tokens_matches_creation_normalization() {
        let mut store = PoolStore::new();
        let pool = store
            .create_pool(make_params("straße", USDC, 1_000.0, 1_000.0))
            .unwrap();
        assert_eq!(pool.token_a, "STRASSE");

        let found = store.find_pool_by_tokens("straße", "usdc").unwrap();
        assert_eq!(found.id, pool.id);
        assert!(store.find_pool_by_tokens(USDC, "STRASSE").is_some());
    }

    #[test]
    fn test_find_pool_by_tokens() {
        let store = PoolStore::seeded();
        let a = store.find_pool_by_tokens(ETH, USDC).unwrap();
        let b = store.find_pool_by_tokens("usdc", "eth").unwrap();
        assert_eq!(a.id, b.id);
        assert!(store.find_pool_by_tokens(ETH, USDT).is_none());
    }

    #[test]
    fn test_list_pools_filter_by_token() {
        let store = PoolStore::seeded();
        let filter = PoolFilter {
            token: Some("weth".into()),
            ..Default::default()
        };
        let pools = store.list_pools(&filter, None);
        assert_eq!(pools.len(), 2);
        assert!(pools.iter().all(|p| p.has_token(WETH)));
    }

    #[test]
    fn test_list_pools_filter_by_liquidity() {
        let store = PoolStore::seeded();
        let filter = PoolFilter {
            min_liquidity_usd: Some(10_000_000.0),
            ..Default::default()
        };
        let pools = store.list_pools(&filter, None);
        // ETH/USDC, BTC/USDC ($40M), WETH/ETH ($20M), USDC/DAI, USDC/USDT ($10M)
        assert_eq!(pools.len(), 5);
        assert!(pools.iter().all(|p| p.liquidity_usd() >= 10_000_000.0));
    }

    #[test]
    fn test_list_pools_sorted_by_liquidity() {
        let store = PoolStore::seeded();
        let desc = store.list_pools(
            &PoolFilter::default(),
            Some(PoolSort::new(PoolSortField::Liquidity, SortOrder::Desc)),
        );
        for pair in desc.windows(2) {
            assert!(pair[0].liquidity_usd() >= pair[1].liquidity_usd());
        }

        let asc = store.list_pools(
            &PoolFilter::default(),
            Some(PoolSort::new(PoolSortField::Price, SortOrder::Asc)),
        );
        for pair in asc.windows(2) {
            assert!(pair[0].current_price <= pair[1].current_price);
        }
    }

    #[test]
    fn test_reset_restores_exact_seed_reserves() {
        let mut store = PoolStore::seeded();
        let id = PoolId::canonical(ETH, USDC);
        {
            let pool = store.get_pool_mut(&id).unwrap();
            pool.reserve_a += 50.0;
            pool.reserve_b -= 99_000.0;
        }
        store.create_pool(make_params("LINK", ETH, 1.0, 1.0)).unwrap();
        store.next_swap_id();

        store.reset_all();

        let seeds = default_seed_pools();
        let pools = store.list_pools(&PoolFilter::default(), None);
        assert_eq!(pools.len(), seeds.len());
        for (pool, seed) in pools.iter().zip(seeds.iter()) {
            assert_eq!(pool.id, PoolId::canonical(&seed.token_a, &seed.token_b));
            assert_eq!(pool.reserve_a, seed.reserve_a);
            assert_eq!(pool.reserve_b, seed.reserve_b);
            assert_eq!(pool.fee_rate, seed.fee_rate);
            assert_eq!(pool.swap_count, 0);
        }
        assert_eq!(store.next_swap_id(), SwapId(1));
    }

    #[test]
    fn test_tokens_lists_every_symbol() {
        let store = PoolStore::seeded();
        let tokens: Vec<String> = store.tokens().into_iter().collect();
        assert_eq!(tokens, vec!["BTC", "DAI", "ETH", "USDC", "USDT", "WETH"]);
        assert!(store.has_token("dai"));
        assert!(!store.has_token("LINK"));
    }
}
