//! Singleton DEX host application library

pub mod config;
pub mod state;

use anyhow::{Context, Result};
use dex_core::{PoolId, SortOrder};
use router::{AutoSwapParams, SearchOptions};
use serde::Serialize;

pub use config::AppConfig;
pub use state::AppState;

/// Install the global tracing subscriber, honoring `RUST_LOG`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into());
    let filter = match "router=debug".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", label))?;
    println!("== {} ==\n{}", label, json);
    Ok(())
}

/// Run the demo session against a freshly configured engine
pub async fn run() -> Result<()> {
    init_tracing();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!("Starting singleton DEX simulator");

    let state = AppState::with_config(config);

    let sort = amm::PoolSort {
        field: amm::PoolSortField::Liquidity,
        order: SortOrder::Desc,
    };
    let pools = state.list_pools(&amm::PoolFilter::default(), Some(sort)).await;
    print_json("pools", &pools)?;

    let eth_usdc = PoolId::canonical(amm::tokens::ETH, amm::tokens::USDC);
    if state.get_pool(&eth_usdc).await.is_some() {
        let quote = state
            .simulate_swap(&amm::SwapParams {
                pool_id: eth_usdc.clone(),
                token_in: amm::tokens::ETH.to_string(),
                amount_in: 100.0,
                min_amount_out: 0.0,
                slippage_tolerance_percent: None,
            })
            .await
            .context("Quote on ETH/USDC failed")?;
        print_json("quote", &quote)?;

        let impact = state
            .analyze_price_impact(&eth_usdc, amm::tokens::ETH, 1_000.0)
            .await
            .context("Impact analysis failed")?;
        print_json("price impact", &impact)?;
    }

    let options = SearchOptions::default().with_slippage(5.0);
    let comparison = state
        .compare_routes(amm::tokens::ETH, amm::tokens::DAI, 50.0, &options)
        .await;
    match comparison {
        Ok(report) => print_json("route comparison", &report)?,
        Err(e) => tracing::warn!("Route comparison unavailable: {}", e),
    }

    let swap = state
        .auto_swap(&AutoSwapParams {
            token_in: amm::tokens::ETH.to_string(),
            token_out: amm::tokens::DAI.to_string(),
            amount_in: 10.0,
            min_amount_out: 0.0,
            recipient: "demo".to_string(),
            options,
        })
        .await;
    match swap {
        Ok(result) => print_json("auto swap", &result)?,
        Err(e) => tracing::warn!("Auto swap skipped: {}", e),
    }

    state.reset_all().await;
    tracing::info!("Demo finished");
    Ok(())
}
