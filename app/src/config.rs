//! Application configuration

use std::path::Path;

use anyhow::{Context, Result};
use dex_core::EngineConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "DEX_SIM_CONFIG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine thresholds and gas model
    #[serde(default)]
    pub engine: EngineConfig,

    /// Populate the store with the default pool topology at startup
    #[serde(default = "default_seed_default_pools")]
    pub seed_default_pools: bool,
}

fn default_seed_default_pools() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed_default_pools: default_seed_default_pools(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config JSON in {}", path.display()))?;
        config
            .engine
            .validate()
            .with_context(|| format!("Invalid engine config in {}", path.display()))?;
        Ok(config)
    }

    /// Load from the file named by `DEX_SIM_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading config from {}", path);
                Self::from_file(path.trim())
            }
            _ => {
                tracing::debug!("{} not set, using default config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("dex-sim-{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.seed_default_pools);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_from_file_partial() {
        let path = write_temp(
            "partial",
            r#"{"seed_default_pools": false, "engine": {"router": {"max_hops": 2}}}"#,
        );
        let config = AppConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!config.seed_default_pools);
        assert_eq!(config.engine.router.max_hops, 2);
        assert_eq!(config.engine.swap.default_slippage_tolerance_percent, 3.0);
    }

    #[test]
    fn test_from_file_rejects_invalid_engine() {
        let path = write_temp("invalid", r#"{"engine": {"router": {"max_hops": 0}}}"#);
        let err = AppConfig::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(err.to_string().contains("Invalid engine config"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/dex-sim.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
