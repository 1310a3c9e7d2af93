//! dex-core: Shared types, errors, and configuration
//!
//! This crate provides the foundational types used across the singleton DEX
//! workspace: pool and token identifiers, the engine error taxonomy, and the
//! tunable engine configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
