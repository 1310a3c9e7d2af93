//! Error types for the singleton DEX engine

use thiserror::Error;

/// Top-level errors that can occur in the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Pool registry and single-swap errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("Pool not found: {pool_id}")]
    PoolNotFound { pool_id: String },

    #[error("Pool already exists: {pool_id}")]
    DuplicatePool { pool_id: String },

    #[error("Price impact {impact:.4}% exceeds slippage tolerance {tolerance}%")]
    SlippageExceeded { impact: f64, tolerance: f64 },

    #[error("Output below minimum: got {got}, need {min}")]
    MinimumOutputNotMet { got: f64, min: f64 },

    #[error("Output {amount_out} would drain more than {max_fraction_percent}% of reserve {reserve_out}")]
    LiquidityExhaustion {
        amount_out: f64,
        reserve_out: f64,
        max_fraction_percent: f64,
    },
}

/// Routing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("Invalid route request: {message}")]
    Validation { message: String },

    #[error("Token not found in any pool: {token}")]
    TokenNotFound { token: String },

    #[error("No route found from {token_in} to {token_out}")]
    NoRouteFound { token_in: String, token_out: String },

    #[error("Route {route_id} is infeasible: cumulative impact {impact:.4}% exceeds {max_impact}%")]
    InfeasibleRoute {
        route_id: String,
        impact: f64,
        max_impact: f64,
    },

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

impl PoolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::PoolNotFound { .. } => "pool_not_found",
            Self::DuplicatePool { .. } => "duplicate_pool",
            Self::SlippageExceeded { .. } => "slippage_exceeded",
            Self::MinimumOutputNotMet { .. } => "minimum_output_not_met",
            Self::LiquidityExhaustion { .. } => "liquidity_exhaustion",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::PoolNotFound { .. } => 404,
            Self::DuplicatePool { .. } => 409,
            Self::SlippageExceeded { .. }
            | Self::MinimumOutputNotMet { .. }
            | Self::LiquidityExhaustion { .. } => 422,
        }
    }
}

impl RouteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::TokenNotFound { .. } => "token_not_found",
            Self::NoRouteFound { .. } => "no_route_found",
            Self::InfeasibleRoute { .. } => "infeasible_route",
            Self::Pool(e) => e.error_code(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::TokenNotFound { .. } | Self::NoRouteFound { .. } => 404,
            Self::InfeasibleRoute { .. } => 422,
            Self::Pool(e) => e.status_code(),
        }
    }
}
