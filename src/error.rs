// File: src/error.rs
use crate::core::types::UserId;

/// Result alias used throughout the crate.
pub type BasketResult<T> = Result<T, BasketError>;

/// Errors raised while predicting or scoring baskets.
#[derive(Debug, thiserror::Error)]
pub enum BasketError {
    #[error("unsupported prediction method: {method}")]
    UnsupportedMethod { method: String },

    #[error("user {user_id} not found in {table} table")]
    UnknownUser { user_id: UserId, table: &'static str },

    #[error("{what} is undefined: denominator is zero")]
    DivisionUndefined { what: &'static str },

    #[error("method {method} requires the {table} table, which was not supplied")]
    MissingTable {
        method: &'static str,
        table: &'static str,
    },

    #[error("threshold must lie in [0, 1], got {value}")]
    InvalidThreshold { value: f64 },

    #[error("invalid frequency {value} for item {item_id}")]
    InvalidFrequency { item_id: u64, value: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
