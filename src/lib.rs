// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::{EvalConfig, FailurePolicy};
pub use crate::core::engine::{Method, PredictionEngine};
pub use crate::core::scorer::BatchScorer;
pub use crate::core::similarity::Metric;
pub use crate::error::{BasketError, BasketResult};
