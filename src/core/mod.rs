// src/core/mod.rs

pub mod engine;
pub mod exploration;
pub mod scorer;
pub mod similarity;
pub mod tables;
pub mod types;
