//! Error types for EcoLlajta.

use thiserror::Error;

/// Errors returned by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Not enough workers to staff every stage at its minimum.
    #[error("Cannot optimize with fewer than {required} available workers (got {available}).")]
    InsufficientWorkers { available: u32, required: u32 },
}

/// Errors raised while loading timing configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read timing file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid timing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid timing JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.csv` nor `.json`.
    #[error("unsupported timing file format: {0}")]
    UnsupportedFormat(String),
}
