//! Error types for mapgrid.
//!
//! The engine never errors on expected conditions: an out-of-bounds insert
//! returns `false`, a missing removal returns `None`, and a reload with a
//! degenerate scale is a no-op. Errors only arise from invalid configuration
//! handed to the builder.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MapGridError>;

/// Errors produced by mapgrid.
#[derive(Debug, Error)]
pub enum MapGridError {
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The universal rectangle handed to the builder is unusable.
    #[error("invalid universal rectangle: {0}")]
    InvalidRect(String),
}
