use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Category, Partition};

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur while the
/// tool reads reward exports, aggregates them, or writes the artifacts.
///
/// Every variant is fatal for the run: nothing is skipped and nothing is
/// written once one of them is raised.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Raised when a `user` cell is not a well-formed account address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Raised when a `tvl_tier` cell carries none of the known tier markers.
    #[error("invalid tier: {0}")]
    InvalidTier(String),

    /// Raised when a `prize` cell is not a finite, non-negative decimal.
    #[error("invalid prize amount '{0}'")]
    InvalidPrize(String),

    /// Raised when the configured token price cannot be used as a divisor.
    #[error("token price must be a finite value greater than zero, got {0}")]
    InvalidPrice(f64),

    /// Raised when an address shows up twice in the same category export.
    #[error("duplicate user: {address} in {category}, {partition}")]
    DuplicateRecord {
        address: String,
        partition: Partition,
        category: Category,
    },

    /// Raised when an input export is missing, unreadable, or malformed.
    #[error("failed to read {}: {source}", .path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Raised when the user provides a path that does not exist.
    #[error("input not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when an output artifact could not be persisted.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a running total no longer fits the 256-bit accumulator.
    #[error("reward amount overflowed 256 bits")]
    AmountOverflow,

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
