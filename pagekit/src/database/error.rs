//! Errors of the bundled sqlx data sources

use thiserror::Error;

/// Failure executing or assembling a paged query.
///
/// Execution failures wrap the underlying `sqlx::Error` unchanged; the
/// pagination core adds no retry or translation on top.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The underlying query failed to execute
    #[error("query execution failed: {0}")]
    Execute(#[from] sqlx::Error),

    /// The count query produced a value that is not a non-negative integer
    #[error("count query returned non-numeric value \"{value}\"")]
    InvalidCount {
        /// The offending value
        value: String,
    },

    /// The query shape cannot be rendered (bad identifier, missing FROM
    /// clause for a native count, list value outside an IN filter)
    #[error("unsupported query shape: {reason}")]
    UnsupportedQuery {
        /// What was wrong
        reason: String,
    },
}
