//! Error handling for the pipeline registry.
//!
//! All public APIs return `Result<T, PipelineError>`.

use thiserror::Error;

/// Result type for pipeline registry operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while operating the registry.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A referenced asset, version, template, asset type, or URI handler
    /// does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A duplicate explicit version id, a stale data-computation state
    /// transition, or a bad foreign key at publish time.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No registered URI handler accepts the given URI.
    #[error("uri not supported: {0}")]
    UriNotSupported(String),

    /// A data field was accessed before `data_availability == AVAILABLE`.
    #[error("data not yet available: {0}")]
    DataNotYetAvailable(String),

    /// The compute scheduler could not reach its backend.
    #[error("scheduler unavailable: {0}")]
    SchedulerUnavailable(String),

    /// Argument failed validation before reaching the store.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected failure from the embedded database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failure decoding a JSON-serialized field.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
