//! Tracing subscriber setup for binaries and demos built on the registry.
//!
//! The library itself only emits `tracing` events; callers decide whether
//! and how to install a subscriber. `init_logging` is a convenience entry
//! point for demos and tests that want sane defaults.

use crate::error::{PipelineError, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `tracing_subscriber::fmt` subscriber filtered by `level`
/// (an `EnvFilter` directive string, e.g. `"info"` or
/// `"pipeline_registry=debug"`).
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_new(level)
                .map_err(|e| PipelineError::InvalidArgument(format!("invalid log level: {e}")))?,
        )
        .with_target(true)
        .try_init()
        .map_err(|_| PipelineError::InvalidArgument("logging already initialized".into()))
}
