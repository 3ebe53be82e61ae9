//! The transactional registry (spec §4.4, component C4).
//!
//! `Store` is the center of gravity of the crate: every other component
//! (the registry façade, the template engine, the URI resolver) reads and
//! writes the catalog exclusively through it. Each public mutator opens
//! its own connection and runs inside a single `BEGIN IMMEDIATE`
//! transaction, so concurrent callers — threads in this process, or
//! separate processes sharing the database file — serialize correctly
//! without the `Store` needing any in-process locking of its own.

mod asset;
mod compute;
mod dependency;
mod rows;
mod schema;
mod template;
pub mod types;
mod version;

use crate::env;
use crate::error::{PipelineError, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// A handle to the registry's backing SQLite database.
///
/// Cheap to clone-by-construction (it is just a path); every operation
/// opens a fresh connection, matching spec §4.4's "one connection per
/// call".
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    /// Opens (creating if absent) the database at `path`, applying the
    /// registry's pragmas and schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Store> {
        let db_path = path.into();
        let conn = Self::connect(&db_path)?;
        drop(conn);
        Ok(Store { db_path })
    }

    /// Opens `<PIPELINE_ROOT>/<file_name>`, failing with
    /// [`PipelineError::InvalidArgument`] if `PIPELINE_ROOT` is unset.
    pub fn open_in_pipeline_root(file_name: &str) -> Result<Store> {
        let root = env::pipeline_root().ok_or_else(|| {
            PipelineError::InvalidArgument("PIPELINE_ROOT is not set".to_string())
        })?;
        Self::open(root.join(file_name))
    }

    /// Path to the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path)?;
        schema::init_schema(&conn)?;
        Ok(conn)
    }

    pub(crate) fn conn(&self) -> Result<Connection> {
        Self::connect(&self.db_path)
    }
}
