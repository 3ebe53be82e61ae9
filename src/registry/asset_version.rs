//! The read-through handle for a single asset version.

use crate::error::{PipelineError, Result};
use crate::future::{CompletedFuture, PipelineFuture};
use crate::scheduler::TaskScheduler;
use crate::store::types::{AssetVersionRecord, DataAvailability};
use crate::store::Store;
use serde_json::Value;

/// A handle to one published asset version.
///
/// Holds only its `path_id`; every accessor re-reads the store, so the
/// handle always reflects the current row rather than a snapshot taken
/// at lookup time.
#[derive(Debug, Clone)]
pub struct AssetVersion {
    store: Store,
    path_id: String,
}

impl AssetVersion {
    pub(crate) fn new(store: Store, path_id: String) -> AssetVersion {
        AssetVersion { store, path_id }
    }

    /// This version's own `path_id`.
    pub fn path_id(&self) -> &str {
        &self.path_id
    }

    /// The current catalog row.
    pub fn data(&self) -> Result<AssetVersionRecord> {
        self.store.get_asset_version_data_from_path_id(&self.path_id)
    }

    /// Whether this version's computed payload is available to read.
    pub fn is_data_available(&self) -> Result<bool> {
        Ok(self.data()?.data_availability == DataAvailability::Available)
    }

    /// The computed payload. Fails with
    /// [`PipelineError::DataNotYetAvailable`] unless `is_data_available()`.
    pub fn get_data(&self) -> Result<Value> {
        let record = self.data()?;
        match (record.data_availability, record.data) {
            (DataAvailability::Available, Some(data)) => Ok(data),
            _ => Err(PipelineError::DataNotYetAvailable(self.path_id.clone())),
        }
    }

    /// Whether the computed payload has `field` as a top-level key.
    pub fn has_field(&self, field: &str) -> Result<bool> {
        Ok(self
            .get_data()?
            .as_object()
            .map(|obj| obj.contains_key(field))
            .unwrap_or(false))
    }

    /// A single top-level field of the computed payload, or `Value::Null`
    /// if absent.
    pub fn get_field(&self, field: &str) -> Result<Value> {
        Ok(self
            .get_data()?
            .as_object()
            .and_then(|obj| obj.get(field))
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// `path_id`s of the versions this one depends on.
    pub fn dependencies(&self) -> Result<Vec<String>> {
        self.store.get_version_dependencies(&self.path_id)
    }

    /// `path_id`s of the versions that depend on this one.
    pub fn dependents(&self) -> Result<Vec<String>> {
        self.store.get_dependent_versions(&self.path_id)
    }

    /// Whether no other version currently depends on this one.
    pub fn is_leaf(&self) -> Result<bool> {
        Ok(self.dependents()?.is_empty())
    }

    /// Wires additional dependency edges onto this version; a no-op for
    /// any edge that already exists.
    pub fn add_dependencies(&self, dependency_path_ids: &[String]) -> Result<()> {
        self.store.add_dependencies(&self.path_id, dependency_path_ids)
    }

    /// Ensures this version's data is being computed, returning a future
    /// that resolves once it is available.
    ///
    /// Short-circuits to an already-resolved future if the data is
    /// already available, without calling the scheduler at all; otherwise
    /// delegates to [`Store::schedule_data_computation`], which itself
    /// dedups concurrent callers onto a single in-flight job.
    pub fn schedule_data_calculation_if_needed(
        &self,
        scheduler: &dyn TaskScheduler,
    ) -> Result<Box<dyn PipelineFuture<bool>>> {
        if self.is_data_available()? {
            return Ok(Box::new(CompletedFuture::new(true)));
        }
        self.store.schedule_data_computation(&self.path_id, scheduler)
    }
}
