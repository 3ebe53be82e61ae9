//! The read-through registry façade (spec §3, component C6).
//!
//! `Registry` is the client-facing entry point: it wraps a [`Store`] with
//! ergonomic `Asset`/`AssetVersion` handles and wires publishing into the
//! template-cascade engine so callers don't have to invoke it by hand.

mod asset;
mod asset_version;
pub mod template_engine;

pub use asset::Asset;
pub use asset_version::AssetVersion;

use crate::error::Result;
use crate::store::types::AssetRecord;
use crate::store::Store;
use crate::task_params::GenerationTaskParameters;
use crate::uri::Uri;
use crate::version::VersionId;

/// The registry's public entry point, owning a [`Store`] handle.
#[derive(Debug, Clone)]
pub struct Registry {
    store: Store,
}

impl Registry {
    /// Wraps an already-open store.
    pub fn new(store: Store) -> Registry {
        Registry { store }
    }

    /// The backing store, for callers that need the lower-level API.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Registers a new asset and returns a handle to it.
    pub fn create_asset(&self, type_name: &str, asset_data: AssetRecord) -> Result<Asset> {
        let created = self.store.create_new_asset(type_name, asset_data)?;
        Ok(Asset::new(self.store.clone(), created.path_id))
    }

    /// Looks up an existing asset by id.
    pub fn get_asset(&self, path_id: &str) -> Result<Asset> {
        self.store.get_asset_data(path_id)?;
        Ok(Asset::new(self.store.clone(), path_id.to_string()))
    }

    /// Looks up an existing asset version by its own `path_id`.
    pub fn get_asset_version(&self, path_id: &str) -> Result<AssetVersion> {
        self.store.get_asset_version_data_from_path_id(path_id)?;
        Ok(AssetVersion::new(self.store.clone(), path_id.to_string()))
    }

    /// Publishes a new version of `asset_path_id` and cascades it through
    /// any templates it triggers, returning every version the publish
    /// transitively produced (the published version first).
    ///
    /// Cascading uses a worklist, so a diamond in the trigger graph (two
    /// paths converging on the same downstream template) produces that
    /// template's asset twice, once per path — the template engine does
    /// not deduplicate across triggers. A thin convenience over
    /// [`Asset::create_new_generic_version`] for callers that don't need
    /// to declare a template from this publish's lock mapping.
    pub fn publish_new_asset_version(
        &self,
        asset_path_id: &str,
        version_id: Option<VersionId>,
        data_producer_task_attrs: GenerationTaskParameters,
        dependencies: &[String],
    ) -> Result<Vec<AssetVersion>> {
        let asset = Asset::new(self.store.clone(), asset_path_id.to_string());
        let (published, triggered) = asset.create_new_generic_version(
            version_id,
            Some(data_producer_task_attrs),
            dependencies,
            false,
        )?;
        let mut produced = vec![published];
        produced.extend(triggered);
        Ok(produced)
    }

    /// Resolves a URI against the registry (component C8), honoring any
    /// environment-supplied asset-version locks.
    pub fn resolve(&self, uri: &str, locked_versions: &std::collections::HashMap<String, String>) -> Result<serde_json::Value> {
        let parsed = Uri::parse(uri)
            .ok_or_else(|| crate::error::PipelineError::UriNotSupported(uri.to_string()))?;
        crate::resolver::Resolver::new().resolve(&self.store, &parsed, locked_versions)
    }

    /// Whether `uri` resolves differently depending on environment locks.
    pub fn is_dynamic(&self, uri: &str) -> Result<bool> {
        let parsed = Uri::parse(uri)
            .ok_or_else(|| crate::error::PipelineError::UriNotSupported(uri.to_string()))?;
        crate::resolver::Resolver::new().is_dynamic(&self.store, &parsed)
    }
}
