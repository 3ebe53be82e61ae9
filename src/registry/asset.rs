//! The read-through handle for a single asset.

use super::template_engine;
use super::AssetVersion;
use crate::env;
use crate::error::Result;
use crate::store::types::{AssetRecord, NewAssetVersion};
use crate::store::Store;
use crate::task_params::GenerationTaskParameters;
use crate::version::VersionId;

/// A handle to one asset in the catalog.
#[derive(Debug, Clone)]
pub struct Asset {
    store: Store,
    path_id: String,
}

impl Asset {
    pub(crate) fn new(store: Store, path_id: String) -> Asset {
        Asset { store, path_id }
    }

    /// This asset's own `path_id`.
    pub fn path_id(&self) -> &str {
        &self.path_id
    }

    /// The current catalog row.
    pub fn data(&self) -> Result<AssetRecord> {
        self.store.get_asset_data(&self.path_id)
    }

    /// The specific version named by `version_id`.
    pub fn get_version(&self, version_id: VersionId) -> Result<AssetVersion> {
        let record = self.store.get_asset_version_data(&self.path_id, Some(version_id))?;
        Ok(AssetVersion::new(self.store.clone(), record.path_id))
    }

    /// The most recently published version.
    pub fn get_latest_version(&self) -> Result<AssetVersion> {
        let record = self.store.get_asset_version_data(&self.path_id, None)?;
        Ok(AssetVersion::new(self.store.clone(), record.path_id))
    }

    /// The version this asset currently resolves to by default: an
    /// environment-supplied lock keyed on this asset's bare `path_id` if
    /// one names a version of this same asset, otherwise the latest
    /// published version. This is distinct from the `assetver:`-prefixed
    /// key the `assetver:` URI resolver uses — that convention belongs to
    /// the resolver, not to this façade.
    pub fn get_default_version(&self) -> Result<AssetVersion> {
        let locks = env::locked_asset_versions();
        if let Some(locked_path_id) = locks.get(&self.path_id) {
            if let Ok(record) = self.store.get_asset_version_data_from_path_id(locked_path_id) {
                if record.asset_path_id == self.path_id {
                    return Ok(AssetVersion::new(self.store.clone(), record.path_id));
                }
            }
        }
        self.get_latest_version()
    }

    /// The latest version, or the version pinned to `version_id` when
    /// given. Kept for callers that already hold an optional version id;
    /// prefer [`Asset::get_version`]/[`Asset::get_latest_version`] for new
    /// code.
    pub fn version(&self, version_id: Option<VersionId>) -> Result<AssetVersion> {
        match version_id {
            Some(v) => self.get_version(v),
            None => self.get_latest_version(),
        }
    }

    /// Publishes a new version of this asset and cascades it through any
    /// templates it triggers.
    ///
    /// When `create_template_from_locks` is set and `data_producer_task_attrs`
    /// carries a non-empty `version_lock_mapping`, the lock mapping's keys
    /// become the new (or updated) template's trigger assets and its
    /// values are excluded from the stored fixed-dependency set (they are
    /// supplied by the lock mapping itself at cascade time, not pinned).
    /// Returns the published version first, then every version the
    /// publish transitively triggered.
    pub fn create_new_generic_version(
        &self,
        version_id: Option<VersionId>,
        data_producer_task_attrs: Option<GenerationTaskParameters>,
        dependencies: &[String],
        create_template_from_locks: bool,
    ) -> Result<(AssetVersion, Vec<AssetVersion>)> {
        let task_attrs = data_producer_task_attrs.unwrap_or_default();

        let published = self.store.publish_new_asset_version(
            &self.path_id,
            NewAssetVersion {
                path_id: None,
                version_id,
                data_producer_task_attrs: task_attrs.clone(),
            },
            dependencies,
        )?;

        let triggered = template_engine::cascade_from(&self.store, published.clone())?;

        if create_template_from_locks && !task_attrs.version_lock_mapping.is_empty() {
            let trigger_asset_path_ids: Vec<String> =
                task_attrs.version_lock_mapping.keys().cloned().collect();
            let locked_version_path_ids: Vec<&String> =
                task_attrs.version_lock_mapping.values().collect();
            let fixed_dependency_version_path_ids: Vec<String> = dependencies
                .iter()
                .filter(|d| !locked_version_path_ids.contains(d))
                .cloned()
                .collect();
            self.store.create_asset_template(
                &self.path_id,
                task_attrs,
                &trigger_asset_path_ids,
                &fixed_dependency_version_path_ids,
            )?;
        }

        Ok((
            AssetVersion::new(self.store.clone(), published.path_id),
            triggered
                .into_iter()
                .map(|v| AssetVersion::new(self.store.clone(), v.path_id))
                .collect(),
        ))
    }
}
