//! Row-shaped records returned by the [`crate::store::Store`].
//!
//! These mirror the literal columns of spec §6 rather than any
//! client-facing ergonomics; the registry façade (`crate::registry`) wraps
//! them in read-through handles.

use crate::task_params::GenerationTaskParameters;
use crate::version::VersionId;
use serde_json::Value;

/// A catalog entry for an asset (spec §3 `Asset`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Globally unique, stable identifier.
    pub path_id: String,
    /// Human-friendly display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Names a polymorphic asset variant registered with the asset-type
    /// registry (C9).
    pub type_name: String,
}

/// The data-computation state machine (spec §4.4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataAvailability {
    /// No computation has ever been scheduled, or the prior job's result
    /// was discarded.
    NotComputed,
    /// A computation is in flight; `data_calculator_id` names it.
    IsComputing,
    /// `data` holds the computed payload.
    Available,
}

impl DataAvailability {
    pub(crate) fn from_i64(v: i64) -> crate::error::Result<DataAvailability> {
        match v {
            0 => Ok(DataAvailability::NotComputed),
            1 => Ok(DataAvailability::IsComputing),
            2 => Ok(DataAvailability::Available),
            other => Err(crate::error::PipelineError::Sqlite(
                rusqlite::Error::IntegralValueOutOfRange(0, other),
            )),
        }
    }

    pub(crate) fn as_i64(self) -> i64 {
        match self {
            DataAvailability::NotComputed => 0,
            DataAvailability::IsComputing => 1,
            DataAvailability::Available => 2,
        }
    }
}

/// A concrete revision of an asset (spec §3 `AssetVersion`).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetVersionRecord {
    /// Default `"<asset_path_id>/<dotted-version>"`.
    pub path_id: String,
    /// Foreign key to [`AssetRecord::path_id`].
    pub asset_path_id: String,
    /// The three-tier version number.
    pub version_id: VersionId,
    /// How this version's payload should be computed.
    pub data_producer_task_attrs: GenerationTaskParameters,
    /// Current state of the computed payload.
    pub data_availability: DataAvailability,
    /// Opaque scheduler event id while `IsComputing`.
    pub data_calculator_id: Option<String>,
    /// The computed payload, present iff `data_availability == Available`.
    pub data: Option<Value>,
}

/// Input to [`crate::store::Store::publish_new_asset_version`].
///
/// `path_id` and `version_id` are auto-assigned per spec §4.1/§4.4 when
/// left unset; the data-computation fields always start at
/// `NotComputed`/`None`/`None` regardless of what the caller supplies.
#[derive(Debug, Clone, Default)]
pub struct NewAssetVersion {
    /// Explicit path id, or `None` to derive it from the asset and
    /// version.
    pub path_id: Option<String>,
    /// Explicit version id, or `None` to allocate the next one.
    pub version_id: Option<VersionId>,
    /// Task parameters for computing this version's data.
    pub data_producer_task_attrs: GenerationTaskParameters,
}

/// A declarative trigger rule (spec §3 `AssetTemplate`).
#[derive(Debug, Clone, PartialEq)]
pub struct AssetTemplateRecord {
    /// The asset whose versions this template produces.
    pub asset_path_id: String,
    /// Task parameters copied (and lock-updated) into every derived
    /// version.
    pub data_producer_task_attrs: GenerationTaskParameters,
}
