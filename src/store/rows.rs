//! Shared row-decoding helpers used by the store's operation modules.

use super::types::{AssetRecord, AssetVersionRecord, DataAvailability};
use crate::error::{PipelineError, Result};
use crate::task_params::GenerationTaskParameters;
use crate::version::VersionId;
use rusqlite::Row;

pub(crate) const ASSET_VERSION_COLUMNS: &str = "pathid, asset_pathid, version_0, version_1, \
    version_2, data_task_attr, data_produced, data_calculator_id, data";

/// The asset_versions row in its native SQLite column types, before any
/// JSON decoding that can fail independently of the query itself.
pub(crate) struct RawAssetVersionRow {
    pub path_id: String,
    pub asset_path_id: String,
    pub version_0: i64,
    pub version_1: i64,
    pub version_2: i64,
    pub data_task_attr: Option<String>,
    pub data_produced: i64,
    pub data_calculator_id: Option<String>,
    pub data: Option<String>,
}

pub(crate) fn read_asset_version_row(row: &Row<'_>) -> rusqlite::Result<RawAssetVersionRow> {
    Ok(RawAssetVersionRow {
        path_id: row.get(0)?,
        asset_path_id: row.get(1)?,
        version_0: row.get(2)?,
        version_1: row.get(3)?,
        version_2: row.get(4)?,
        data_task_attr: row.get(5)?,
        data_produced: row.get(6)?,
        data_calculator_id: row.get(7)?,
        data: row.get(8)?,
    })
}

pub(crate) fn decode_asset_version(raw: RawAssetVersionRow) -> Result<AssetVersionRecord> {
    let data = match raw.data {
        Some(text) => Some(serde_json::from_str(&text)?),
        None => None,
    };
    Ok(AssetVersionRecord {
        path_id: raw.path_id,
        asset_path_id: raw.asset_path_id,
        version_id: VersionId(raw.version_0, raw.version_1, raw.version_2),
        data_producer_task_attrs: GenerationTaskParameters::deserialize(
            raw.data_task_attr.as_deref().unwrap_or(""),
        )?,
        data_availability: DataAvailability::from_i64(raw.data_produced)?,
        data_calculator_id: raw.data_calculator_id,
        data,
    })
}

pub(crate) fn read_asset_row(row: &Row<'_>) -> rusqlite::Result<AssetRecord> {
    Ok(AssetRecord {
        path_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        type_name: row.get(3)?,
    })
}

/// Maps `rusqlite::Error::QueryReturnedNoRows` into the registry's
/// `NotFound`, leaving every other error untouched.
pub(crate) fn not_found_on_empty(err: rusqlite::Error, what: &str) -> PipelineError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => PipelineError::NotFound(what.to_string()),
        other => PipelineError::Sqlite(other),
    }
}
