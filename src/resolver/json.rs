//! Converts catalog records to JSON for attribute-query lookups.

use crate::store::types::{AssetRecord, AssetVersionRecord};
use serde_json::{json, Value};

pub(super) fn asset_to_json(asset: &AssetRecord) -> Value {
    json!({
        "path_id": asset.path_id,
        "name": asset.name,
        "description": asset.description,
        "type_name": asset.type_name,
    })
}

pub(super) fn asset_version_to_json(version: &AssetVersionRecord) -> Value {
    json!({
        "path_id": version.path_id,
        "asset_path_id": version.asset_path_id,
        "version_id": version.version_id.dotted(),
        "data_availability": format!("{:?}", version.data_availability),
        "data_calculator_id": version.data_calculator_id,
        "data": version.data,
    })
}

/// Looks up `attribute` on an object value, per the resolver's "missing
/// attribute -> empty string" contract.
pub(super) fn lookup_attribute(value: &Value, attribute: &str) -> Value {
    value
        .get(attribute)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}
