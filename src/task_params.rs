//! The structured record carried by every asset version describing how its
//! data should be produced.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Environment-resolution parameters passed through to the compute
/// scheduler, opaque to the registry itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentArguments {
    /// Name of the environment resolver to use; empty string means
    /// "whatever the scheduler backend defaults to".
    #[serde(default)]
    pub name: String,
    /// Opaque resolver attributes.
    #[serde(default)]
    pub attribs: Map<String, Value>,
}

/// The per-version record describing how a version's payload data should
/// be (re)computed.
///
/// Serializes to the `data_task_attr` column as the JSON object
/// `{"lock": {...}, "attrib": {...}, "env": {"name": ..., "attribs": ...}}`;
/// missing keys on deserialize default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTaskParameters {
    /// Maps `asset_path_id` to the `version_path_id` it is locked to for
    /// this computation, populated by the template engine as triggers
    /// fire.
    #[serde(rename = "lock", default)]
    pub version_lock_mapping: HashMap<String, String>,
    /// Opaque attributes handed to the scheduler backend.
    #[serde(rename = "attrib", default)]
    pub attributes: Map<String, Value>,
    /// Opaque environment-resolution record.
    #[serde(rename = "env", default)]
    pub environment_arguments: EnvironmentArguments,
}

impl GenerationTaskParameters {
    /// Serializes to the on-disk JSON representation.
    pub fn serialize(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses the on-disk JSON representation, defaulting any missing
    /// top-level key to empty.
    pub fn deserialize(data: &str) -> serde_json::Result<GenerationTaskParameters> {
        if data.is_empty() {
            return Ok(GenerationTaskParameters::default());
        }
        serde_json::from_str(data)
    }
}
