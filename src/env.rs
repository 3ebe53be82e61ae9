//! Resolution of the registry's three environment variables (spec §6).

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Directory holding the registry's SQLite database file.
pub const PIPELINE_ROOT: &str = "PIPELINE_ROOT";
/// Root under which staged source files are exposed (consumed only by
/// external plug-ins; the registry itself never reads under this path).
pub const PIPELINE_STORAGE_ROOT: &str = "PIPELINE_STORAGE_ROOT";
/// JSON mapping used by default-version and dynamic-URI lock resolution.
pub const LBATTR_LOCKED_ASSET_VERSIONS: &str = "LBATTR_locked_asset_versions";

/// `PIPELINE_ROOT`, if set.
pub fn pipeline_root() -> Option<PathBuf> {
    env::var_os(PIPELINE_ROOT).map(PathBuf::from)
}

/// `PIPELINE_STORAGE_ROOT`, if set.
pub fn pipeline_storage_root() -> Option<PathBuf> {
    env::var_os(PIPELINE_STORAGE_ROOT).map(PathBuf::from)
}

/// Parses `LBATTR_locked_asset_versions` as a JSON object of
/// `asset_path_id`/`uri string` → `version_path_id`. Missing or
/// unparseable values default to an empty mapping, matching the
/// permissiveness of the original `json.loads(os.environ.get(..., '{}'))`.
pub fn locked_asset_versions() -> HashMap<String, String> {
    env::var(LBATTR_LOCKED_ASSET_VERSIONS)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}
