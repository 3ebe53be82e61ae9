//! Literal DDL for the registry's tables (spec §6).

use rusqlite::Connection;

pub(crate) const INIT_SQL: &str = "
CREATE TABLE IF NOT EXISTS assets (
    pathid      TEXT PRIMARY KEY,
    name        TEXT,
    description TEXT,
    type_name   TEXT
);

CREATE TABLE IF NOT EXISTS asset_versions (
    pathid             TEXT PRIMARY KEY,
    asset_pathid       TEXT NOT NULL REFERENCES assets(pathid) ON DELETE CASCADE,
    version_0          INTEGER NOT NULL DEFAULT 0,
    version_1          INTEGER NOT NULL DEFAULT -1,
    version_2          INTEGER NOT NULL DEFAULT -1,
    data_task_attr     TEXT,
    data_produced      INTEGER NOT NULL DEFAULT 0,
    data_calculator_id TEXT DEFAULT NULL,
    data               TEXT,
    UNIQUE(asset_pathid, version_0, version_1, version_2)
);

CREATE TABLE IF NOT EXISTS asset_version_dependencies (
    dependant  TEXT NOT NULL REFERENCES asset_versions(pathid) ON DELETE CASCADE,
    depends_on TEXT NOT NULL REFERENCES asset_versions(pathid) ON DELETE RESTRICT,
    UNIQUE(dependant, depends_on)
);

CREATE TABLE IF NOT EXISTS asset_templates (
    asset_path_id  TEXT PRIMARY KEY REFERENCES assets(pathid) ON DELETE CASCADE,
    data_task_attr TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS asset_template_version_inputs (
    asset_path_id TEXT NOT NULL REFERENCES asset_templates(asset_path_id) ON DELETE CASCADE,
    depends_on    TEXT NOT NULL REFERENCES asset_versions(pathid) ON DELETE RESTRICT,
    UNIQUE(asset_path_id, depends_on)
);

CREATE TABLE IF NOT EXISTS asset_template_trigger_inputs (
    asset_path_id TEXT NOT NULL REFERENCES asset_templates(asset_path_id) ON DELETE CASCADE,
    depends_on    TEXT NOT NULL REFERENCES assets(pathid) ON DELETE RESTRICT,
    UNIQUE(asset_path_id, depends_on)
);

CREATE INDEX IF NOT EXISTS asset_versions_asset_pathid_idx
    ON asset_versions (asset_pathid);
CREATE INDEX IF NOT EXISTS asset_version_dependencies_dependant_idx
    ON asset_version_dependencies (dependant);
CREATE INDEX IF NOT EXISTS asset_version_dependencies_depends_on_idx
    ON asset_version_dependencies (depends_on);
";

/// Creates all tables/indexes if absent and applies the registry's pragmas.
///
/// Must run on every connection that touches the schema (`foreign_keys` is
/// a per-connection setting in SQLite).
pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "journal_mode", "wal")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(INIT_SQL)?;
    Ok(())
}
