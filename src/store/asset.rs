//! Asset catalog operations.

use super::rows::{not_found_on_empty, read_asset_row};
use super::types::AssetRecord;
use super::Store;
use crate::error::{PipelineError, Result};
use rusqlite::params_from_iter;
use tracing::debug;

fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

impl Store {
    /// The `type_name` of the asset at `path_id`.
    pub fn get_asset_type_name(&self, path_id: &str) -> Result<String> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT type_name FROM assets WHERE pathid = ?1",
            [path_id],
            |row| row.get(0),
        )
        .map_err(|e| not_found_on_empty(e, path_id))
    }

    /// Fetches assets by id; ids with no matching row are silently
    /// dropped from the result.
    pub fn get_asset_datas(&self, path_ids: &[String]) -> Result<Vec<AssetRecord>> {
        if path_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let placeholders = vec!["?"; path_ids.len()].join(",");
        let sql =
            format!("SELECT pathid, name, description, type_name FROM assets WHERE pathid IN ({placeholders})");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(path_ids.iter()), read_asset_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Fetches a single asset by id, failing with `NotFound` if absent.
    pub fn get_asset_data(&self, path_id: &str) -> Result<AssetRecord> {
        self.get_asset_datas(std::slice::from_ref(&path_id.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::NotFound(path_id.to_string()))
    }

    /// Creates a new asset, slugifying `asset_data.name` into a `path_id`
    /// when one wasn't supplied.
    pub fn create_new_asset(&self, type_name: &str, mut asset_data: AssetRecord) -> Result<AssetRecord> {
        let conn = self.conn()?;
        if asset_data.path_id.is_empty() {
            asset_data.path_id = slugify(&asset_data.name);
        }
        conn.execute(
            "INSERT INTO assets (pathid, name, description, type_name) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                asset_data.path_id,
                asset_data.name,
                asset_data.description,
                type_name
            ],
        )?;
        asset_data.type_name = type_name.to_string();
        debug!(path_id = %asset_data.path_id, type_name, "created asset");
        Ok(asset_data)
    }
}
