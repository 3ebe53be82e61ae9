//! Dependency-edge operations on `asset_version_dependencies` (spec §3, §4.2).

use super::Store;
use crate::error::Result;
use rusqlite::params;
use tracing::debug;

impl Store {
    /// Adds `dependant -> depends_on` edges, ignoring edges that already
    /// exist. A no-op on an empty slice.
    pub fn add_dependencies(&self, dependant: &str, depends_on: &[String]) -> Result<()> {
        if depends_on.is_empty() {
            return Ok(());
        }
        let conn = self.conn()?;
        for dep in depends_on {
            conn.execute(
                "INSERT OR IGNORE INTO asset_version_dependencies (dependant, depends_on) VALUES (?1, ?2)",
                params![dependant, dep],
            )?;
        }
        debug!(dependant, count = depends_on.len(), "added dependency edges");
        Ok(())
    }

    /// Removes `dependant -> depends_on` edges, idempotently. A no-op on
    /// an empty slice or on edges that don't exist.
    pub fn remove_dependencies(&self, dependant: &str, depends_on: &[String]) -> Result<()> {
        if depends_on.is_empty() {
            return Ok(());
        }
        let conn = self.conn()?;
        for dep in depends_on {
            conn.execute(
                "DELETE FROM asset_version_dependencies WHERE dependant = ?1 AND depends_on = ?2",
                params![dependant, dep],
            )?;
        }
        debug!(dependant, count = depends_on.len(), "removed dependency edges");
        Ok(())
    }

    /// The `path_id`s of versions that `version_path_id` depends on.
    pub fn get_version_dependencies(&self, version_path_id: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT depends_on FROM asset_version_dependencies WHERE dependant = ?1")?;
        let rows = stmt.query_map([version_path_id], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// The `path_id`s of versions that depend on `version_path_id`.
    pub fn get_dependent_versions(&self, version_path_id: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT dependant FROM asset_version_dependencies WHERE depends_on = ?1")?;
        let rows = stmt.query_map([version_path_id], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Versions with no dependants: the leaves of the dependency DAG.
    pub fn get_leaf_asset_version_pathids(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT pathid FROM asset_versions WHERE pathid NOT IN \
             (SELECT depends_on FROM asset_version_dependencies)",
        )?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
