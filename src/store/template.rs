//! Asset template storage (spec §3 `AssetTemplate`, component C4/C7).
//!
//! A template declares how new versions of one asset should be produced
//! automatically whenever specific "trigger" assets publish a new
//! version. Its `fixed_dependencies` are already-resolved version
//! `path_id`s, pinned inputs copied into every version the template
//! produces; its `trigger_inputs` are asset `path_id`s. The cascade logic
//! itself lives in `crate::registry::template_engine`; this module only
//! persists the declarative rule and its two edge sets.

use super::rows::not_found_on_empty;
use super::types::AssetTemplateRecord;
use super::Store;
use crate::error::Result;
use crate::task_params::GenerationTaskParameters;
use rusqlite::params;
use tracing::debug;

impl Store {
    /// Declares (or replaces) the template for `asset_path_id`, wiring up
    /// its trigger assets and fixed (pre-resolved) version dependencies.
    pub fn create_asset_template(
        &self,
        asset_path_id: &str,
        data_producer_task_attrs: GenerationTaskParameters,
        trigger_asset_path_ids: &[String],
        fixed_dependency_version_path_ids: &[String],
    ) -> Result<AssetTemplateRecord> {
        let conn = self.conn()?;
        let task_attr = data_producer_task_attrs.serialize()?;
        conn.execute(
            "INSERT OR REPLACE INTO asset_templates (asset_path_id, data_task_attr) VALUES (?1, ?2)",
            params![asset_path_id, task_attr],
        )?;

        conn.execute(
            "DELETE FROM asset_template_trigger_inputs WHERE asset_path_id = ?1",
            params![asset_path_id],
        )?;
        for trigger in trigger_asset_path_ids {
            conn.execute(
                "INSERT OR IGNORE INTO asset_template_trigger_inputs (asset_path_id, depends_on) VALUES (?1, ?2)",
                params![asset_path_id, trigger],
            )?;
        }

        conn.execute(
            "DELETE FROM asset_template_version_inputs WHERE asset_path_id = ?1",
            params![asset_path_id],
        )?;
        for dep in fixed_dependency_version_path_ids {
            conn.execute(
                "INSERT OR IGNORE INTO asset_template_version_inputs (asset_path_id, depends_on) VALUES (?1, ?2)",
                params![asset_path_id, dep],
            )?;
        }

        debug!(
            asset_path_id,
            triggers = trigger_asset_path_ids.len(),
            fixed_deps = fixed_dependency_version_path_ids.len(),
            "created asset template"
        );
        Ok(AssetTemplateRecord {
            asset_path_id: asset_path_id.to_string(),
            data_producer_task_attrs,
        })
    }

    /// Updates just the task parameters a template stamps onto the
    /// versions it produces, leaving its trigger/dependency wiring as-is.
    pub fn update_asset_template_data(
        &self,
        asset_path_id: &str,
        data_producer_task_attrs: GenerationTaskParameters,
    ) -> Result<()> {
        let conn = self.conn()?;
        let task_attr = data_producer_task_attrs.serialize()?;
        conn.execute(
            "UPDATE asset_templates SET data_task_attr = ?1 WHERE asset_path_id = ?2",
            params![task_attr, asset_path_id],
        )?;
        debug!(asset_path_id, "updated asset template task parameters");
        Ok(())
    }

    /// Reads the current template for `asset_path_id`.
    pub fn get_asset_template(&self, asset_path_id: &str) -> Result<AssetTemplateRecord> {
        let conn = self.conn()?;
        let task_attr: Option<String> = conn
            .query_row(
                "SELECT data_task_attr FROM asset_templates WHERE asset_path_id = ?1",
                [asset_path_id],
                |r| r.get(0),
            )
            .map_err(|e| not_found_on_empty(e, asset_path_id))?;
        Ok(AssetTemplateRecord {
            asset_path_id: asset_path_id.to_string(),
            data_producer_task_attrs: GenerationTaskParameters::deserialize(
                task_attr.as_deref().unwrap_or(""),
            )?,
        })
    }

    /// Templates that fire when `trigger_asset_path_id` publishes a new
    /// version.
    pub fn get_asset_templates_triggered_by(&self, trigger_asset_path_id: &str) -> Result<Vec<AssetTemplateRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.asset_path_id, t.data_task_attr FROM asset_templates t \
             JOIN asset_template_trigger_inputs i ON i.asset_path_id = t.asset_path_id \
             WHERE i.depends_on = ?1",
        )?;
        let rows = stmt.query_map([trigger_asset_path_id], |row| {
            let asset_path_id: String = row.get(0)?;
            let task_attr: Option<String> = row.get(1)?;
            Ok((asset_path_id, task_attr))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (asset_path_id, task_attr) = row?;
            out.push(AssetTemplateRecord {
                asset_path_id,
                data_producer_task_attrs: GenerationTaskParameters::deserialize(
                    task_attr.as_deref().unwrap_or(""),
                )?,
            });
        }
        Ok(out)
    }

    /// The fixed (pre-resolved) version dependencies a template always
    /// wires into the versions it produces.
    pub fn get_template_fixed_dependencies(&self, asset_path_id: &str) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT depends_on FROM asset_template_version_inputs WHERE asset_path_id = ?1")?;
        let rows = stmt.query_map([asset_path_id], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
