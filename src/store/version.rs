//! Asset version catalog operations, including the publish transaction.

use super::rows::{decode_asset_version, read_asset_version_row, ASSET_VERSION_COLUMNS};
use super::types::{AssetVersionRecord, DataAvailability, NewAssetVersion};
use super::Store;
use crate::error::{PipelineError, Result};
use crate::version::VersionId;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::debug;

impl Store {
    /// Resolves `(asset_path_id, version_id)` pairs; a `None` version_id
    /// selects the latest published version for that asset. Pairs with no
    /// matching row are silently dropped.
    pub fn get_asset_version_datas(
        &self,
        pairs: &[(String, Option<VersionId>)],
    ) -> Result<Vec<AssetVersionRecord>> {
        let conn = self.conn()?;
        let mut out = Vec::new();
        for (asset_path_id, version_id) in pairs {
            let raw = match version_id {
                Some(v) => conn
                    .query_row(
                        &format!(
                            "SELECT {ASSET_VERSION_COLUMNS} FROM asset_versions \
                             WHERE asset_pathid = ?1 AND version_0 = ?2 AND version_1 = ?3 AND version_2 = ?4"
                        ),
                        params![asset_path_id, v.0, v.1, v.2],
                        read_asset_version_row,
                    )
                    .optional()?,
                None => conn
                    .query_row(
                        &format!(
                            "SELECT {ASSET_VERSION_COLUMNS} FROM asset_versions \
                             WHERE asset_pathid = ?1 \
                             ORDER BY version_0 DESC, version_1 DESC, version_2 DESC LIMIT 1"
                        ),
                        [asset_path_id],
                        read_asset_version_row,
                    )
                    .optional()?,
            };
            if let Some(raw) = raw {
                out.push(decode_asset_version(raw)?);
            }
        }
        Ok(out)
    }

    /// Single-pair convenience wrapper that fails with `NotFound` instead
    /// of silently dropping a missing row.
    pub fn get_asset_version_data(
        &self,
        asset_path_id: &str,
        version_id: Option<VersionId>,
    ) -> Result<AssetVersionRecord> {
        self.get_asset_version_datas(&[(asset_path_id.to_string(), version_id)])?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::NotFound(asset_path_id.to_string()))
    }

    /// Fetches versions by their own `path_id`; missing ids are silently
    /// dropped.
    pub fn get_asset_version_datas_from_path_id(
        &self,
        path_ids: &[String],
    ) -> Result<Vec<AssetVersionRecord>> {
        let conn = self.conn()?;
        let mut out = Vec::new();
        for pid in path_ids {
            let raw = conn
                .query_row(
                    &format!("SELECT {ASSET_VERSION_COLUMNS} FROM asset_versions WHERE pathid = ?1"),
                    [pid],
                    read_asset_version_row,
                )
                .optional()?;
            if let Some(raw) = raw {
                out.push(decode_asset_version(raw)?);
            }
        }
        Ok(out)
    }

    /// Single-id convenience wrapper that fails with `NotFound` instead of
    /// silently dropping a missing row.
    pub fn get_asset_version_data_from_path_id(&self, path_id: &str) -> Result<AssetVersionRecord> {
        self.get_asset_version_datas_from_path_id(std::slice::from_ref(&path_id.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::NotFound(path_id.to_string()))
    }

    /// Publishes a new version of `asset_path_id` (spec §4.1, §4.4).
    ///
    /// Allocates `version_id` when unset (taking the per-asset maximum and
    /// bumping per spec §4.1), computes `path_id` when unset as
    /// `"<asset>/<dotted>"`, inserts the dependency edges with
    /// `INSERT OR IGNORE`, and initializes the data-computation state to
    /// `NotComputed`. Runs in a single `BEGIN IMMEDIATE` transaction.
    pub fn publish_new_asset_version(
        &self,
        asset_path_id: &str,
        new_version: NewAssetVersion,
        dependencies: &[String],
    ) -> Result<AssetVersionRecord> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: Option<String> = tx
            .query_row("SELECT pathid FROM assets WHERE pathid = ?1", [asset_path_id], |r| r.get(0))
            .optional()?;
        if exists.is_none() {
            return Err(PipelineError::Conflict(format!(
                "unknown asset_path_id: {asset_path_id}"
            )));
        }

        let version_id = match new_version.version_id {
            Some(v) => {
                let clash: Option<String> = tx
                    .query_row(
                        "SELECT pathid FROM asset_versions WHERE asset_pathid = ?1 \
                         AND version_0 = ?2 AND version_1 = ?3 AND version_2 = ?4",
                        params![asset_path_id, v.0, v.1, v.2],
                        |r| r.get(0),
                    )
                    .optional()?;
                if clash.is_some() {
                    return Err(PipelineError::Conflict(format!(
                        "version {v} already published for {asset_path_id}"
                    )));
                }
                v
            }
            None => {
                let max: Option<(i64, i64, i64)> = tx
                    .query_row(
                        "SELECT version_0, version_1, version_2 FROM asset_versions \
                         WHERE asset_pathid = ?1 \
                         ORDER BY version_0 DESC, version_1 DESC, version_2 DESC LIMIT 1",
                        [asset_path_id],
                        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
                    )
                    .optional()?;
                let current = match max {
                    Some((a, b, c)) => VersionId(a, b, c),
                    None => VersionId::EMPTY,
                };
                current.next()
            }
        };

        let path_id = new_version
            .path_id
            .unwrap_or_else(|| format!("{asset_path_id}/{}", version_id.dotted()));

        let task_attr = new_version.data_producer_task_attrs.serialize()?;
        tx.execute(
            "INSERT INTO asset_versions \
             (pathid, asset_pathid, version_0, version_1, version_2, data_task_attr) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![path_id, asset_path_id, version_id.0, version_id.1, version_id.2, task_attr],
        )?;

        for dep in dependencies {
            tx.execute(
                "INSERT OR IGNORE INTO asset_version_dependencies (dependant, depends_on) VALUES (?1, ?2)",
                params![path_id, dep],
            )?;
        }

        tx.commit()?;
        debug!(%path_id, asset_path_id, version = %version_id.dotted(), "published asset version");

        Ok(AssetVersionRecord {
            path_id,
            asset_path_id: asset_path_id.to_string(),
            version_id,
            data_producer_task_attrs: new_version.data_producer_task_attrs,
            data_availability: DataAvailability::NotComputed,
            data_calculator_id: None,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_store;
    use super::super::types::{AssetRecord, NewAssetVersion};
    use crate::version::VersionId;

    fn with_asset(name: &str) -> (tempfile::TempDir, super::super::Store, String) {
        let (dir, store) = test_store();
        let asset = store
            .create_new_asset(
                "generic",
                AssetRecord {
                    path_id: String::new(),
                    name: name.to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
        (dir, store, asset.path_id)
    }

    #[test]
    fn publish_allocates_sequential_versions() {
        let (_dir, store, asset) = with_asset("Foo");
        let first = store
            .publish_new_asset_version(&asset, NewAssetVersion::default(), &[])
            .unwrap();
        assert_eq!(first.version_id, VersionId(1, -1, -1));
        assert_eq!(first.path_id, "Foo/1");

        let second = store
            .publish_new_asset_version(&asset, NewAssetVersion::default(), &[])
            .unwrap();
        assert_eq!(second.version_id, VersionId(2, -1, -1));
    }

    #[test]
    fn publish_accepts_explicit_precision() {
        let (_dir, store, asset) = with_asset("Foo");
        let v3 = store
            .publish_new_asset_version(
                &asset,
                NewAssetVersion {
                    version_id: Some(VersionId(3, -1, -1)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        assert_eq!(v3.version_id.denormalize(), crate::version::VersionSpec::Scalar(3));

        let v31 = store
            .publish_new_asset_version(
                &asset,
                NewAssetVersion {
                    version_id: Some(VersionId(3, 1, -1)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        assert_eq!(
            v31.version_id.denormalize(),
            crate::version::VersionSpec::Pair(3, 1)
        );

        let v312 = store
            .publish_new_asset_version(
                &asset,
                NewAssetVersion {
                    version_id: Some(VersionId(3, 1, 2)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        assert_eq!(
            v312.version_id.denormalize(),
            crate::version::VersionSpec::Triple(3, 1, 2)
        );
    }

    #[test]
    fn publish_rejects_duplicate_explicit_version() {
        let (_dir, store, asset) = with_asset("Foo");
        store
            .publish_new_asset_version(
                &asset,
                NewAssetVersion {
                    version_id: Some(VersionId(1, -1, -1)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        let err = store.publish_new_asset_version(
            &asset,
            NewAssetVersion {
                version_id: Some(VersionId(1, -1, -1)),
                ..Default::default()
            },
            &[],
        );
        assert!(err.is_err());
    }

    #[test]
    fn publish_rejects_unknown_asset() {
        let (_dir, store) = test_store();
        let err = store.publish_new_asset_version("does-not-exist", NewAssetVersion::default(), &[]);
        assert!(err.is_err());
    }

    #[test]
    fn duplicate_version_numbers_are_scoped_per_asset() {
        let (dir, store) = test_store();
        let _ = &dir;
        for name in ["A", "B"] {
            store
                .create_new_asset(
                    "generic",
                    AssetRecord {
                        path_id: name.to_string(),
                        name: name.to_string(),
                        description: String::new(),
                        type_name: String::new(),
                    },
                )
                .unwrap();
        }
        let a1 = store
            .publish_new_asset_version(
                "A",
                NewAssetVersion {
                    version_id: Some(VersionId(1, -1, -1)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        let b1 = store
            .publish_new_asset_version(
                "B",
                NewAssetVersion {
                    version_id: Some(VersionId(1, -1, -1)),
                    ..Default::default()
                },
                &[],
            )
            .unwrap();
        assert_eq!(a1.version_id, b1.version_id);
    }
}
