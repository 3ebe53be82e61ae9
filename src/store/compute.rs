//! The per-version data-computation state machine (spec §4.4.1, §5).
//!
//! `schedule_data_computation` is idempotent only with respect to an
//! in-flight job: concurrent callers racing on an `IS_COMPUTING` version
//! collapse onto the same completion handle, and the dedup is enforced
//! entirely by the `BEGIN IMMEDIATE` transaction below, not by any
//! in-process lock, so it holds across processes sharing the database
//! file too. `NOT_COMPUTED` and `AVAILABLE` both dispatch a fresh job —
//! recomputation is the caller's to request; the "skip if already
//! available" shortcut lives only in the façade
//! (`registry::AssetVersion::schedule_data_calculation_if_needed`). The
//! future returned to the caller always comes from the scheduler — this
//! module never builds its own.

use super::rows::{decode_asset_version, not_found_on_empty, read_asset_version_row, ASSET_VERSION_COLUMNS};
use super::types::DataAvailability;
use super::Store;
use crate::error::{PipelineError, Result};
use crate::future::PipelineFuture;
use crate::scheduler::TaskScheduler;
use rusqlite::{params, TransactionBehavior};
use serde_json::Value;
use tracing::{debug, info};

impl Store {
    /// Ensures a data-computation job is in flight for `version_path_id`,
    /// returning a future that resolves once the data is available.
    ///
    /// - Already `IsComputing`: asks `scheduler` to reconstruct a future
    ///   for the recorded `data_calculator_id`, no new job dispatched
    ///   (this is the dedup path).
    /// - `NotComputed` or `Available`: asks `scheduler` to start a fresh
    ///   job against a lock-augmented copy of the version's task
    ///   parameters, records the event id it returns, flips the row back
    ///   to `IsComputing`, and returns the scheduler's future verbatim.
    pub fn schedule_data_computation(
        &self,
        version_path_id: &str,
        scheduler: &dyn TaskScheduler,
    ) -> Result<Box<dyn PipelineFuture<bool>>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
            .query_row(
                &format!("SELECT {ASSET_VERSION_COLUMNS} FROM asset_versions WHERE pathid = ?1"),
                [version_path_id],
                read_asset_version_row,
            )
            .map_err(|e| not_found_on_empty(e, version_path_id))?;
        let record = decode_asset_version(raw)?;
        debug!(version_path_id, availability = ?record.data_availability, "schedule_data_computation");

        let result: Box<dyn PipelineFuture<bool>> = match record.data_availability {
            DataAvailability::IsComputing => {
                let event_id = record.data_calculator_id.clone().ok_or_else(|| {
                    PipelineError::Conflict(format!(
                        "{version_path_id} is marked IS_COMPUTING with no data_calculator_id"
                    ))
                })?;
                tx.commit()?;
                info!(version_path_id, event_id, "reusing in-flight computation job");
                scheduler.get_schedule_event_future(&event_id)?
            }
            DataAvailability::NotComputed | DataAvailability::Available => {
                let mut params = record.data_producer_task_attrs.clone();
                params.attributes.insert(
                    "asset_version_id".to_string(),
                    Value::String(record.path_id.clone()),
                );
                params.attributes.insert(
                    "asset_id".to_string(),
                    Value::String(record.asset_path_id.clone()),
                );
                params.attributes.insert(
                    "version".to_string(),
                    Value::String(record.version_id.dotted()),
                );
                params.attributes.insert(
                    "locked_asset_versions".to_string(),
                    serde_json::to_value(&record.data_producer_task_attrs.version_lock_mapping)?,
                );

                let (future, event_id) =
                    scheduler.schedule_data_generation_task(version_path_id, &params)?;
                tx.execute(
                    "UPDATE asset_versions SET data_produced = ?1, data_calculator_id = ?2 WHERE pathid = ?3",
                    params![DataAvailability::IsComputing.as_i64(), event_id, version_path_id],
                )?;
                tx.commit()?;
                info!(version_path_id, event_id, "dispatched a new computation job");
                future
            }
        };
        Ok(result)
    }

    /// Records the result of a completed computation (spec §4.4.1).
    ///
    /// Fails with [`PipelineError::Conflict`] unless the version is
    /// currently `IsComputing` — this guards against a stale or duplicate
    /// completion callback clobbering a later job's result.
    pub fn on_data_computation_completed(&self, version_path_id: &str, data: Value) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state: i64 = tx
            .query_row(
                "SELECT data_produced FROM asset_versions WHERE pathid = ?1",
                [version_path_id],
                |r| r.get(0),
            )
            .map_err(|e| not_found_on_empty(e, version_path_id))?;
        if DataAvailability::from_i64(state)? != DataAvailability::IsComputing {
            return Err(PipelineError::Conflict(format!(
                "{version_path_id} is not currently computing"
            )));
        }

        let payload = serde_json::to_string(&data)?;
        tx.execute(
            "UPDATE asset_versions SET data_produced = ?1, data_calculator_id = NULL, data = ?2 WHERE pathid = ?3",
            params![DataAvailability::Available.as_i64(), payload, version_path_id],
        )?;
        tx.commit()?;
        info!(version_path_id, "computation completed");
        Ok(())
    }
}
