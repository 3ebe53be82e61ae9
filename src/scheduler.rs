//! Task scheduling interface (spec §5, component C5).
//!
//! The registry never computes asset data itself; it hands work off to a
//! `TaskScheduler` and later learns about completion through whichever
//! `TaskCompletionReceiver`s the scheduler backend was given at startup.
//! Two calls matter for the `IS_COMPUTING` dedup path in
//! `Store::schedule_data_computation`: `schedule_data_generation_task`
//! starts a fresh job, `get_schedule_event_future` reconstructs a handle
//! to one already in flight, so a second caller racing on the same
//! version never dispatches twice.
//!
//! This crate ships one reference implementation, [`InProcessScheduler`],
//! suited to tests and small embedders: dispatched jobs sit idle until the
//! caller completes them explicitly via [`InProcessScheduler::complete_job`].

use crate::error::{PipelineError, Result};
use crate::future::PipelineFuture;
use crate::store::Store;
use crate::task_params::GenerationTaskParameters;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Dispatches data-generation work to wherever it actually runs.
///
/// Implementations own the mapping from a scheduled job back to its
/// result; the registry only ever holds the opaque `event_id` they
/// return and the future handed back alongside it.
pub trait TaskScheduler: Send + Sync {
    /// Starts computing `version_path_id`'s data, returning a future for
    /// its completion and an opaque event id to be recorded as
    /// `data_calculator_id`.
    fn schedule_data_generation_task(
        &self,
        version_path_id: &str,
        params: &GenerationTaskParameters,
    ) -> Result<(Box<dyn PipelineFuture<bool>>, String)>;

    /// Reconstructs a future for a job already in flight, identified by
    /// the `event_id` a prior `schedule_data_generation_task` call
    /// returned. Used when a second caller finds the version already
    /// `IS_COMPUTING` and must not redispatch it.
    fn get_schedule_event_future(&self, event_id: &str) -> Result<Box<dyn PipelineFuture<bool>>>;

    /// Registers a receiver to be notified whenever any job this
    /// scheduler dispatched completes.
    fn add_task_completion_callback_receiver(&self, receiver: Arc<dyn TaskCompletionReceiver>);
}

/// Notified when a dispatched job finishes, so it can write the result
/// back into the store.
pub trait TaskCompletionReceiver: Send + Sync {
    /// Records `data` as the result of `version_path_id`'s job.
    fn on_task_completed(&self, version_path_id: &str, data: serde_json::Value) -> Result<()>;
}

impl TaskCompletionReceiver for Store {
    fn on_task_completed(&self, version_path_id: &str, data: serde_json::Value) -> Result<()> {
        self.on_data_computation_completed(version_path_id, data)
    }
}

/// A future backed by a shared flag an [`InProcessScheduler`] flips on
/// completion.
struct JobFuture {
    ready: Arc<AtomicBool>,
}

impl PipelineFuture<bool> for JobFuture {
    fn is_result_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn wait_for_result(&self) -> bool {
        while !self.ready.load(Ordering::SeqCst) {
            thread::sleep(POLL_INTERVAL);
        }
        true
    }
}

struct Job {
    version_path_id: String,
    ready: Arc<AtomicBool>,
}

/// A scheduler that records dispatches in memory without running
/// anything; tests and demos drive completion manually through
/// [`InProcessScheduler::complete_job`].
#[derive(Default)]
pub struct InProcessScheduler {
    next_id: AtomicU64,
    jobs: Mutex<HashMap<String, Job>>,
    receivers: Mutex<Vec<Arc<dyn TaskCompletionReceiver>>>,
}

impl InProcessScheduler {
    /// Builds an empty scheduler.
    pub fn new() -> Arc<InProcessScheduler> {
        Arc::new(InProcessScheduler::default())
    }

    /// The event id most recently dispatched for `version_path_id`, if
    /// any job for it is still tracked.
    pub fn dispatched_job(&self, version_path_id: &str) -> Option<String> {
        self.jobs
            .lock()
            .iter()
            .find(|(_, job)| job.version_path_id == version_path_id)
            .map(|(event_id, _)| event_id.clone())
    }

    /// Marks `event_id`'s job complete and fans `data` out to every
    /// registered receiver, simulating what an external scheduler backend
    /// would do on job completion.
    pub fn complete_job(&self, event_id: &str, data: serde_json::Value) -> Result<()> {
        let version_path_id = {
            let jobs = self.jobs.lock();
            let job = jobs
                .get(event_id)
                .ok_or_else(|| PipelineError::NotFound(format!("no job for event {event_id}")))?;
            job.ready.store(true, Ordering::SeqCst);
            job.version_path_id.clone()
        };
        info!(event_id, version_path_id, "job completed");
        for receiver in self.receivers.lock().iter() {
            receiver.on_task_completed(&version_path_id, data.clone())?;
        }
        Ok(())
    }
}

impl TaskScheduler for InProcessScheduler {
    fn schedule_data_generation_task(
        &self,
        version_path_id: &str,
        _params: &GenerationTaskParameters,
    ) -> Result<(Box<dyn PipelineFuture<bool>>, String)> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event_id = format!("job-{id}");
        let ready = Arc::new(AtomicBool::new(false));
        self.jobs.lock().insert(
            event_id.clone(),
            Job {
                version_path_id: version_path_id.to_string(),
                ready: ready.clone(),
            },
        );
        info!(event_id, version_path_id, "job submitted");
        Ok((Box::new(JobFuture { ready }), event_id))
    }

    fn get_schedule_event_future(&self, event_id: &str) -> Result<Box<dyn PipelineFuture<bool>>> {
        let jobs = self.jobs.lock();
        let job = jobs
            .get(event_id)
            .ok_or_else(|| PipelineError::NotFound(format!("no job for event {event_id}")))?;
        Ok(Box::new(JobFuture { ready: job.ready.clone() }))
    }

    fn add_task_completion_callback_receiver(&self, receiver: Arc<dyn TaskCompletionReceiver>) {
        self.receivers.lock().push(receiver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::test_store;
    use crate::store::types::{AssetRecord, NewAssetVersion};
    use serde_json::json;

    #[test]
    fn dispatch_then_complete_round_trips_through_registered_receivers() {
        let (_dir, store) = test_store();
        store
            .create_new_asset(
                "generic",
                AssetRecord {
                    path_id: "A".to_string(),
                    name: "A".to_string(),
                    description: String::new(),
                    type_name: String::new(),
                },
            )
            .unwrap();
        let version = store
            .publish_new_asset_version("A", NewAssetVersion::default(), &[])
            .unwrap();

        let scheduler = InProcessScheduler::new();
        scheduler.add_task_completion_callback_receiver(Arc::new(store.clone()));

        let (fut, event_id) = scheduler
            .schedule_data_generation_task(&version.path_id, &GenerationTaskParameters::default())
            .unwrap();
        assert!(!fut.is_result_ready());
        assert_eq!(scheduler.dispatched_job(&version.path_id), Some(event_id.clone()));

        scheduler.complete_job(&event_id, json!({"frames": 10})).unwrap();
        assert!(fut.is_result_ready());
        assert_eq!(
            store
                .get_asset_version_data_from_path_id(&version.path_id)
                .unwrap()
                .data_availability,
            crate::store::types::DataAvailability::Available
        );
    }

    #[test]
    fn get_schedule_event_future_reconstructs_the_same_handle() {
        let scheduler = InProcessScheduler::new();
        let (_fut, event_id) = scheduler
            .schedule_data_generation_task("A/1", &GenerationTaskParameters::default())
            .unwrap();

        let reconstructed = scheduler.get_schedule_event_future(&event_id).unwrap();
        assert!(!reconstructed.is_result_ready());
        scheduler.complete_job(&event_id, json!(null)).unwrap();
        assert!(reconstructed.is_result_ready());
    }

    #[test]
    fn unknown_event_id_is_not_found() {
        let scheduler = InProcessScheduler::new();
        assert!(scheduler.get_schedule_event_future("missing").is_err());
        assert!(scheduler.complete_job("missing", json!(null)).is_err());
    }
}
