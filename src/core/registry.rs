// src/core/registry.rs

//! Process-wide store of the latest snapshot of every job.
//!
//! One coarse lock guards the whole map. Operations are short and contention
//! is low: a handful of background jobs writing, a front-end polling.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::core::models::{JobId, JobRecord, JobUpdate};

/// What happened to a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// No job with that id.
    Missing,
    /// The job is terminal, or the update would move its status backwards.
    Rejected,
}

/// Concurrency-safe job snapshot storage.
///
/// `update` is a partial merge: fields absent from the update keep their
/// last written value. Each call is atomic with respect to every other call.
pub trait JobStore: Send + Sync {
    fn create(&self, record: JobRecord);
    fn update(&self, id: &str, update: JobUpdate) -> UpdateOutcome;
    fn get(&self, id: &str) -> Option<JobRecord>;
}

/// In-memory `JobStore`. Cloning shares the same map. Nothing is ever evicted.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobStore for JobRegistry {
    fn create(&self, record: JobRecord) {
        debug!(job_id = %record.id, status = %record.status, "Job created.");
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.id.clone(), record);
    }

    fn update(&self, id: &str, update: JobUpdate) -> UpdateOutcome {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let Some(record) = jobs.get_mut(id) else {
            warn!(job_id = id, "Update for unknown job ignored.");
            return UpdateOutcome::Missing;
        };

        let next = update.status.unwrap_or(record.status);
        if !record.status.can_transition_to(next) {
            warn!(job_id = id, from = %record.status, to = %next, "Job update rejected.");
            return UpdateOutcome::Rejected;
        }
        record.merge(update);
        UpdateOutcome::Applied
    }

    fn get(&self, id: &str) -> Option<JobRecord> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{JobStatus, ProgressEvent};

    fn registry_with_job() -> JobRegistry {
        let registry = JobRegistry::new();
        registry.create(JobRecord::queued("job1".into(), "example.com", "example-com.html"));
        registry
    }

    #[test]
    fn missing_job_is_none() {
        let registry = JobRegistry::new();
        assert!(registry.get("nope").is_none());
        assert_eq!(registry.update("nope", JobUpdate::done()), UpdateOutcome::Missing);
        assert!(registry.is_empty());
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let registry = registry_with_job();
        let update = JobUpdate { stage: Some("Starting...".into()), ..Default::default() };
        assert_eq!(registry.update("job1", update), UpdateOutcome::Applied);

        let record = registry.get("job1").unwrap();
        assert_eq!(record.stage, "Starting...");
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.filename, "example-com.html");
    }

    #[test]
    fn terminal_jobs_are_frozen() {
        let registry = registry_with_job();
        assert_eq!(registry.update("job1", JobUpdate::done()), UpdateOutcome::Applied);
        assert_eq!(registry.update("job1", JobUpdate::failed("late")), UpdateOutcome::Rejected);
        let late_progress = JobUpdate { stage: Some("late".into()), ..Default::default() };
        assert_eq!(registry.update("job1", late_progress), UpdateOutcome::Rejected);

        let record = registry.get("job1").unwrap();
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.error, None);
    }

    #[test]
    fn status_cannot_move_backwards() {
        let registry = registry_with_job();
        registry.update("job1", JobUpdate::running("Starting..."));
        assert_eq!(
            registry.update("job1", JobUpdate::status(JobStatus::Queued)),
            UpdateOutcome::Rejected
        );
    }

    #[test]
    fn concurrent_writers_and_readers_never_lose_fields() {
        let registry = JobRegistry::new();
        for n in 0..4 {
            registry.create(JobRecord::queued(format!("job{n}"), format!("t{n}.com"), format!("f{n}.html")));
        }

        let writers: Vec<_> = (0..4)
            .map(|n| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let id = format!("job{n}");
                    for step in 0..=50 {
                        registry.update(&id, ProgressEvent::new(format!("step {step}"), step, 50).into());
                    }
                })
            })
            .collect();
        let reader = {
            let registry = registry.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    for n in 0..4 {
                        let record = registry.get(&format!("job{n}")).unwrap();
                        assert_eq!(record.target, format!("t{n}.com"));
                        assert_eq!(record.filename, format!("f{n}.html"));
                    }
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        for n in 0..4 {
            let record = registry.get(&format!("job{n}")).unwrap();
            assert_eq!(record.percent, 100);
            assert_eq!(record.current, 50);
            assert_eq!(record.target, format!("t{n}.com"));
        }
    }
}
