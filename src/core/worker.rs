// src/core/worker.rs

//! Background execution of full recon jobs.
//!
//! `submit` writes the Queued record before anything is scheduled, so a
//! poller never sees an unknown id for a job it was handed. A dispatcher task
//! drains the queue and starts one task per job; jobs for different targets
//! run concurrently, the steps of one job never do.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use crate::core::error::Result;
use crate::core::models::{JobId, JobRecord, JobUpdate, ProgressEvent, random_token};
use crate::core::pipeline::{self, BatchReport, BatchSettings};
use crate::core::registry::JobStore;
use crate::core::report::ReportRenderer;
use crate::core::runner::CommandRunner;
use crate::core::target;
use crate::core::wildcard::WildcardProbe;

const JOB_ID_LEN: usize = 12;

/// Sent once per finished job when a completion channel is attached.
#[derive(Debug)]
pub struct JobOutcome {
    pub job_id: JobId,
    pub result: Result<BatchReport>,
}

/// Everything a job needs to run, shared by every job task.
pub struct WorkerContext<R, W, T, S> {
    pub runner: R,
    pub probe: W,
    pub renderer: T,
    pub store: S,
    pub settings: BatchSettings,
    pub data_dir: PathBuf,
    pub outcomes: Option<UnboundedSender<JobOutcome>>,
}

#[derive(Debug)]
struct QueuedJob {
    id: JobId,
    target: String,
    filename: String,
}

/// Handle for submitting jobs. Cheap to clone.
#[derive(Debug, Clone)]
pub struct JobWorker<S> {
    store: S,
    queue: UnboundedSender<QueuedJob>,
}

impl<S> JobWorker<S>
where
    S: JobStore + Clone + 'static,
{
    /// Starts the dispatcher. Must be called inside a tokio runtime.
    pub fn start<R, W, T>(context: WorkerContext<R, W, T, S>) -> Self
    where
        R: CommandRunner + 'static,
        W: WildcardProbe + 'static,
        T: ReportRenderer + 'static,
    {
        let (queue, rx) = mpsc::unbounded_channel();
        let store = context.store.clone();
        tokio::spawn(dispatch(rx, Arc::new(context)));
        Self { store, queue }
    }

    /// Registers a Queued job for `raw_target` and schedules it.
    ///
    /// Returns immediately. Target validation happens in the job itself, so an
    /// invalid target still gets an id and ends in the Error state.
    pub fn submit(&self, raw_target: &str) -> JobId {
        let id = random_token(JOB_ID_LEN);
        let target = raw_target.trim().to_string();
        let filename = target::report_filename(&target, Local::now());

        self.store.create(JobRecord::queued(id.clone(), target.clone(), filename.clone()));
        info!(job_id = %id, target = %target, "Job queued.");

        let job = QueuedJob { id: id.clone(), target, filename };
        if self.queue.send(job).is_err() {
            error!(job_id = %id, "Dispatcher is gone; job cannot run.");
            self.store.update(&id, JobUpdate::failed("Worker is not running."));
        }
        id
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

async fn dispatch<R, W, T, S>(mut rx: UnboundedReceiver<QueuedJob>, context: Arc<WorkerContext<R, W, T, S>>)
where
    R: CommandRunner + 'static,
    W: WildcardProbe + 'static,
    T: ReportRenderer + 'static,
    S: JobStore + 'static,
{
    while let Some(job) = rx.recv().await {
        tokio::spawn(supervise(Arc::clone(&context), job));
    }
    info!("Job queue closed; dispatcher stopping.");
}

/// Runs one job in its own task so a panic is recorded instead of lost.
async fn supervise<R, W, T, S>(context: Arc<WorkerContext<R, W, T, S>>, job: QueuedJob)
where
    R: CommandRunner + 'static,
    W: WildcardProbe + 'static,
    T: ReportRenderer + 'static,
    S: JobStore + 'static,
{
    let id = job.id.clone();
    let handle = tokio::spawn(execute(Arc::clone(&context), job));
    if let Err(e) = handle.await {
        error!(job_id = %id, error = %e, "Job task panicked.");
        context.store.update(&id, JobUpdate::failed(format!("Task panicked: {e}")));
    }
}

async fn execute<R, W, T, S>(context: Arc<WorkerContext<R, W, T, S>>, job: QueuedJob)
where
    R: CommandRunner,
    W: WildcardProbe,
    T: ReportRenderer,
    S: JobStore,
{
    let store = &context.store;
    store.update(&job.id, JobUpdate::running("Starting..."));
    info!(job_id = %job.id, target = %job.target, "Job started.");

    let result = run_and_write(&context, &job).await;
    match &result {
        Ok(report) => {
            store.update(&job.id, JobUpdate::done());
            info!(job_id = %job.id, domain = %report.domain, file = %job.filename, "Job finished.");
        }
        Err(e) => {
            warn!(job_id = %job.id, error = %e, "Job failed.");
            store.update(&job.id, JobUpdate::failed(e.to_string()));
        }
    }

    if let Some(outcomes) = &context.outcomes {
        // A closed receiver only means nobody is listening any more.
        let _ = outcomes.send(JobOutcome { job_id: job.id, result });
    }
}

async fn run_and_write<R, W, T, S>(context: &WorkerContext<R, W, T, S>, job: &QueuedJob) -> Result<BatchReport>
where
    R: CommandRunner,
    W: WildcardProbe,
    T: ReportRenderer,
    S: JobStore,
{
    let sink = |event: ProgressEvent| {
        context.store.update(&job.id, event.into());
    };
    let report = pipeline::run_batch(
        &context.runner,
        &context.probe,
        &context.renderer,
        &context.settings,
        &job.target,
        &sink,
    )
    .await?;

    tokio::fs::create_dir_all(&context.data_dir).await?;
    tokio::fs::write(context.data_dir.join(&job.filename), &report.html).await?;
    Ok(report)
}
