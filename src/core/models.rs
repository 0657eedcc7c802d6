// src/core/models.rs

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// --- Tool Output ---

/// One tool section of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub title: String,
    /// The command line, tokens joined with spaces.
    pub command: String,
    /// Captured output, or an in-band failure marker.
    pub output: String,
}

/// The answer to a single-tool request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleToolRun {
    pub target: String,
    pub domain: String,
    pub section: ToolResult,
}

// --- Progress ---

/// A progress snapshot emitted by the batch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub percent: u8,
    pub stage: String,
    pub current: usize,
    pub total: usize,
}

impl ProgressEvent {
    /// `floor(done / total * 100)`, with 0 steps counting as complete.
    pub fn new(stage: impl Into<String>, done: usize, total: usize) -> Self {
        let percent = if total == 0 { 100 } else { (done * 100 / total).min(100) as u8 };
        Self { percent, stage: stage.into(), current: done, total }
    }
}

// --- Jobs ---

pub type JobId = String;

/// `len` random lowercase ASCII letters and digits.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Lifecycle of a job. Only moves forward; `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next >= self
    }
}

/// The latest known state of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub id: JobId,
    pub status: JobStatus,
    pub percent: u8,
    pub stage: String,
    pub current: usize,
    pub total: usize,
    pub target: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobRecord {
    /// A freshly submitted job.
    pub fn queued(id: JobId, target: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            percent: 0,
            stage: "Queued".to_string(),
            current: 0,
            total: 0,
            target: target.into(),
            filename: filename.into(),
            error: None,
        }
    }

    /// Applies the fields present in `update`, leaving the rest untouched.
    pub fn merge(&mut self, update: JobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(percent) = update.percent {
            self.percent = percent;
        }
        if let Some(stage) = update.stage {
            self.stage = stage;
        }
        if let Some(current) = update.current {
            self.current = current;
        }
        if let Some(total) = update.total {
            self.total = total;
        }
        if let Some(target) = update.target {
            self.target = target;
        }
        if let Some(filename) = update.filename {
            self.filename = filename;
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
    }
}

/// A partial update: `None` fields keep their previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub percent: Option<u8>,
    pub stage: Option<String>,
    pub current: Option<usize>,
    pub total: Option<usize>,
    pub target: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn running(stage: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Running),
            percent: Some(0),
            stage: Some(stage.into()),
            current: Some(0),
            total: Some(0),
            ..Default::default()
        }
    }

    pub fn done() -> Self {
        Self {
            status: Some(JobStatus::Done),
            percent: Some(100),
            stage: Some("Done".to_string()),
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Error),
            percent: Some(100),
            stage: Some("Error".to_string()),
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

impl From<ProgressEvent> for JobUpdate {
    fn from(event: ProgressEvent) -> Self {
        Self {
            status: Some(JobStatus::Running),
            percent: Some(event.percent),
            stage: Some(event.stage),
            current: Some(event.current),
            total: Some(event.total),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_floored() {
        assert_eq!(ProgressEvent::new("x", 1, 3).percent, 33);
        assert_eq!(ProgressEvent::new("x", 2, 3).percent, 66);
        assert_eq!(ProgressEvent::new("x", 3, 3).percent, 100);
        assert_eq!(ProgressEvent::new("x", 0, 9).percent, 0);
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut record = JobRecord::queued("abc".into(), "example.com", "example-com.html");
        record.merge(JobUpdate::from(ProgressEvent::new("Running: WHOIS Lookup", 0, 9)));
        assert_eq!(record.status, JobStatus::Running);
        assert_eq!(record.total, 9);
        assert_eq!(record.target, "example.com");
        assert_eq!(record.filename, "example-com.html");

        record.merge(JobUpdate::failed("boom"));
        assert_eq!(record.total, 9);
        assert_eq!(record.error.as_deref(), Some("boom"));
        assert_eq!(record.stage, "Error");
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(JobStatus::Queued.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Error));
        assert!(!JobStatus::Running.can_transition_to(JobStatus::Queued));
        assert!(!JobStatus::Done.can_transition_to(JobStatus::Error));
        assert!(!JobStatus::Error.can_transition_to(JobStatus::Error));
    }

    #[test]
    fn tokens_are_lowercase_alphanumeric() {
        let token = random_token(12);
        assert_eq!(token.len(), 12);
        assert!(token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn record_serializes_lowercase_status() {
        let record = JobRecord::queued("abc".into(), "example.com", "f.html");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "queued");
        assert!(json.get("error").is_none());
    }
}
