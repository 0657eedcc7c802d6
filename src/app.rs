// src/app.rs

use std::path::PathBuf;

use ratatui::widgets::{ListState, ScrollbarState};

use crate::core::models::{JobId, JobRecord, JobStatus, ToolResult};
use crate::core::worker::JobOutcome;

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// How many log lines the log panel keeps.
pub const LOG_TAIL_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub show_disclaimer: bool,
    pub show_logs: bool,
    pub input: String,
    pub job_id: Option<JobId>,
    /// Latest registry snapshot of the current job.
    pub job: Option<JobRecord>,
    /// Every distinct stage seen so far, oldest first.
    pub timeline: Vec<String>,
    pub sections: Vec<ToolResult>,
    pub section_list_state: ListState,
    pub output_scroll: u16,
    pub error: Option<String>,
    pub report_path: Option<PathBuf>,
    pub spinner_frame: usize,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            show_disclaimer: true,
            show_logs: false,
            input: String::new(),
            job_id: None,
            job: None,
            timeline: Vec::new(),
            sections: Vec::new(),
            section_list_state: ListState::default(),
            output_scroll: 0,
            error: None,
            report_path: None,
            spinner_frame: 0,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
        }
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Scanning {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn start_job(&mut self, job_id: JobId) {
        self.job_id = Some(job_id);
        self.state = AppState::Scanning;
    }

    /// Records a polled snapshot. Only the current job is accepted.
    pub fn apply_snapshot(&mut self, record: JobRecord) {
        if self.job_id.as_deref() != Some(record.id.as_str()) {
            return;
        }
        if self.timeline.last() != Some(&record.stage) {
            self.timeline.push(record.stage.clone());
        }
        self.job = Some(record);
    }

    /// Takes the finished job's sections, or its error.
    pub fn finish(&mut self, outcome: JobOutcome, report_path: PathBuf) {
        if self.job_id.as_deref() != Some(outcome.job_id.as_str()) {
            return;
        }
        match outcome.result {
            Ok(report) => {
                self.sections = report.sections;
                self.report_path = Some(report_path);
                self.section_list_state.select(if self.sections.is_empty() { None } else { Some(0) });
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.output_scroll = 0;
        self.state = AppState::Finished;
    }

    pub fn current_status(&self) -> Option<JobStatus> {
        self.job.as_ref().map(|j| j.status)
    }

    pub fn selected_section(&self) -> Option<&ToolResult> {
        self.section_list_state.selected().and_then(|i| self.sections.get(i))
    }

    pub fn select_next(&mut self) {
        if self.sections.is_empty() {
            return;
        }
        let next = match self.section_list_state.selected() {
            Some(i) if i + 1 < self.sections.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.section_list_state.select(Some(next));
        self.output_scroll = 0;
    }

    pub fn select_previous(&mut self) {
        if self.sections.is_empty() {
            return;
        }
        let previous = self.section_list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.section_list_state.select(Some(previous));
        self.output_scroll = 0;
    }

    pub fn scroll_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.output_scroll = self.output_scroll.saturating_add(1);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
    }

    pub fn scroll_log_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_log_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.job_id = None;
        self.job = None;
        self.timeline.clear();
        self.sections.clear();
        self.section_list_state = ListState::default();
        self.output_scroll = 0;
        self.error = None;
        self.report_path = None;
        self.spinner_frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::models::{JobUpdate, ProgressEvent};
    use crate::core::pipeline::BatchReport;

    fn snapshot(id: &str, stage: &str) -> JobRecord {
        let mut record = JobRecord::queued(id.to_string(), "example.com", "example-com.html");
        record.merge(JobUpdate::from(ProgressEvent::new(stage, 1, 9)));
        record
    }

    fn section(title: &str) -> ToolResult {
        ToolResult { title: title.into(), command: "cmd".into(), output: "out".into() }
    }

    #[test]
    fn timeline_skips_repeated_stages_and_foreign_jobs() {
        let mut app = App::new();
        app.start_job("job1".into());
        app.apply_snapshot(snapshot("job1", "Running: WHOIS Lookup"));
        app.apply_snapshot(snapshot("job1", "Running: WHOIS Lookup"));
        app.apply_snapshot(snapshot("other", "Running: NSLookup"));
        app.apply_snapshot(snapshot("job1", "Completed: WHOIS Lookup"));

        assert_eq!(app.timeline, ["Running: WHOIS Lookup", "Completed: WHOIS Lookup"]);
        assert_eq!(app.current_status(), Some(JobStatus::Running));
    }

    #[test]
    fn finishing_selects_the_first_section() {
        let mut app = App::new();
        app.start_job("job1".into());
        let report = BatchReport {
            domain: "example.com".into(),
            html: String::new(),
            sections: vec![section("A"), section("B")],
        };
        app.finish(JobOutcome { job_id: "job1".into(), result: Ok(report) }, PathBuf::from("r.html"));

        assert_eq!(app.state, AppState::Finished);
        assert_eq!(app.selected_section().map(|s| s.title.as_str()), Some("A"));
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_section().map(|s| s.title.as_str()), Some("B"));
        app.select_previous();
        assert_eq!(app.selected_section().map(|s| s.title.as_str()), Some("A"));
    }

    #[test]
    fn failed_job_keeps_its_message() {
        let mut app = App::new();
        app.start_job("job1".into());
        app.finish(JobOutcome { job_id: "job1".into(), result: Err(Error::InvalidTarget) }, PathBuf::new());
        assert_eq!(app.error.as_deref(), Some("Target is empty or invalid."));
        assert!(app.sections.is_empty());

        app.reset();
        assert_eq!(app.state, AppState::Idle);
        assert!(app.error.is_none());
    }
}
