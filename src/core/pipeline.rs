// src/core/pipeline.rs

//! The fixed recon sequence and the single-tool path.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::core::builder::{self, CommandVector};
use crate::core::catalog;
use crate::core::error::Result;
use crate::core::models::{ProgressEvent, SingleToolRun, ToolResult};
use crate::core::options::{SelectedOptions, ToolDefinition};
use crate::core::report::ReportRenderer;
use crate::core::runner::CommandRunner;
use crate::core::target::NormalizedTarget;
use crate::core::wildcard::{WildcardProbe, WildcardSignature};

pub const SUBDOMAIN_TOOL_ID: &str = "subfinder";
pub const NO_SUBDOMAINS: &str = "No subdomains found.";

/// Receives progress snapshots from a running batch.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _event: ProgressEvent) {}
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Output post-processing attached to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    None,
    /// Blank output becomes an explicit "nothing found" line.
    Subdomains,
}

impl PostProcess {
    pub fn apply(self, output: String) -> String {
        match self {
            PostProcess::Subdomains if output.trim().is_empty() => NO_SUBDOMAINS.to_string(),
            _ => output,
        }
    }

    fn for_tool(tool: &ToolDefinition) -> Self {
        if tool.id == SUBDOMAIN_TOOL_ID { PostProcess::Subdomains } else { PostProcess::None }
    }
}

/// One planned tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub title: String,
    pub command: CommandVector,
    pub post: PostProcess,
}

impl Step {
    fn new(title: impl Into<String>, command: CommandVector) -> Self {
        Self { title: title.into(), command, post: PostProcess::None }
    }

    fn from_tool(tool: &ToolDefinition, target: &NormalizedTarget, selected: &SelectedOptions) -> Self {
        Self {
            title: tool.title.to_string(),
            command: builder::build(tool, target, selected),
            post: PostProcess::for_tool(tool),
        }
    }
}

/// A finished batch: the rendered document and the sections it was built from.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub domain: String,
    pub html: String,
    pub sections: Vec<ToolResult>,
}

/// Timeouts and the wordlist for one batch.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub tool_timeout: Duration,
    pub wordlist: String,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { tool_timeout: Duration::from_secs(90), wordlist: "./common.txt".to_string() }
    }
}

/// The nine steps of a full recon, in report order.
///
/// Every tool runs against the bare host; URL tools get `https://<domain>`
/// whatever path the user typed. WHOIS gets the host with `www.` removed.
pub fn build_steps(target: &NormalizedTarget, signature: &WildcardSignature, wordlist: &str) -> Result<Vec<Step>> {
    let root = NormalizedTarget { url: target.root_url(), ..target.clone() };
    let apex = NormalizedTarget { domain: target.apex().to_string(), ..root.clone() };
    let none = SelectedOptions::new();

    let subfinder = catalog::get_tool(SUBDOMAIN_TOOL_ID)?;

    let mut gobuster = CommandVector::new(["gobuster", "dir", "-u"]);
    gobuster.push(root.url.as_str());
    gobuster.extend(["-w", wordlist, "-f"]);
    gobuster.extend(signature.directory_scan_filter());

    Ok(vec![
        Step::new("WHOIS Lookup", builder::build(catalog::get_tool("whois")?, &apex, &none)),
        Step::new("NSLookup", builder::build(catalog::get_tool("nslookup")?, &root, &none)),
        Step::new("DIG DNS Info", builder::build(catalog::get_tool("dig")?, &root, &none)),
        Step::new(
            "Nmap Fast Scan",
            builder::build(catalog::get_tool("nmap")?, &root, &SelectedOptions::new().with("-F", true)),
        ),
        Step::new(
            "HTTP Headers (curl)",
            builder::build(catalog::get_tool("curl")?, &root, &SelectedOptions::new().with("-I", true)),
        ),
        Step::new("WhatWeb Fingerprint", builder::build(catalog::get_tool("whatweb")?, &root, &none)),
        Step {
            title: subfinder.title.to_string(),
            command: CommandVector::new(["subfinder", "-silent", "-d", root.domain.as_str()]),
            post: PostProcess::Subdomains,
        },
        Step::new("Gobuster Directory Scan", gobuster),
        Step::new("WAF Detection (WAFW00F)", builder::build(catalog::get_tool("wafw00f")?, &root, &none)),
    ])
}

async fn run_step<R: CommandRunner>(runner: &R, step: &Step, limit: Duration) -> ToolResult {
    let output = runner.run(&step.command, limit).await;
    ToolResult {
        title: step.title.clone(),
        command: step.command.joined(),
        output: step.post.apply(output),
    }
}

/// Runs the full recon sequence against `raw_target`.
///
/// The target is normalized before anything touches the network, so an
/// invalid target fails without probing or spawning anything. Steps run
/// strictly one after another; a failing tool only affects its own section.
///
/// # Progress
///
/// Before step `i` of `N`: `floor((i-1)/N*100)`, `"Running: <title>"`.
/// After it: `floor(i/N*100)`, `"Completed: <title>"`. After rendering a final
/// `{100, "Done", N, N}` is emitted.
#[instrument(name = "batch", skip_all, fields(input = %raw_target.trim()))]
pub async fn run_batch<R, W, T, P>(
    runner: &R,
    probe: &W,
    renderer: &T,
    settings: &BatchSettings,
    raw_target: &str,
    progress: &P,
) -> Result<BatchReport>
where
    R: CommandRunner,
    W: WildcardProbe,
    T: ReportRenderer,
    P: ProgressSink + ?Sized,
{
    let target = NormalizedTarget::parse(raw_target)?;
    let signature = probe.probe(&target.domain).await;
    let steps = build_steps(&target, &signature, &settings.wordlist)?;
    let total = steps.len();
    info!(domain = %target.domain, steps = total, "Batch started.");

    let mut sections = Vec::with_capacity(total);
    for (i, step) in steps.iter().enumerate() {
        progress.emit(ProgressEvent::new(format!("Running: {}", step.title), i, total));
        let section = run_step(runner, step, settings.tool_timeout).await;
        if section.output.starts_with("[!]") {
            warn!(tool = %step.title, "Tool reported a failure; continuing.");
        }
        sections.push(section);
        progress.emit(ProgressEvent::new(format!("Completed: {}", step.title), i + 1, total));
    }

    let html = renderer.render(&target.raw, &target.domain, &sections)?;
    progress.emit(ProgressEvent { percent: 100, stage: "Done".to_string(), current: total, total });
    info!(domain = %target.domain, "Batch finished.");

    Ok(BatchReport { domain: target.domain, html, sections })
}

/// Runs one catalogued tool with the user's options.
pub async fn run_single_tool<R: CommandRunner>(
    runner: &R,
    raw_target: &str,
    tool_id: &str,
    selected: &SelectedOptions,
    limit: Duration,
) -> Result<SingleToolRun> {
    let target = NormalizedTarget::parse(raw_target)?;
    let tool = catalog::get_tool(tool_id)?;
    let step = Step::from_tool(tool, &target, selected);
    info!(tool = tool.id, command = %step.command, "Single tool run.");

    let section = run_step(runner, &step, limit).await;
    Ok(SingleToolRun { target: raw_target.to_string(), domain: target.domain, section })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::report::HtmlReportRenderer;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every command and answers from a fixed table keyed by program.
    #[derive(Default)]
    pub(crate) struct FakeRunner {
        pub calls: Mutex<Vec<CommandVector>>,
        pub outputs: HashMap<&'static str, &'static str>,
    }

    impl FakeRunner {
        pub fn with_output(mut self, program: &'static str, output: &'static str) -> Self {
            self.outputs.insert(program, output);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, command: &CommandVector, _limit: Duration) -> String {
            self.calls.lock().unwrap().push(command.clone());
            let program = command.program().unwrap_or_default();
            self.outputs
                .get(program)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("{program} ok\n"))
        }
    }

    pub(crate) struct FixedProbe(pub WildcardSignature);

    impl WildcardProbe for FixedProbe {
        async fn probe(&self, _domain: &str) -> WildcardSignature {
            self.0
        }
    }

    fn unknown() -> FixedProbe {
        FixedProbe(WildcardSignature::default())
    }

    #[test]
    fn steps_follow_the_fixed_order() {
        let target = NormalizedTarget::parse("https://www.Example.com/app").unwrap();
        let steps = build_steps(&target, &WildcardSignature::default(), "./common.txt").unwrap();
        let commands: Vec<String> = steps.iter().map(|s| s.command.joined()).collect();
        assert_eq!(
            commands,
            [
                "whois example.com",
                "nslookup www.example.com",
                "dig www.example.com",
                "nmap -F www.example.com",
                "curl -I https://www.example.com",
                "whatweb https://www.example.com",
                "subfinder -silent -d www.example.com",
                "gobuster dir -u https://www.example.com -w ./common.txt -f -b 404",
                "wafw00f https://www.example.com",
            ]
        );
        assert_eq!(steps[6].title, "Subdomain Enumeration (subfinder)");
        assert_eq!(steps[6].post, PostProcess::Subdomains);
        assert_eq!(steps[8].title, "WAF Detection (WAFW00F)");
    }

    #[test]
    fn soft_200_without_length_filters_on_404() {
        let target = NormalizedTarget::parse("example.com").unwrap();
        let signature = WildcardSignature { length: Some(0), status: Some(200) };
        let steps = build_steps(&target, &signature, "/w.txt").unwrap();
        let gobuster = steps.iter().find(|s| s.title == "Gobuster Directory Scan").unwrap();
        assert!(gobuster.command.joined().ends_with("-f -b 404"));

        let sized = WildcardSignature { length: Some(512), status: Some(200) };
        let steps = build_steps(&target, &sized, "/w.txt").unwrap();
        assert!(steps[7].command.joined().ends_with("--exclude-length 512"));
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_done() {
        let runner = FakeRunner::default();
        let events = Mutex::new(Vec::new());
        let sink = |e: ProgressEvent| events.lock().unwrap().push(e);

        let report = run_batch(
            &runner,
            &unknown(),
            &HtmlReportRenderer::new(),
            &BatchSettings::default(),
            "example.com",
            &sink,
        )
        .await
        .unwrap();

        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 2 * 9 + 1);
        assert_eq!(events[0], ProgressEvent::new("Running: WHOIS Lookup", 0, 9));
        assert_eq!(events[1].percent, 11);
        assert!(events.windows(2).all(|w| w[0].percent <= w[1].percent));
        assert!(events[0].percent <= events[1].percent);

        let last = events.last().unwrap();
        assert_eq!((last.percent, last.stage.as_str(), last.current, last.total), (100, "Done", 9, 9));

        assert_eq!(runner.call_count(), 9);
        assert_eq!(report.sections.len(), 9);
        assert_eq!(report.domain, "example.com");
        assert!(report.html.contains("WHOIS Lookup"));
    }

    #[tokio::test]
    async fn invalid_target_runs_nothing() {
        let runner = FakeRunner::default();
        for raw in ["", "   "] {
            let err = run_batch(&runner, &unknown(), &HtmlReportRenderer::new(), &BatchSettings::default(), raw, &NoProgress)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidTarget));
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_subdomain_output_is_rewritten() {
        let runner = FakeRunner::default().with_output("subfinder", "  \n\t\n");
        let report = run_batch(
            &runner,
            &unknown(),
            &HtmlReportRenderer::new(),
            &BatchSettings::default(),
            "example.com",
            &NoProgress,
        )
        .await
        .unwrap();
        let section = &report.sections[6];
        assert_eq!(section.output, NO_SUBDOMAINS);
        assert_eq!(section.command, "subfinder -silent -d example.com");

        let found = FakeRunner::default().with_output("subfinder", "a.example.com\n");
        let run = run_single_tool(&found, "example.com", "subfinder", &SelectedOptions::new(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(run.section.output, "a.example.com\n");
    }

    #[tokio::test]
    async fn tool_failures_stay_in_their_section() {
        let runner = FakeRunner::default().with_output("nmap", "[!] Tool not installed: nmap\n");
        let report = run_batch(
            &runner,
            &unknown(),
            &HtmlReportRenderer::new(),
            &BatchSettings::default(),
            "example.com",
            &NoProgress,
        )
        .await
        .unwrap();
        assert_eq!(report.sections.len(), 9);
        assert_eq!(report.sections[3].output, "[!] Tool not installed: nmap\n");
        assert_eq!(report.sections[4].output, "curl ok\n");
    }

    #[tokio::test]
    async fn single_tool_reports_title_and_command() {
        let runner = FakeRunner::default().with_output("dig", ";; ANSWER\n");
        let selected = SelectedOptions::new().with("-t", "MX").with("@", "1.1.1.1");
        let run = run_single_tool(&runner, "Example.com", "dig", &selected, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(run.target, "Example.com");
        assert_eq!(run.domain, "example.com");
        assert_eq!(run.section.title, catalog::get_tool("dig").unwrap().title);
        assert_eq!(run.section.command, "dig @1.1.1.1 MX example.com");
        assert_eq!(run.section.output, ";; ANSWER\n");
    }

    #[tokio::test]
    async fn single_tool_unknown_id_is_not_found() {
        let runner = FakeRunner::default();
        let err = run_single_tool(&runner, "example.com", "nikto", &SelectedOptions::new(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(runner.call_count(), 0);
    }
}
