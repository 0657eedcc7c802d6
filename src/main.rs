// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

mod app;
mod cli;
mod config;
mod core;
mod logging;
mod ui;

use crate::app::{App, AppState, LOG_TAIL_LINES};
use crate::cli::{Args, Command};
use crate::config::ReconConfig;
use crate::core::catalog;
use crate::core::options::SelectedOptions;
use crate::core::pipeline;
use crate::core::registry::{JobRegistry, JobStore};
use crate::core::runner::ProcessRunner;
use crate::core::worker::{JobOutcome, JobWorker, WorkerContext};
use crate::logging::initialize_logging;

type Worker = JobWorker<JobRegistry>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    initialize_logging()?;
    catalog::validate()?;

    let args = Args::parse();
    let config = ReconConfig::from_env();
    info!(command = ?args.command, "Starting.");

    match args.command {
        Some(Command::Tools) => {
            list_tools();
            Ok(())
        }
        Some(Command::Tool { json, id, target, options }) => {
            run_tool(&config, &id, &target, json.as_deref(), &options).await
        }
        Some(Command::Scan { target }) => run_scan(&config, &target).await,
        None => run_tui(&config).await,
    }
}

fn start_worker(config: &ReconConfig) -> (Worker, UnboundedReceiver<JobOutcome>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = JobWorker::start(WorkerContext {
        runner: ProcessRunner,
        probe: config.wildcard_probe(),
        renderer: config.renderer(),
        store: JobRegistry::new(),
        settings: config.batch_settings(),
        data_dir: config.data_dir.clone(),
        outcomes: Some(tx),
    });
    (worker, rx)
}

// --- Headless modes ---

fn list_tools() {
    for (id, title) in catalog::tools() {
        println!("{id:<12} {title}");
    }
}

async fn run_tool(config: &ReconConfig, id: &str, target: &str, json: Option<&str>, options: &[String]) -> Result<()> {
    let mut selected = match json {
        Some(json) => SelectedOptions::from_json(json)?,
        None => SelectedOptions::new(),
    };
    selected.extend_pairs(options.iter().map(String::as_str));
    let run = pipeline::run_single_tool(&ProcessRunner, target, id, &selected, config.tool_timeout).await?;
    println!("== {} ({}) ==", run.section.title, run.domain);
    println!("$ {}\n", run.section.command);
    print!("{}", run.section.output);
    Ok(())
}

async fn run_scan(config: &ReconConfig, target: &str) -> Result<()> {
    let (worker, mut rx) = start_worker(config);
    let id = worker.submit(target);
    println!("Job {id} queued for {}", target.trim());

    let mut last_stage = String::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let outcome = loop {
        tokio::select! {
            outcome = rx.recv() => break outcome,
            _ = ticker.tick() => {
                if let Some(record) = worker.store().get(&id) {
                    if record.stage != last_stage {
                        println!("[{:>3}%] {}", record.percent, record.stage);
                        last_stage = record.stage;
                    }
                }
            }
        }
    };

    let outcome = outcome.ok_or_else(|| eyre!("Worker stopped before job {id} finished."))?;
    let report = outcome.result?;
    let record = worker.store().get(&id).ok_or_else(|| eyre!("Job {id} disappeared."))?;
    println!("[100%] Done: {} sections", report.sections.len());
    println!("Report written to {}", config.data_dir.join(record.filename).display());
    Ok(())
}

// --- Terminal UI ---

async fn run_tui(config: &ReconConfig) -> Result<()> {
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let (worker, mut rx) = start_worker(config);
    let mut app = App::new();
    let result = event_loop(&mut terminal, &mut app, &worker, &mut rx, config);

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    worker: &Worker,
    rx: &mut UnboundedReceiver<JobOutcome>,
    config: &ReconConfig,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key, worker);
                }
            }
        }
        app.on_tick();

        if let Some(record) = app.job_id.as_deref().and_then(|id| worker.store().get(id)) {
            app.apply_snapshot(record);
        }

        if let Ok(outcome) = rx.try_recv() {
            let report_path = worker
                .store()
                .get(&outcome.job_id)
                .map(|r| config.data_dir.join(r.filename))
                .unwrap_or_else(|| config.data_dir.clone());
            if let Some(record) = worker.store().get(&outcome.job_id) {
                app.apply_snapshot(record);
            }
            app.finish(outcome, report_path);
        }

        if app.show_logs {
            app.log_content = logging::tail_log(LOG_TAIL_LINES);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, worker: &Worker) {
    if app.show_disclaimer {
        match key.code {
            KeyCode::Enter => app.show_disclaimer = false,
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            _ => {}
        }
        return;
    }

    match app.state {
        AppState::Idle => match key.code {
            KeyCode::Esc => app.quit(),
            KeyCode::Tab => app.toggle_logs(),
            KeyCode::Char(c) => app.input.push(c),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Enter => {
                if app.input.trim().is_empty() {
                    return;
                }
                let id = worker.submit(&app.input);
                app.start_job(id);
            }
            _ => {}
        },
        AppState::Scanning => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Char('l') | KeyCode::Tab => app.toggle_logs(),
            KeyCode::Left => app.scroll_log_left(),
            KeyCode::Right => app.scroll_log_right(),
            _ => {}
        },
        AppState::Finished => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Char('n') => app.reset(),
            KeyCode::Char('l') | KeyCode::Tab => app.toggle_logs(),
            KeyCode::Up => app.select_previous(),
            KeyCode::Down => app.select_next(),
            KeyCode::PageUp => app.scroll_up(),
            KeyCode::PageDown => app.scroll_down(),
            KeyCode::Left => app.scroll_log_left(),
            KeyCode::Right => app.scroll_log_right(),
            _ => {}
        },
    }
}
