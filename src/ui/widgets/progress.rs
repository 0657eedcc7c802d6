// src/ui/widgets/progress.rs

use crate::app::App;
use crate::core::models::JobStatus;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// Renders the job panel: status, percent gauge, step counter, stage
/// timeline and, once finished, where the report went.
pub fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let container = Block::default().borders(Borders::ALL).title("Job");
    frame.render_widget(container, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Timeline
            Constraint::Length(3), // Report path
        ])
        .split(area);

    let Some(job) = &app.job else {
        let idle = Paragraph::new("No job running.").alignment(Alignment::Center);
        frame.render_widget(idle, chunks[0]);
        return;
    };

    let status_style = match job.status {
        JobStatus::Queued => Style::default().fg(Color::DarkGray),
        JobStatus::Running => Style::default().fg(Color::Cyan),
        JobStatus::Done => Style::default().fg(Color::Green),
        JobStatus::Error => Style::default().fg(Color::Red),
    };
    let status_text = Text::from(vec![
        Line::from(vec![Span::raw("Job "), Span::styled(job.id.as_str(), Style::default().fg(Color::Yellow))]),
        Line::from(job.status.to_string().to_uppercase()).style(status_style),
        Line::from(format!("Step {}/{}", job.current, job.total)),
    ]);
    frame.render_widget(Paragraph::new(status_text).alignment(Alignment::Center), chunks[0]);

    let gauge = Gauge::default()
        .percent(u16::from(job.percent.min(100)))
        .label(format!("{}%", job.percent))
        .gauge_style(status_style);
    frame.render_widget(gauge, chunks[1]);

    // Newest stages at the bottom, older ones scroll off the top.
    let height = chunks[3].height.saturating_sub(1) as usize;
    let start = app.timeline.len().saturating_sub(height);
    let timeline_lines: Vec<Line> = app.timeline[start..]
        .iter()
        .map(|stage| {
            let style = if stage.starts_with("Completed") || stage == "Done" {
                Style::default().fg(Color::Green)
            } else if stage == "Error" {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Line::from(Span::styled(stage.as_str(), style))
        })
        .collect();
    let timeline = Paragraph::new(timeline_lines).block(Block::default().title("STAGES".bold()));
    frame.render_widget(timeline, chunks[3]);

    let footer_line = match (&app.report_path, &job.error) {
        (_, Some(error)) => Line::from(Span::styled(format!("Error: {error}"), Style::default().fg(Color::Red))),
        (Some(path), None) => Line::from(vec![Span::raw("Report: "), Span::styled(path.display().to_string(), Style::default().fg(Color::Cyan))]),
        (None, None) => Line::from(format!("Report file: {}", job.filename)),
    };
    frame.render_widget(
        Paragraph::new(footer_line).wrap(ratatui::widgets::Wrap { trim: true }),
        chunks[4],
    );
}
