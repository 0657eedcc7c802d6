// src/ui/widgets/sections_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Renders the tool list and the selected tool's command and output.
///
/// Before a job finishes this shows a placeholder or a spinner with the
/// current stage. A failed job shows its error instead of the list.
pub fn render_sections_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Tool Output (Navigate with ↑ ↓)");

    if app.state != AppState::Finished {
        let content = match app.state {
            AppState::Idle => Paragraph::new("Tool output will appear here...").alignment(Alignment::Center),
            _ => {
                let stage = app.job.as_ref().map_or("Queued", |j| j.stage.as_str());
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
                    Span::raw(stage.to_string()),
                ]))
                .alignment(Alignment::Center)
            }
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    if let Some(error) = &app.error {
        let text = Text::from(vec![
            Line::from(""),
            Line::from("✗ JOB FAILED".bold().fg(Color::Red)),
            Line::from(""),
            Line::from(error.as_str()),
        ]);
        let p = Paragraph::new(text).alignment(Alignment::Center).block(main_block);
        frame.render_widget(p, area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(app.sections.len() as u16 + 1), Constraint::Min(0)])
        .split(inner_area);

    let items: Vec<ListItem> = app
        .sections
        .iter()
        .map(|section| {
            let marker = if section.output.starts_with("[!]") {
                Span::styled("✗ ", Style::default().fg(Color::Red))
            } else {
                Span::styled("✓ ", Style::default().fg(Color::Green))
            };
            ListItem::new(Line::from(vec![marker, Span::raw(section.title.as_str())]))
        })
        .collect();

    let list = List::new(items).highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, chunks[0], &mut app.section_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Output");
    let Some(section) = app.selected_section() else {
        let p = Paragraph::new("Select a tool above to see its output.")
            .alignment(Alignment::Center)
            .block(detail_block);
        frame.render_widget(p, chunks[1]);
        return;
    };

    let mut lines = vec![
        Line::from(vec!["$ ".yellow().bold(), Span::styled(section.command.as_str(), Style::default().fg(Color::Yellow))]),
        Line::from(""),
    ];
    lines.extend(section.output.lines().map(Line::from));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.output_scroll, 0))
        .block(detail_block);
    frame.render_widget(p, chunks[1]);
}
