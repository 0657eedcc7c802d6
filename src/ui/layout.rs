// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas for each widget.
pub struct AppLayout {
    pub input: Rect,
    pub sections: Rect,
    pub progress: Rect,
    pub footer: Rect,
    /// Zero-sized when the log panel is hidden.
    pub log_panel: Rect,
}

/// Splits the frame into input, content and footer rows. The content row
/// holds the section browser, the progress panel and, optionally, the logs.
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_constraints = if show_logs {
        vec![Constraint::Percentage(45), Constraint::Percentage(25), Constraint::Percentage(30)]
    } else {
        vec![Constraint::Percentage(68), Constraint::Percentage(32)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    AppLayout {
        input: main_chunks[0],
        sections: content_chunks[0],
        progress: content_chunks[1],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
        footer: main_chunks[2],
    }
}
