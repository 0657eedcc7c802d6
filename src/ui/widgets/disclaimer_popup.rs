// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    text::Line,
};

/// Renders the authorization disclaimer as a centered modal over the UI.
pub fn render_disclaimer_popup(frame: &mut Frame, area: Rect) {
    let disclaimer_text = Text::from(vec![
        Line::from("IMPORTANT LEGAL DISCLAIMER".bold().yellow()),
        Line::from(""),
        Line::from("Vanguard Recon runs active reconnaissance tools (port scans, directory brute force, WAF probes) against the target you enter."),
        Line::from(""),
        Line::from("Only scan systems you own or have explicit, written permission to test. Unauthorized scanning is illegal in many jurisdictions."),
        Line::from(""),
        Line::from("By continuing you agree that:"),
        Line::from("1. You are authorized to assess every target you submit."),
        Line::from("2. You will comply with all applicable laws and engagement rules."),
        Line::from("3. The authors accept NO liability for misuse or damage."),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to Acknowledge and Continue".bold()),
    ]);

    let block = Block::default()
        .title("Disclaimer")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(70, 70, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    // Clear first so the UI underneath does not bleed through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// A `Rect` of the given percentages, centered in `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
