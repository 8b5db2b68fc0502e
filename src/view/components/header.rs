use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Title line with the watched user and a spinner while a cycle runs
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Pull Requests for ", Style::default().fg(Color::White)),
        Span::styled(&app.username, Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("  ({} repositories)", app.repositories.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if app.fetching {
        spans.push(Span::styled(
            format!("  {}", app.spinner()),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_warning(f: &mut Frame, warning: &str, area: Rect) {
    f.render_widget(
        Paragraph::new(format!(" {warning}")).style(Style::default().fg(Color::Yellow)),
        area,
    );
}

/// Last refresh time on the left, cycle summary and key hint on the right
pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {}", app.view.last_checked),
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(summary) = &app.last_summary {
        let failures = summary.failures();
        let style = if failures > 0 {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(
                "  cycle {}: {} PRs, {} failed",
                summary.cycle, summary.pull_requests, failures
            ),
            style,
        ));
    }

    spans.push(Span::styled(
        "  ? help",
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
