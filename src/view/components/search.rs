use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::icons;

fn match_summary(matches: usize, total: usize) -> (String, Color) {
    match matches {
        0 => (format!(" no match in {total}"), Color::Red),
        n => (format!(" {n} of {total} PRs"), Color::DarkGray),
    }
}

/// Query line under the table; keys are hinted only while typing
pub fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" filter ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(app.search_query.as_str(), Style::default().fg(Color::White).bold()),
    ];

    if app.search_mode {
        spans.push(Span::styled(icons::CURSOR, Style::default().fg(Color::Cyan)));
    }

    if !app.search_query.is_empty() {
        let (summary, color) =
            match_summary(app.filtered_indices.len(), app.view.pull_requests().count());
        spans.push(Span::styled(summary, Style::default().fg(color)));
    }

    if app.search_mode {
        spans.push(Span::styled(
            "  ⏎ keep · esc clear",
            Style::default().fg(Color::DarkGray).italic(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
