use chrono::Local;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{Label, PullRequest};
use crate::icons;
use crate::utils::updated_label;

use super::popups::truncate_string;

/// Parse a label's `rrggbb` colour, falling back to gray
fn label_color(label: &Label) -> Color {
    let hex = label.color.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::Gray;
    }
    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

fn detail_lines(pr: &PullRequest) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        truncate_string(&pr.title, 80),
        Style::default().fg(Color::White).bold(),
    ))];

    let mut meta: Vec<Span<'static>> = pr
        .labels
        .iter()
        .flat_map(|label| {
            [
                Span::styled(
                    format!("[{}]", label.name),
                    Style::default().fg(label_color(label)),
                ),
                Span::raw(" "),
            ]
        })
        .collect();
    meta.push(Span::styled(
        format!("updated {}", updated_label(pr.updated_at, &Local::now())),
        Style::default().fg(Color::DarkGray),
    ));
    lines.push(Line::from(meta));

    for (context, entry) in &pr.statuses {
        let (symbol, color) = entry.state.display();
        lines.push(Line::from(vec![
            Span::styled(format!("  {symbol} "), Style::default().fg(color)),
            Span::raw(context.clone()),
            Span::styled(
                format!("  {}", truncate_string(&entry.description, 60)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    for run in &pr.check_runs {
        let (symbol, color) = run.state().display();
        lines.push(Line::from(vec![
            Span::styled(format!("  {symbol} "), Style::default().fg(color)),
            Span::raw(run.key()),
        ]));
    }

    lines
}

/// Render the PR table, one multi-line row per pull request
pub fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let visible_prs = app.visible_prs();

    let header = Row::new(vec![
        Cell::from("PR#").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from("Repository").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from("Details").style(Style::default().fg(Color::Yellow).bold()),
        Cell::from(icons::COMMENTS).style(Style::default().fg(Color::Yellow).bold()),
    ])
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = visible_prs
        .iter()
        .map(|pr| {
            let details = detail_lines(pr);
            let height = details.len() as u16;
            Row::new(vec![
                Cell::from(format!("#{}", pr.number)),
                Cell::from(truncate_string(&pr.repo.to_string(), 24))
                    .style(Style::default().fg(Color::Magenta)),
                Cell::from(Text::from(details)),
                Cell::from(pr.comment_count.to_string()),
            ])
            .height(height)
            .bottom_margin(1)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(26),
        Constraint::Min(40),
        Constraint::Length(5),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(icons::SELECTOR);

    f.render_stateful_widget(table, area, &mut app.table_state.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_colors_parse_hex_and_fall_back() {
        let label = |color: &str| Label {
            name: "bug".to_string(),
            color: color.to_string(),
        };
        assert_eq!(label_color(&label("d73a4a")), Color::Rgb(0xd7, 0x3a, 0x4a));
        assert_eq!(label_color(&label("")), Color::Gray);
        assert_eq!(label_color(&label("zzzzzz")), Color::Gray);
    }
}
