use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::icons;

use super::components::{
    render_footer, render_header, render_help_popup, render_search_bar, render_table,
    render_warning,
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let show_search = app.search_mode || !app.search_query.is_empty();

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Length(1), // Separator
    ];
    if app.view.warning.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0)); // Table
    if show_search {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1)); // Footer

    let chunks = Layout::vertical(constraints).split(f.area());
    let mut next = 0;
    let mut take = || {
        let area = chunks[next];
        next += 1;
        area
    };

    render_header(f, app, take());

    let separator_area = take();
    let separator = icons::SEPARATOR_CHAR.repeat(separator_area.width as usize);
    f.render_widget(
        Paragraph::new(separator).style(Style::default().fg(Color::DarkGray)),
        separator_area,
    );

    if let Some(warning) = &app.view.warning {
        render_warning(f, warning, take());
    }

    render_table(f, app, take());

    if show_search {
        render_search_bar(f, app, take());
    }

    render_footer(f, app, take());

    if app.show_help_popup {
        render_help_popup(f);
    }
}
