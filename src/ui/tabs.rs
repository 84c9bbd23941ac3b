use crate::app::{App, View};
use crate::listing::Category;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Render the category tabs.
pub fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i + 1, c)))
        .collect();

    let highlight = if app.view == View::Browse {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let title = match app.view {
        View::Browse => " WealthSage ",
        View::Saved => " WealthSage - saved ",
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(app.session.category().index())
        .highlight_style(highlight)
        .divider("|");

    f.render_widget(tabs, area);
}

/// Render the search bar.
pub fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.search_mode {
        Line::from(vec![
            Span::raw(app.search_input.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if app.session.query().is_empty() {
        Line::from(Span::styled(
            "Press / to search titles, descriptions and sources",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(app.session.query()))
    };

    let border_style = if app.search_mode {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search"),
    );
    f.render_widget(paragraph, area);
}
