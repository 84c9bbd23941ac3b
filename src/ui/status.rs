use crate::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar: message or key hints on the left, counts on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_str())
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC clear | ENTER confirm")
    } else {
        match app.view {
            View::Browse => Cow::Borrowed(
                "[Tab]category [/]search [n]more [r]efresh [s]ave [o]pen [v]saved [?]help [q]uit",
            ),
            View::Saved => Cow::Borrowed("[s]unsave [o]pen [v]back [q]uit"),
        }
    };

    let counts = match app.view {
        View::Browse => format!(
            " {}/{} ",
            app.session.displayed_count(),
            app.session.total_count()
        ),
        View::Saved => format!(" {} saved ", app.saved.len()),
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(counts.len() as u16),
        ])
        .split(area);

    f.render_widget(Paragraph::new(text).style(style), chunks[0]);
    f.render_widget(Paragraph::new(counts).style(style), chunks[1]);
}
