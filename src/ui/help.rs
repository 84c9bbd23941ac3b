//! Help overlay listing the dashboard keys.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

const BINDINGS: &[(&str, &str)] = &[
    ("Tab / →", "Next category"),
    ("Shift+Tab / ←", "Previous category"),
    ("1-3", "Jump to category"),
    ("/", "Search"),
    ("Esc", "Clear search"),
    ("Enter", "Search now / open link"),
    ("j / k", "Move selection"),
    ("n", "Load more"),
    ("r", "Refresh (retry after an error)"),
    ("s", "Save / unsave"),
    ("o", "Open link in browser"),
    ("v", "Toggle saved view"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

pub fn render(f: &mut Frame) {
    let overlay = centered_rect(60, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = BINDINGS
        .iter()
        .map(|(key, action)| Row::new(vec![format!("  {}", key), action.to_string()]))
        .collect();

    let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
