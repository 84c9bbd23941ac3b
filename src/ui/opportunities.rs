use crate::app::{App, View};
use crate::listing::{LoadState, Opportunity};
use crate::util::{
    format_deadline, strip_control_chars, truncate_text, truncate_to_width,
    DESCRIPTION_PREVIEW_CHARS,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; super::loop_runner::SPINNER_FRAMES] =
    ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the opportunity list panel.
pub fn render_list(f: &mut Frame, app: &App, area: Rect) {
    // Layout can hand out tiny rects during resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    match app.view {
        View::Browse => render_browse_list(f, app, area),
        View::Saved => {
            let items: Vec<&Opportunity> =
                app.saved.items().iter().map(|s| &s.opportunity).collect();
            let title = format!("Saved ({})", items.len());
            if items.is_empty() {
                render_placeholder(
                    f,
                    area,
                    &title,
                    "Nothing saved yet. Press s on an opportunity to save it.",
                    Color::DarkGray,
                );
            } else {
                render_items(f, app, area, &items, title);
            }
        }
    }
}

fn render_browse_list(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let category = session.category();

    match session.state() {
        LoadState::Idle => render_placeholder(
            f,
            area,
            "Opportunities",
            "Select a category to begin",
            Color::DarkGray,
        ),
        LoadState::Loading => {
            let msg = format!(
                "{} Loading {} opportunities...",
                SPINNER[app.spinner_frame % SPINNER.len()],
                category
            );
            render_placeholder(f, area, category.as_str(), &msg, Color::Yellow);
        }
        LoadState::Error => {
            let msg = format!(
                "{}\n\nPress r to retry",
                session.error().unwrap_or("Failed to load opportunities")
            );
            render_placeholder(f, area, category.as_str(), &msg, Color::Red);
        }
        LoadState::Ready if session.displayed().is_empty() => {
            let msg = if session.query().is_empty() {
                format!("No {} opportunities right now. Press r to refresh.", category)
            } else {
                format!("No opportunities match \"{}\"", session.query())
            };
            render_placeholder(f, area, category.as_str(), &msg, Color::DarkGray);
        }
        LoadState::Ready => {
            let items: Vec<&Opportunity> = session.displayed().iter().collect();
            let mut title = format!(
                "{} ({}/{})",
                category,
                session.displayed_count(),
                session.matched_count()
            );
            if session.has_more() {
                title.push_str(" [n] more");
            }
            render_items(f, app, area, &items, title);
        }
    }
}

fn render_items(f: &mut Frame, app: &App, area: Rect, items: &[&Opportunity], title: String) {
    // Room for borders, highlight symbol and the saved marker
    let text_width = area.width.saturating_sub(6) as usize;

    let rows: Vec<ListItem> = items
        .iter()
        .map(|opp| {
            let marker = if app.saved.is_saved(opp) {
                Span::styled("★ ", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("  ")
            };
            let title = strip_control_chars(&opp.title);
            let title_line = Line::from(vec![
                marker,
                Span::styled(
                    truncate_to_width(&title, text_width).into_owned(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]);

            let meta = format!(
                "{} | {}",
                format_deadline(opp.deadline.as_deref()),
                strip_control_chars(&opp.source)
            );
            let meta_line = Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    truncate_to_width(&meta, text_width).into_owned(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(vec![title_line, meta_line])
        })
        .collect();

    let list = List::new(rows)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_placeholder(f: &mut Frame, area: Rect, title: &str, msg: &str, color: Color) {
    let paragraph = Paragraph::new(msg.to_owned())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_owned()));
    f.render_widget(paragraph, area);
}

/// Render the detail pane for the selected opportunity.
pub fn render_detail(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default().borders(Borders::ALL).title("Details");
    let Some(opp) = app.selected_opportunity() else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let dim = Style::default().fg(Color::DarkGray);
    let description = strip_control_chars(&opp.description);
    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&opp.title).into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} • {}", opp.kind, strip_control_chars(&opp.source)),
            dim,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Deadline: ", dim),
            Span::raw(format_deadline(opp.deadline.as_deref()).into_owned()),
        ]),
        Line::from(vec![
            Span::styled("Relevance: ", dim),
            Span::raw(format!("{:.0}%", opp.relevance_score * 100.0)),
        ]),
        Line::from(""),
        Line::from(truncate_text(&description, DESCRIPTION_PREVIEW_CHARS).into_owned()),
        Line::from(""),
        Line::from(Span::styled(
            strip_control_chars(&opp.link).into_owned(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )),
    ];

    if app.saved.is_saved(opp) {
        lines.insert(
            1,
            Line::from(Span::styled("★ Saved", Style::default().fg(Color::Yellow))),
        );
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
