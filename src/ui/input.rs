//! Keyboard handling.
//!
//! Routes keys to the help overlay, the search bar or the browse view
//! depending on the current mode.

use crate::app::{App, AppEvent, View};
use crate::listing::{Category, LoadState};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code, event_tx);
        return Action::Continue;
    }

    handle_browse_input(app, code, event_tx)
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::Right => {
            let next = app.session.category().next();
            app.select_category(next, event_tx);
        }
        KeyCode::BackTab | KeyCode::Left => {
            let prev = app.session.category().prev();
            app.select_category(prev, event_tx);
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            if let Some(&category) = Category::ALL.get(idx) {
                if category != app.session.category() || app.view != View::Browse {
                    app.select_category(category, event_tx);
                }
            }
        }
        KeyCode::Char('/') => {
            // Search always targets the category listing
            if app.view == View::Saved {
                app.toggle_view();
            }
            app.search_mode = true;
            app.search_input = app.session.query().to_string();
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_selection(-1),
        KeyCode::Home => app.selected = 0,
        KeyCode::End => app.selected = app.list_len().saturating_sub(1),
        KeyCode::Char('n') if app.view == View::Browse => app.load_more(),
        KeyCode::Char('r') if app.view == View::Browse => {
            // Retry from the error state is the same action
            if app.session.state() != LoadState::Loading {
                app.refresh(event_tx);
            }
        }
        KeyCode::Char('s') => app.toggle_saved(),
        KeyCode::Char('o') | KeyCode::Enter => app.open_selected(),
        KeyCode::Char('v') => app.toggle_view(),
        _ => {}
    }
    Action::Continue
}

fn handle_search_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.search_input.clear();
            app.commit_query("", event_tx);
        }
        KeyCode::Enter => {
            app.search_mode = false;
            let query = app.search.flush().unwrap_or_else(|| app.search_input.clone());
            app.commit_query(&query, event_tx);
        }
        KeyCode::Backspace => {
            let mut input = app.search_input.clone();
            input.pop();
            app.update_search(input);
        }
        KeyCode::Char(c) => {
            let mut input = app.search_input.clone();
            input.push(c);
            app.update_search(input);
        }
        _ => {}
    }
}
