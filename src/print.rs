//! Plain-text listing output for `--print`.

use std::io::Write;

use anyhow::Result;

use crate::app::{App, AppEvent};
use crate::listing::{Category, LoadState};
use crate::util::format_deadline;

/// Load one selection and write `pages` pages of it to `out`.
///
/// A fetch failure is returned as an error carrying the session message.
/// Fetches go through [`App::handle_event`], so a fresh unfiltered listing
/// is snapshotted; call [`App::flush_writes`] before exiting.
pub async fn print_listing<W: Write>(
    app: &mut App,
    category: Category,
    query: &str,
    pages: usize,
    out: &mut W,
) -> Result<()> {
    if let Some(ticket) = app.session.select(category, query) {
        let result = ticket.fetch(&app.client).await;
        app.handle_event(AppEvent::ListingLoaded { ticket, result });
    }

    match app.session.state() {
        LoadState::Error => {
            anyhow::bail!(
                "{}",
                app.session
                    .error()
                    .unwrap_or("Failed to fetch opportunities")
            );
        }
        LoadState::Ready if !app.session.has_data() => {
            writeln!(out, "No {} opportunities found.", category)?;
            return Ok(());
        }
        _ => {}
    }

    for _ in 1..pages.max(1) {
        if !app.session.load_more() {
            break;
        }
    }

    for (i, opp) in app.session.displayed().iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, opp.title)?;
        writeln!(
            out,
            "     {} | {} | {}",
            opp.kind,
            opp.source,
            format_deadline(opp.deadline.as_deref())
        )?;
        writeln!(out, "     {}", opp.link)?;
    }
    writeln!(
        out,
        "\nShowing {} of {} {} opportunities",
        app.session.displayed_count(),
        app.session.matched_count(),
        category
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{ListingClient, Opportunity};
    use crate::storage::{SavedStore, SnapshotStore};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(n: usize) -> serde_json::Value {
        let items: Vec<_> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Grant {i}"),
                    "link": format!("https://example.com/{i}"),
                    "source": "Fastweb",
                    "deadline": "2026-12-01",
                    "type": "scholarship",
                })
            })
            .collect();
        serde_json::json!({ "opportunities": items })
    }

    async fn serve(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/opportunities/Scholarships"))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    fn test_app(name: &str, server: &MockServer) -> App {
        let dir = std::env::temp_dir().join(format!("wealthsage_print_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let client = ListingClient::new(reqwest::Client::new(), &server.uri()).unwrap();
        let saved = SavedStore::load(&dir.join("saved.json")).unwrap();
        let snapshots =
            SnapshotStore::load(&dir.join("snapshots.json"), chrono::Duration::minutes(10))
                .unwrap();
        App::new(client, Duration::from_millis(300), saved, snapshots)
    }

    async fn run(app: &mut App, pages: usize) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = print_listing(app, Category::Scholarships, "", pages, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_prints_requested_pages() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_json(listing(25))).await;
        let mut app = test_app("pages", &server);

        let (result, text) = run(&mut app, 2).await;
        result.unwrap();

        assert!(text.starts_with("  1. Grant 0\n     Scholarship | Fastweb | Dec 01, 2026\n     https://example.com/0\n"));
        assert!(text.contains(" 20. Grant 19\n"));
        assert!(!text.contains("Grant 20"));
        assert!(text.ends_with("\nShowing 20 of 25 Scholarships opportunities\n"));
    }

    #[tokio::test]
    async fn test_pages_beyond_listing_stop_at_end() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_json(listing(12))).await;
        let mut app = test_app("overshoot", &server);

        let (result, text) = run(&mut app, 5).await;
        result.unwrap();
        assert!(text.contains(" 12. Grant 11\n"));
        assert!(text.ends_with("Showing 12 of 12 Scholarships opportunities\n"));
    }

    #[tokio::test]
    async fn test_empty_listing_message() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_json(listing(0))).await;
        let mut app = test_app("empty", &server);

        let (result, text) = run(&mut app, 1).await;
        result.unwrap();
        assert_eq!(text, "No Scholarships opportunities found.\n");
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned_and_prints_nothing() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(503)).await;
        let mut app = test_app("error", &server);

        let (result, text) = run(&mut app, 1).await;
        let err = result.unwrap_err().to_string();
        assert!(err.starts_with("Failed to fetch Scholarships opportunities"), "{err}");
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_printed_listing_is_snapshotted() {
        let server = MockServer::start().await;
        serve(&server, ResponseTemplate::new(200).set_body_json(listing(3))).await;
        let mut app = test_app("snapshot", &server);

        run(&mut app, 1).await.0.unwrap();
        app.flush_writes().await;

        let dir = std::env::temp_dir().join("wealthsage_print_snapshot");
        let store =
            SnapshotStore::load(&dir.join("snapshots.json"), chrono::Duration::minutes(10))
                .unwrap();
        let snap: Vec<Opportunity> = store
            .get_fresh_as("Scholarships", chrono::Utc::now())
            .unwrap();
        assert_eq!(snap.len(), 3);
    }
}
