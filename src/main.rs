use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use wealthsage::app::{App, AppEvent};
use wealthsage::config::{self, Config};
use wealthsage::listing::{Category, ListingClient};
use wealthsage::storage::{SavedStore, SnapshotStore};
use wealthsage::{print, ui};

#[derive(Parser, Debug)]
#[command(
    name = "wealthsage",
    about = "Browse scholarships, hackathons and freelancing gigs from the terminal"
)]
struct Args {
    /// Category to open (Scholarships, Hackathons or Freelancing)
    #[arg(long, short)]
    category: Option<Category>,

    /// Initial search query
    #[arg(long, short)]
    search: Option<String>,

    /// Listing API base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Config file (default: ~/.config/wealthsage/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the listing to stdout instead of starting the dashboard
    #[arg(long)]
    print: bool,

    /// Pages to print with --print
    #[arg(long, default_value_t = 1, value_name = "N")]
    pages: usize,

    /// Delete cached listing snapshots before starting
    #[arg(long)]
    clear_snapshots: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let data_dir = config.resolve_data_dir()?;
    ensure_data_dir(&data_dir)?;
    init_tracing(&data_dir, args.print)?;
    tracing::info!(config = ?config, data_dir = %data_dir.display(), "Starting wealthsage");

    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .user_agent(concat!("wealthsage/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let base_url = args.base_url.as_deref().unwrap_or(&config.api_base_url);
    let client = ListingClient::new(http, base_url)
        .with_context(|| format!("Invalid API base URL: {}", base_url))?
        .with_timeout(config.request_timeout())
        .with_api_token(config.resolve_api_token());

    let mut snapshots =
        SnapshotStore::load(&data_dir.join("snapshots.json"), config.snapshot_freshness())
            .context("Failed to load listing snapshots")?;
    if args.clear_snapshots {
        snapshots.clear().context("Failed to clear snapshots")?;
        println!("Cleared listing snapshots.");
    } else {
        match snapshots.prune(chrono::Utc::now()) {
            Ok(0) => {}
            Ok(n) => tracing::debug!(removed = n, "Pruned stale snapshots"),
            Err(e) => tracing::warn!(error = %e, "Failed to prune snapshots"),
        }
    }
    let saved = SavedStore::load(&data_dir.join("saved.json"))
        .context("Failed to load saved opportunities")?;

    let category = match args.category {
        Some(c) => c,
        None => config.default_category()?,
    };
    let query = args.search.unwrap_or_default();

    let mut app = App::new(client, config.search_debounce(), saved, snapshots);
    app.prime_from_snapshots();

    if args.print {
        let mut stdout = std::io::stdout().lock();
        let result =
            print::print_listing(&mut app, category, &query, args.pages, &mut stdout).await;
        app.flush_writes().await;
        return result;
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    app.select_category(category, &event_tx);
    if !query.trim().is_empty() {
        app.commit_query(&query, &event_tx);
    }

    let result = ui::run(&mut app, event_tx, event_rx).await;
    app.flush_writes().await;
    result
}

fn ensure_data_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)) {
            eprintln!(
                "Warning: failed to restrict permissions on {}: {}",
                dir.display(),
                e
            );
        }
    }
    Ok(())
}

/// The dashboard owns the terminal, so its logs go to a file.
fn init_tracing(data_dir: &Path, to_stderr: bool) -> Result<()> {
    let default_level = if to_stderr { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let log_path = data_dir.join("wealthsage.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}
