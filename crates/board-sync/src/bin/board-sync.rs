//! board-sync - CLI for syncing a CI event onto Trello cards.
//!
//! Reads the GitHub Actions event payload, finds the cards referenced by its
//! commits, pull request or issue, documents the activity on each card and
//! moves it to the list for its lifecycle stage.
//!
//! # Environment Variables
//!
//! - `TRELLO_API_KEY` / `TRELLO_API_TOKEN` - API credentials (required)
//! - `TRELLO_BOARD_ID` - Board holding the cards (required)
//! - `TRELLO_ACTION` - `attachment` (default) or `comment`
//! - `TRELLO_LIST_NAME_COMMIT`, `TRELLO_LIST_NAME_PR_OPEN`,
//!   `TRELLO_LIST_NAME_PR_CLOSED` - destination lists (optional)
//! - `GITHUB_EVENT_PATH` - Event payload path (set by GitHub Actions)
//!
//! # Examples
//!
//! ```bash
//! # Run against the current workflow event
//! board-sync
//!
//! # Replay a saved payload with comments and verbose logging
//! board-sync --event-path push.json --action comment --verbose
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use board_sync::{ActionKind, CardSync, Config, EventPayload, TrelloClient};

/// Sync commits, pull requests and issues onto Trello cards.
#[derive(Parser)]
#[command(name = "board-sync")]
#[command(about = "Sync a CI event onto Trello cards")]
#[command(version)]
struct Cli {
    /// Event payload path (or set `GITHUB_EVENT_PATH` env var)
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// Action applied to each card (overrides `TRELLO_ACTION`)
    #[arg(long)]
    action: Option<ActionKind>,

    /// Board ID (overrides `TRELLO_BOARD_ID`)
    #[arg(long)]
    board_id: Option<String>,

    /// Most recent commits to consider from a push (0 = all)
    #[arg(long)]
    max_commits: Option<usize>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

/// Log filter: `RUST_LOG` when set, otherwise the crate at info (debug when verbose).
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "board_sync=debug"
        } else {
            "board_sync=info"
        })
    })
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter(verbose))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(action) = cli.action {
        config.action = action;
    }
    if let Some(board_id) = cli.board_id {
        config.board_id = board_id;
    }
    if let Some(max_commits) = cli.max_commits {
        config.max_commits = max_commits;
    }
    config.verbose |= cli.verbose;

    init_tracing(config.verbose);
    info!(board_id = %config.board_id, action = %config.action, "Starting board sync");

    let payload = EventPayload::from_path(&cli.event_path)?.limit_commits(config.max_commits);

    let client = TrelloClient::new(&config).context("Failed to create Trello client")?;
    let sync = CardSync::new(Arc::new(client), &config)?;

    let report = sync.run(&payload).await.context("Event rejected")?;

    let total = report.cards.len();
    let resolved = report.resolved().count();
    let failed = report.failures().count();

    if failed > 0 {
        warn!(kind = ?report.kind, total, resolved, failed, "Board sync finished with failures");
    } else {
        info!(kind = ?report.kind, total, resolved, "Board sync finished");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_filter_defaults_to_crate_level() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter(false).to_string(), "board_sync=info");
        assert_eq!(env_filter(true).to_string(), "board_sync=debug");
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_verbosity() {
        std::env::set_var("RUST_LOG", "board_sync=warn");
        assert_eq!(env_filter(true).to_string(), "board_sync=warn");
        std::env::remove_var("RUST_LOG");
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "board-sync",
            "--event-path",
            "push.json",
            "--action",
            "comment",
            "--board-id",
            "b1",
            "--max-commits",
            "0",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.event_path, PathBuf::from("push.json"));
        assert_eq!(cli.action, Some(ActionKind::Comment));
        assert_eq!(cli.board_id.as_deref(), Some("b1"));
        assert_eq!(cli.max_commits, Some(0));
        assert!(cli.verbose);
    }
}
