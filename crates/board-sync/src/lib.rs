//! Trello card synchronization for CI events.
//!
//! This crate provides:
//! - Card reference extraction from commit messages, PR titles and branch names
//! - A REST client for the Trello API behind the [`BoardApi`] trait
//! - Card and list resolution against a single board
//! - Idempotent card mutations (attachments, comments, list moves)
//! - An orchestrator that routes one CI event payload to the above
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use board_sync::{CardSync, Config, EventPayload, TrelloClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let client = TrelloClient::new(&config)?;
//! let sync = CardSync::new(Arc::new(client), &config)?;
//!
//! let event = EventPayload::from_path("event.json")?;
//! let report = sync.run(&event).await?;
//! println!("Processed {} card(s)", report.cards.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every provider call can fail

pub mod api;
pub mod client;
pub mod config;
pub mod directory;
pub mod error;
pub mod event;
pub mod extract;
pub mod models;
pub mod mutation;
pub mod sync;

pub use api::BoardApi;
pub use client::TrelloClient;
pub use config::{ActionKind, Config, ListTargets};
pub use directory::BoardDirectory;
pub use error::{BoardApiError, ConfigError, SyncError};
pub use event::{EventPayload, SyncEvent};
pub use extract::Extractor;
pub use models::*;
pub use mutation::{CardMutator, Outcome};
pub use sync::{CardReport, CardSync, EventKind, SyncReport};
