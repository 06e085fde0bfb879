//! Card and list resolution against a board.
//!
//! Lookups never fail outward: provider errors are logged and reported as
//! "not found", which callers treat as a skip.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::BoardApi;
use crate::error::BoardApiError;
use crate::models::Card;

/// Resolves human identifiers to provider records.
#[derive(Clone)]
pub struct BoardDirectory {
    api: Arc<dyn BoardApi>,
}

impl BoardDirectory {
    #[must_use]
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self { api }
    }

    /// Resolve a card by its board-scoped number.
    ///
    /// Returns `None` for an empty number (no provider call) and when the
    /// provider does not return the card.
    pub async fn resolve_card(&self, board_id: &str, number: &str) -> Option<Card> {
        if number.is_empty() {
            return None;
        }

        match self.api.get_card(board_id, number).await {
            Ok(card) => Some(card),
            Err(e) => {
                log_provider_error("Card lookup failed", &e);
                None
            }
        }
    }

    /// Resolve a non-archived list by exact name.
    ///
    /// When several open lists share the name, the first one in provider
    /// order wins.
    pub async fn resolve_list(&self, board_id: &str, name: &str) -> Option<String> {
        let lists = match self.api.get_lists(board_id).await {
            Ok(lists) => lists,
            Err(e) => {
                log_provider_error("List lookup failed", &e);
                return None;
            }
        };

        let found = lists
            .into_iter()
            .filter(|list| !list.closed)
            .find(|list| list.name == name)
            .map(|list| list.id);

        if found.is_none() {
            debug!(board_id = %board_id, list = %name, "No open list with this name");
        }
        found
    }
}

/// Log a provider failure with its URL, status and reason.
pub(crate) fn log_provider_error(message: &str, error: &BoardApiError) {
    warn!(
        url = %error.url(),
        status = ?error.status().map(|s| s.as_u16()),
        reason = %error.reason(),
        "{message}"
    );
}
