//! Idempotent card mutations.
//!
//! Every write is preceded by a read of the provider's current state, so
//! replaying the same event leaves the card unchanged.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::BoardApi;
use crate::directory::{log_provider_error, BoardDirectory};
use crate::error::BoardApiError;
use crate::models::Card;

/// Result of a single mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The write was issued and accepted.
    Performed,
    /// The card already had the desired state; nothing was written.
    AlreadySatisfied,
    /// The provider refused the write (non-success status).
    Rejected,
    /// A read or write never completed (transport or decode failure, or the
    /// idempotency check could not be made).
    Failed,
    /// Nothing to do, e.g. the destination list does not exist.
    Skipped,
}

impl Outcome {
    /// Whether the card ended up in the desired state.
    #[must_use]
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Performed | Self::AlreadySatisfied)
    }

    /// Whether the provider refused the write or it never completed.
    #[must_use]
    pub fn failed(self) -> bool {
        matches!(self, Self::Rejected | Self::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Performed => "performed",
            Self::AlreadySatisfied => "already_satisfied",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    fn from_write(result: Result<(), BoardApiError>, what: &str) -> Self {
        match result {
            Ok(()) => Self::Performed,
            Err(e) => {
                log_provider_error(what, &e);
                if matches!(e, BoardApiError::Status { .. }) {
                    Self::Rejected
                } else {
                    Self::Failed
                }
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical comment text for an activity.
#[must_use]
pub fn compose_comment(author: &str, message: &str, link: &str) -> String {
    format!("{author}: {message} {link}")
}

/// Performs attachment, comment and list-move operations on cards.
#[derive(Clone)]
pub struct CardMutator {
    api: Arc<dyn BoardApi>,
    directory: BoardDirectory,
}

impl CardMutator {
    #[must_use]
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        let directory = BoardDirectory::new(Arc::clone(&api));
        Self { api, directory }
    }

    /// Attach `link` unless an attachment with the same URL exists.
    pub async fn add_attachment(&self, card: &Card, link: &str) -> Outcome {
        let attachments = match self.api.get_attachments(&card.id).await {
            Ok(attachments) => attachments,
            Err(e) => {
                log_provider_error("Failed to list attachments", &e);
                return Outcome::Failed;
            }
        };

        if attachments.iter().any(|a| a.url == link) {
            debug!(card_id = %card.id, url = %link, "Attachment already present");
            return Outcome::AlreadySatisfied;
        }

        let outcome = Outcome::from_write(
            self.api.create_attachment(&card.id, link).await,
            "Failed to create attachment",
        );
        if outcome == Outcome::Performed {
            info!(card_id = %card.id, url = %link, "Attached link to card");
        }
        outcome
    }

    /// Post `"{author}: {message} {link}"` unless the exact text exists.
    pub async fn add_comment(
        &self,
        card: &Card,
        author: &str,
        message: &str,
        link: &str,
    ) -> Outcome {
        let text = compose_comment(author, message, link);

        let comments = match self.api.get_comments(&card.id).await {
            Ok(comments) => comments,
            Err(e) => {
                log_provider_error("Failed to list comments", &e);
                return Outcome::Failed;
            }
        };

        if comments.iter().any(|c| c.text() == text) {
            debug!(card_id = %card.id, "Comment already present");
            return Outcome::AlreadySatisfied;
        }

        let outcome = Outcome::from_write(
            self.api.create_comment(&card.id, &text).await,
            "Failed to create comment",
        );
        if outcome == Outcome::Performed {
            info!(card_id = %card.id, "Commented on card");
        }
        outcome
    }

    /// Move the card into the open list named `list_name`.
    ///
    /// Returns [`Outcome::Skipped`] without writing when no such list exists.
    pub async fn move_card(&self, board_id: &str, card: &Card, list_name: &str) -> Outcome {
        let Some(list_id) = self.directory.resolve_list(board_id, list_name).await else {
            return Outcome::Skipped;
        };

        if card.id_list.as_deref() == Some(list_id.as_str()) {
            debug!(card_id = %card.id, list = %list_name, "Card already in list");
            return Outcome::AlreadySatisfied;
        }

        let outcome = Outcome::from_write(
            self.api.move_card(&card.id, &list_id).await,
            "Failed to move card",
        );
        if outcome == Outcome::Performed {
            info!(card_id = %card.id, list = %list_name, "Moved card");
        }
        outcome
    }
}
