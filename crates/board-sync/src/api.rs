//! Board provider abstraction.
//!
//! [`BoardApi`] is the transport seam between the sync engine and the
//! provider. [`TrelloClient`](crate::TrelloClient) implements it over HTTP;
//! tests substitute an in-memory board.

use async_trait::async_trait;

use crate::error::BoardApiError;
use crate::models::{Attachment, BoardList, Card, CommentAction};

/// Read and write operations against a kanban board provider.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetch a card by its board-scoped human number.
    async fn get_card(&self, board_id: &str, number: &str) -> Result<Card, BoardApiError>;

    /// Fetch every list on the board, archived ones included.
    async fn get_lists(&self, board_id: &str) -> Result<Vec<BoardList>, BoardApiError>;

    /// Fetch attachments of a card.
    async fn get_attachments(&self, card_id: &str) -> Result<Vec<Attachment>, BoardApiError>;

    /// Fetch comment actions of a card.
    async fn get_comments(&self, card_id: &str) -> Result<Vec<CommentAction>, BoardApiError>;

    /// Attach `url` to a card.
    async fn create_attachment(&self, card_id: &str, url: &str) -> Result<(), BoardApiError>;

    /// Post a comment on a card.
    async fn create_comment(&self, card_id: &str, text: &str) -> Result<(), BoardApiError>;

    /// Move a card into another list.
    async fn move_card(&self, card_id: &str, list_id: &str) -> Result<(), BoardApiError>;
}
