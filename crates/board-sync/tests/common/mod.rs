//! In-memory board used by the sync tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use board_sync::{
    Attachment, BoardApi, BoardApiError, BoardList, Card, CommentAction, CommentData,
};
use reqwest::StatusCode;

pub const BOARD: &str = "board-1";

/// Stateful fake board: cards keyed by number, lists in insertion order.
#[derive(Default)]
pub struct MemoryBoard {
    cards: Mutex<HashMap<String, Card>>,
    lists: Mutex<Vec<BoardList>>,
    attachments: Mutex<HashMap<String, Vec<Attachment>>>,
    comments: Mutex<HashMap<String, Vec<CommentAction>>>,
    /// Number of write calls issued.
    pub writes: AtomicUsize,
    /// Number of card lookups issued.
    pub card_lookups: AtomicUsize,
    /// Card IDs whose writes are refused with 403.
    reject_writes_for: Mutex<Vec<String>>,
    /// Fail attachment/comment reads as if the connection dropped.
    pub fail_reads: std::sync::atomic::AtomicBool,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card `number` with ID `card-{number}` in list `list_id`.
    pub fn with_card(self, number: &str, list_id: &str) -> Self {
        let card = Card {
            id: format!("card-{number}"),
            id_short: number.parse().ok(),
            name: Some(format!("Card {number}")),
            id_list: Some(list_id.to_string()),
        };
        self.cards.lock().unwrap().insert(number.to_string(), card);
        self
    }

    pub fn with_list(self, id: &str, name: &str, closed: bool) -> Self {
        self.lists.lock().unwrap().push(BoardList {
            id: id.to_string(),
            name: name.to_string(),
            closed,
        });
        self
    }

    /// Seed an existing attachment without counting a write.
    pub fn with_attachment(self, card_id: &str, url: &str) -> Self {
        self.attachments
            .lock()
            .unwrap()
            .entry(card_id.to_string())
            .or_default()
            .push(Attachment {
                id: None,
                url: url.to_string(),
                name: None,
            });
        self
    }

    pub fn rejecting_writes_for(self, card_id: &str) -> Self {
        self.reject_writes_for
            .lock()
            .unwrap()
            .push(card_id.to_string());
        self
    }

    pub fn card(&self, number: &str) -> Card {
        self.cards.lock().unwrap()[number].clone()
    }

    pub fn attachments(&self, card_id: &str) -> Vec<Attachment> {
        self.attachments
            .lock()
            .unwrap()
            .get(card_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn comments(&self, card_id: &str) -> Vec<String> {
        self.comments
            .lock()
            .unwrap()
            .get(card_id)
            .map(|c| c.iter().map(|a| a.data.text.clone()).collect())
            .unwrap_or_default()
    }

    pub fn list_of(&self, number: &str) -> Option<String> {
        self.card(number).id_list
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_write(&self, card_id: &str) -> Result<(), BoardApiError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes_for.lock().unwrap().iter().any(|c| c == card_id) {
            return Err(BoardApiError::Status {
                url: format!("memory://cards/{card_id}"),
                status: StatusCode::FORBIDDEN,
                body: "unauthorized card permission requested".to_string(),
            });
        }
        Ok(())
    }

    fn check_read(&self, card_id: &str) -> Result<(), BoardApiError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BoardApiError::Decode {
                url: format!("memory://cards/{card_id}"),
                message: "connection closed".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(url: String) -> BoardApiError {
    BoardApiError::Status {
        url,
        status: StatusCode::NOT_FOUND,
        body: "The requested resource was not found.".to_string(),
    }
}

#[async_trait]
impl BoardApi for MemoryBoard {
    async fn get_card(&self, board_id: &str, number: &str) -> Result<Card, BoardApiError> {
        self.card_lookups.fetch_add(1, Ordering::SeqCst);
        if board_id != BOARD {
            return Err(not_found(format!("memory://boards/{board_id}")));
        }
        self.cards
            .lock()
            .unwrap()
            .get(number)
            .cloned()
            .ok_or_else(|| not_found(format!("memory://boards/{board_id}/cards/{number}")))
    }

    async fn get_lists(&self, board_id: &str) -> Result<Vec<BoardList>, BoardApiError> {
        if board_id != BOARD {
            return Err(not_found(format!("memory://boards/{board_id}/lists")));
        }
        Ok(self.lists.lock().unwrap().clone())
    }

    async fn get_attachments(&self, card_id: &str) -> Result<Vec<Attachment>, BoardApiError> {
        self.check_read(card_id)?;
        Ok(self.attachments(card_id))
    }

    async fn get_comments(&self, card_id: &str) -> Result<Vec<CommentAction>, BoardApiError> {
        self.check_read(card_id)?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(card_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_attachment(&self, card_id: &str, url: &str) -> Result<(), BoardApiError> {
        self.check_write(card_id)?;
        self.attachments
            .lock()
            .unwrap()
            .entry(card_id.to_string())
            .or_default()
            .push(Attachment {
                id: None,
                url: url.to_string(),
                name: None,
            });
        Ok(())
    }

    async fn create_comment(&self, card_id: &str, text: &str) -> Result<(), BoardApiError> {
        self.check_write(card_id)?;
        self.comments
            .lock()
            .unwrap()
            .entry(card_id.to_string())
            .or_default()
            .push(CommentAction {
                id: None,
                data: CommentData {
                    text: text.to_string(),
                },
            });
        Ok(())
    }

    async fn move_card(&self, card_id: &str, list_id: &str) -> Result<(), BoardApiError> {
        self.check_write(card_id)?;
        let mut cards = self.cards.lock().unwrap();
        let card = cards
            .values_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| not_found(format!("memory://cards/{card_id}")))?;
        card.id_list = Some(list_id.to_string());
        Ok(())
    }
}
