//! Trello entity types.

use serde::{Deserialize, Serialize};

/// A card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Provider-assigned card ID
    pub id: String,
    /// Board-scoped human number (e.g. 7 for `#7`)
    #[serde(default)]
    pub id_short: Option<u64>,
    /// Card title
    #[serde(default)]
    pub name: Option<String>,
    /// List the card currently sits in
    #[serde(default)]
    pub id_list: Option<String>,
}

/// A list (column) on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    /// List ID
    pub id: String,
    /// List name
    pub name: String,
    /// Whether the list is archived
    #[serde(default)]
    pub closed: bool,
}

/// An attachment on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID
    #[serde(default)]
    pub id: Option<String>,
    /// Attached URL
    pub url: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

/// A `commentCard` action on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAction {
    /// Action ID
    #[serde(default)]
    pub id: Option<String>,
    /// Comment payload
    pub data: CommentData,
}

/// Payload of a comment action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentData {
    /// Comment text
    #[serde(default)]
    pub text: String,
}

impl CommentAction {
    /// Comment text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.data.text
    }
}
