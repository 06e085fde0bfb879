//! Configuration for the board sync service.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Default Trello REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.trello.com/1";

/// Default marker preceding a card number in free text.
pub const DEFAULT_CARD_ID_PATTERN: &str = "#";

/// The single mutating action applied to every resolved card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    /// Attach the commit/PR/issue link to the card.
    #[default]
    Attachment,
    /// Post `"{author}: {message} {link}"` as a card comment.
    Comment,
}

impl ActionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "attachment" => Ok(Self::Attachment),
            "comment" => Ok(Self::Comment),
            // Accepted by older configurations but never had a handler.
            "moveCardToBoard" => Err(ConfigError::UnsupportedAction(s.to_string())),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }
}

/// Destination lists per lifecycle stage. Unset disables that transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTargets {
    /// List for cards referenced by a regular commit.
    pub commit_in_progress: Option<String>,
    /// List for cards referenced by an open PR or issue.
    pub pr_open: Option<String>,
    /// List for cards referenced by a closed PR/issue or a merge commit.
    pub pr_closed: Option<String>,
}

/// Board sync configuration.
#[derive(Clone)]
pub struct Config {
    /// Trello API key.
    pub api_key: String,
    /// Trello API token.
    pub api_token: String,
    /// Board the cards live on.
    pub board_id: String,
    /// Base URL of the Trello REST API.
    pub api_url: String,
    /// Literal marker preceding card numbers.
    pub card_id_pattern: String,
    /// Action applied to each resolved card.
    pub action: ActionKind,
    /// Lifecycle destination lists.
    pub lists: ListTargets,
    /// Enables debug-level logging.
    pub verbose: bool,
    /// Most recent commits to consider from a push payload (0 = all).
    pub max_commits: usize,
    /// Per-request timeout for provider calls.
    pub request_timeout_secs: u64,
}

impl Config {
    /// Create a configuration with required values and defaults elsewhere.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_token: impl Into<String>,
        board_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_token: api_token.into(),
            board_id: board_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            card_id_pattern: DEFAULT_CARD_ID_PATTERN.to_string(),
            action: ActionKind::default(),
            lists: ListTargets::default(),
            verbose: false,
            max_commits: 1,
            request_timeout_secs: 30,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(
            required("TRELLO_API_KEY")?,
            required("TRELLO_API_TOKEN")?,
            required("TRELLO_BOARD_ID")?,
        );

        if let Some(url) = optional("TRELLO_API_URL") {
            config.api_url = url;
        }
        if let Some(pattern) = optional("TRELLO_CARD_ID_PATTERN") {
            config.card_id_pattern = pattern;
        }
        if let Some(action) = optional("TRELLO_ACTION") {
            config.action = action.parse()?;
        }

        config.lists = ListTargets {
            commit_in_progress: optional("TRELLO_LIST_NAME_COMMIT"),
            pr_open: optional("TRELLO_LIST_NAME_PR_OPEN"),
            pr_closed: optional("TRELLO_LIST_NAME_PR_CLOSED"),
        };

        config.verbose = optional("TRELLO_SYNC_VERBOSE").is_some_and(|v| parse_flag(&v));

        if let Some(value) = optional("TRELLO_SYNC_MAX_COMMITS") {
            config.max_commits = parse_number("TRELLO_SYNC_MAX_COMMITS", &value)?;
        }
        if let Some(value) = optional("TRELLO_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_number("TRELLO_REQUEST_TIMEOUT_SECS", &value)?;
        }

        Ok(config)
    }

    /// API URL without a trailing slash.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_token", &"<redacted>")
            .field("board_id", &self.board_id)
            .field("api_url", &self.api_url)
            .field("card_id_pattern", &self.card_id_pattern)
            .field("action", &self.action)
            .field("lists", &self.lists)
            .field("verbose", &self.verbose)
            .field("max_commits", &self.max_commits)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Parse a boolean-ish flag (`true`/`1`/`yes`).
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        })
}
