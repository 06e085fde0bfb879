//! Event routing and per-card synchronization.
//!
//! One [`CardSync::run`] call handles one CI event to completion. Cards,
//! commits and the steps for a single card are processed strictly in
//! order; nothing is cached between calls.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::api::BoardApi;
use crate::config::{ActionKind, Config, ListTargets};
use crate::directory::BoardDirectory;
use crate::error::SyncError;
use crate::event::{Commit, EventPayload, ItemState, SyncEvent};
use crate::extract::Extractor;
use crate::mutation::{CardMutator, Outcome};

/// Which event shape was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Commits,
    PullRequest,
    Issue,
    None,
}

/// What happened to one referenced card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    /// Human card number from the text
    pub number: String,
    /// Provider card ID, `None` when the card could not be resolved
    pub card_id: Option<String>,
    /// Outcome of the configured action
    pub action: Option<Outcome>,
    /// Outcome of the list transition, `None` when no transition applied
    pub moved: Option<Outcome>,
}

impl CardReport {
    fn unresolved(number: &str) -> Self {
        Self {
            number: number.to_string(),
            card_id: None,
            action: None,
            moved: None,
        }
    }
}

/// Summary of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub kind: EventKind,
    pub cards: Vec<CardReport>,
}

impl SyncReport {
    /// Cards that were found on the board.
    pub fn resolved(&self) -> impl Iterator<Item = &CardReport> {
        self.cards.iter().filter(|c| c.card_id.is_some())
    }

    /// Resolved cards whose action or list transition failed.
    pub fn failures(&self) -> impl Iterator<Item = &CardReport> {
        self.resolved().filter(|c| {
            c.action.is_some_and(Outcome::failed) || c.moved.is_some_and(Outcome::failed)
        })
    }
}

/// Activity to document on each card of an event.
struct Activity<'a> {
    author: &'a str,
    message: &'a str,
    link: &'a str,
    destination: Option<&'a str>,
}

/// Synchronizes CI events onto board cards.
pub struct CardSync {
    board_id: String,
    action: ActionKind,
    lists: ListTargets,
    extractor: Extractor,
    directory: BoardDirectory,
    mutator: CardMutator,
}

impl CardSync {
    /// Build the engine over a board API.
    ///
    /// # Errors
    /// Returns error if the card id pattern is empty
    pub fn new(api: Arc<dyn BoardApi>, config: &Config) -> Result<Self, SyncError> {
        Ok(Self {
            board_id: config.board_id.clone(),
            action: config.action,
            lists: config.lists.clone(),
            extractor: Extractor::new(&config.card_id_pattern)?,
            directory: BoardDirectory::new(Arc::clone(&api)),
            mutator: CardMutator::new(api),
        })
    }

    /// Process one event payload.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidReference`] when a pull request or issue
    /// title (or the PR branch) names no card.
    pub async fn run(&self, payload: &EventPayload) -> Result<SyncReport, SyncError> {
        match payload.select() {
            SyncEvent::Commits(commits) => Ok(SyncReport {
                kind: EventKind::Commits,
                cards: self.handle_commits(commits).await,
            }),
            SyncEvent::PullRequest(pr) => {
                let title = pr.title.as_deref().unwrap_or_default();
                let numbers = self.extractor.extract_all_references(title, pr.branch())?;
                info!(title = %title, cards = numbers.len(), "Handling pull request");

                let activity = Activity {
                    author: pr.user.display_name(),
                    message: title,
                    link: pr.link(),
                    destination: self.state_destination(pr.state),
                };
                Ok(SyncReport {
                    kind: EventKind::PullRequest,
                    cards: self.handle_numbers(&numbers, &activity).await,
                })
            }
            SyncEvent::Issue(issue) => {
                let title = issue.title.as_deref().unwrap_or_default();
                let numbers = self.extractor.extract_all_references(title, None)?;
                info!(title = %title, cards = numbers.len(), "Handling issue");

                let activity = Activity {
                    author: issue.user.display_name(),
                    message: title,
                    link: issue.link(),
                    destination: self.state_destination(issue.state),
                };
                Ok(SyncReport {
                    kind: EventKind::Issue,
                    cards: self.handle_numbers(&numbers, &activity).await,
                })
            }
            SyncEvent::None => {
                info!("No commits, pull request or issue in event; nothing to do");
                Ok(SyncReport {
                    kind: EventKind::None,
                    cards: Vec::new(),
                })
            }
        }
    }

    async fn handle_commits(&self, commits: &[Commit]) -> Vec<CardReport> {
        info!(commits = commits.len(), "Handling commits");
        let mut reports = Vec::new();

        for commit in commits {
            let numbers = self.extractor.extract_references(Some(commit.message.as_str()));
            if numbers.is_empty() {
                debug!(url = %commit.url, "Commit references no cards");
                continue;
            }

            let activity = Activity {
                author: &commit.author.name,
                message: &commit.message,
                link: &commit.url,
                destination: self.commit_destination(&commit.message),
            };
            reports.extend(self.handle_numbers(&numbers, &activity).await);
        }

        reports
    }

    /// Lists: merge commits go to the closed list when configured, other
    /// commits to the in-progress list.
    fn commit_destination(&self, message: &str) -> Option<&str> {
        if Extractor::is_merge_commit(message) {
            if let Some(closed) = self.lists.pr_closed.as_deref() {
                return Some(closed);
            }
        }
        self.lists.commit_in_progress.as_deref()
    }

    fn state_destination(&self, state: ItemState) -> Option<&str> {
        match state {
            ItemState::Open => self.lists.pr_open.as_deref(),
            ItemState::Closed => self.lists.pr_closed.as_deref(),
            ItemState::Other => None,
        }
    }

    async fn handle_numbers(
        &self,
        numbers: &BTreeSet<String>,
        activity: &Activity<'_>,
    ) -> Vec<CardReport> {
        let mut reports = Vec::with_capacity(numbers.len());
        for number in numbers {
            reports.push(self.handle_card(number, activity).await);
        }
        reports
    }

    #[instrument(skip(self, activity), fields(board_id = %self.board_id))]
    async fn handle_card(&self, number: &str, activity: &Activity<'_>) -> CardReport {
        let Some(card) = self.directory.resolve_card(&self.board_id, number).await else {
            debug!("Card not found; skipping");
            return CardReport::unresolved(number);
        };

        let action = match self.action {
            ActionKind::Attachment => self.mutator.add_attachment(&card, activity.link).await,
            ActionKind::Comment => {
                self.mutator
                    .add_comment(&card, activity.author, activity.message, activity.link)
                    .await
            }
        };

        let moved = match activity.destination {
            Some(list) => Some(self.mutator.move_card(&self.board_id, &card, list).await),
            None => None,
        };

        info!(
            card_id = %card.id,
            action = %self.action,
            action_outcome = %action,
            moved = ?moved.map(Outcome::as_str),
            "Synchronized card"
        );

        CardReport {
            number: number.to_string(),
            card_id: Some(card.id),
            action: Some(action),
            moved,
        }
    }
}
