//! Card reference extraction from commit messages, titles and branch names.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConfigError, SyncError};

/// Auto-generated merge commit preamble. The PR number in it is not a card.
static MERGE_PREAMBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Merge pull request #\d+ from").expect("merge preamble regex is valid")
});

/// Extracts card numbers using a configurable marker.
#[derive(Debug, Clone)]
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    /// Build an extractor for `marker`, a literal prefix such as `#`.
    ///
    /// The marker is matched verbatim: regex metacharacters in it carry no
    /// special meaning.
    pub fn new(marker: &str) -> Result<Self, ConfigError> {
        if marker.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }

        let escaped = regex::escape(marker);
        let pattern = Regex::new(&format!(r"{escaped}(?P<number>\d+)")).map_err(|source| {
            ConfigError::InvalidPattern {
                pattern: marker.to_string(),
                source,
            }
        })?;
        Ok(Self { pattern })
    }

    /// Card numbers referenced in `text`, marker stripped.
    ///
    /// Merge preambles are removed before matching. Missing or empty text
    /// yields an empty set.
    #[must_use]
    pub fn extract_references(&self, text: Option<&str>) -> BTreeSet<String> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return BTreeSet::new();
        };

        let cleaned = MERGE_PREAMBLE.replace_all(text, "");
        self.pattern
            .captures_iter(&cleaned)
            .filter_map(|caps| caps.name("number"))
            .map(|m| m.as_str().to_string())
            .filter(|number| !number.is_empty())
            .collect()
    }

    /// Union of the references in `title` and `branch`.
    ///
    /// Fails when the title yields nothing, or when a branch is given and
    /// yields nothing: a card must be named on every side that is present.
    pub fn extract_all_references(
        &self,
        title: &str,
        branch: Option<&str>,
    ) -> Result<BTreeSet<String>, SyncError> {
        let mut references = self.extract_references(Some(title));
        let branch_references = branch.map(|b| self.extract_references(Some(b)));

        let branch_empty = branch_references.as_ref().is_some_and(BTreeSet::is_empty);
        if references.is_empty() || branch_empty {
            return Err(SyncError::InvalidReference {
                title: title.to_string(),
                branch: branch.map(str::to_string),
            });
        }

        references.extend(branch_references.unwrap_or_default());
        Ok(references)
    }

    /// Whether `message` carries an auto-generated merge preamble.
    #[must_use]
    pub fn is_merge_commit(message: &str) -> bool {
        MERGE_PREAMBLE.is_match(message)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(r"#(?P<number>\d+)").expect("default card pattern is valid"),
        }
    }
}
