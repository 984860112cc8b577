//! Obituary records and the two stages that produce them: symbol
//! extraction and narrative composition.

pub mod compose;
pub mod extract;

use chrono::NaiveDate;

pub use compose::{compose, ComposeInput, ComposeMode, Composition};
pub use extract::{extract, Extraction};

/// Cause recorded when the mourner gives none.
pub const DEFAULT_CAUSE: &str = "Deleted (cause unknown)";

/// One entry in the graveyard log.
///
/// Created once by the mourning pipeline and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObituaryRecord {
    /// Repository-relative path at the time of deletion.
    pub path: String,
    /// Date of the file's first commit, when history knows it.
    pub born: Option<NaiveDate>,
    /// Date of the deletion commit, or the mourning date if uncommitted.
    pub died: Option<NaiveDate>,
    /// Human-supplied reason for the deletion.
    pub cause: String,
    /// First meaningful line of the file's final content.
    pub last_words: String,
    /// The composed obituary body.
    pub narrative: String,
    /// Files that appear to replace this one. Advisory only.
    pub survivors: Vec<String>,
}

impl ObituaryRecord {
    /// Days between birth and death, when both are known.
    #[must_use]
    pub fn lifespan_days(&self) -> Option<i64> {
        compose::lifespan_days(self.born, self.died)
    }
}
