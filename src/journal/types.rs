//! Journal record definitions.
//!
//! Defines [`JournalRecord`] (one stored entry), [`Sentiment`] (the label and
//! score attached at write time), and [`Intent`] (the heuristic category).

use serde::{Deserialize, Serialize};

/// Label emitted by the sentiment model for upbeat text.
pub const POSITIVE: &str = "POSITIVE";
/// Label emitted by the sentiment model for downbeat text.
pub const NEGATIVE: &str = "NEGATIVE";

/// Sentiment attached to an entry when it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Model label, nominally `POSITIVE` or `NEGATIVE`. Other values pass through.
    pub label: String,
    /// Probability of `label` in `[0.0, 1.0]`.
    pub score: f64,
    /// `true` if the text hedges between feelings ("but", "however", ...).
    #[serde(default)]
    pub mixed: bool,
}

/// One journal entry as stored and served. The embedding lives in the vector
/// table and is never part of the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: String,
    /// Entry kind. Always `"text"` for entries written by this crate.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub content: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub reflection: Option<String>,
    /// ISO 8601 creation time. Kept verbatim; may be malformed for imported entries.
    pub timestamp: String,
}

fn default_kind() -> String {
    "text".into()
}

/// What the writer seems to be doing with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Venting,
    Reaction,
    Affirmation,
    Reflection,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Venting => "venting",
            Self::Reaction => "reaction",
            Self::Affirmation => "affirmation",
            Self::Reflection => "reflection",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
