use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One leaderboard entry.
///
/// Records carry no identifier or timestamp. They are immutable once
/// written and are only ever appended to the store, never updated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
}

impl ScoreRecord {
    /// Build a record from an already-validated name and score.
    pub fn new(name: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.score)
    }
}

/// A score submission exactly as a client sent it.
///
/// The score is signed so that a negative value reaches validation and is
/// reported as such, rather than failing deserialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub score: i64,
}

impl Submission {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Trim the name and check both fields, producing a storable record.
    pub fn validate(&self) -> Result<ScoreRecord, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let score =
            u64::try_from(self.score).map_err(|_| ValidationError::NegativeScore(self.score))?;
        Ok(ScoreRecord::new(name, score))
    }
}
