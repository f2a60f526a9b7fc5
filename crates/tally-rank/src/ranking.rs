use serde_json::Value;
use tracing::warn;

use tally_types::ScoreRecord;

/// Number of entries a leaderboard shows unless told otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Anything that can be placed on a leaderboard.
pub trait Ranked {
    /// The score to rank by, or `None` if the entry has no numeric score.
    fn rank_score(&self) -> Option<i128>;
}

impl Ranked for ScoreRecord {
    fn rank_score(&self) -> Option<i128> {
        Some(i128::from(self.score))
    }
}

/// Raw document entries, e.g. from a hand-edited store file.
///
/// Any JSON number ranks: negative integers as themselves, fractions
/// truncated toward zero.
impl Ranked for Value {
    fn rank_score(&self) -> Option<i128> {
        let score = self.get("score")?;
        if let Some(n) = score.as_i64() {
            Some(i128::from(n))
        } else if let Some(n) = score.as_u64() {
            Some(i128::from(n))
        } else {
            score.as_f64().map(|n| n.trunc() as i128)
        }
    }
}

impl<T: Ranked + ?Sized> Ranked for &T {
    fn rank_score(&self) -> Option<i128> {
        (**self).rank_score()
    }
}

/// At most `n` entries, highest score first.
///
/// Equal scores keep their relative input order. If any entry lacks a usable
/// score, nothing is ranked: the first `n` entries are returned as stored.
pub fn top_n<T: Ranked + Clone>(records: &[T], n: usize) -> Vec<T> {
    let keyed: Option<Vec<(i128, &T)>> = records
        .iter()
        .map(|record| record.rank_score().map(|score| (score, record)))
        .collect();

    match keyed {
        Some(mut keyed) => {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
            keyed
                .into_iter()
                .take(n)
                .map(|(_, record)| record.clone())
                .collect()
        }
        None => {
            warn!(
                entries = records.len(),
                "entry without a numeric score, returning unranked"
            );
            records.iter().take(n).cloned().collect()
        }
    }
}

/// [`top_n`] with [`DEFAULT_TOP_N`].
pub fn top_default<T: Ranked + Clone>(records: &[T]) -> Vec<T> {
    top_n(records, DEFAULT_TOP_N)
}
