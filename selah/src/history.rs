//! Bounded meditation history rules: dedup by reference, most-recent-first,
//! capped at [`MAX_HISTORY`]. Pure data logic; the caller owns storage and
//! supplies timestamps.

use serde::{Deserialize, Serialize};

use crate::schema::MeditationResult;

/// Maximum entries a client keeps.
pub const MAX_HISTORY: usize = 3;

/// One past result: the canonical reference, the response body, and the
/// caller-supplied timestamp in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub verse_input: String,
    pub response: MeditationResult,
    pub timestamp: i64,
}

/// Inserts an entry at the front, dropping any older entry for the same
/// reference and truncating to [`MAX_HISTORY`].
pub fn push_entry(history: Vec<HistoryEntry>, entry: HistoryEntry) -> Vec<HistoryEntry> {
    let mut next: Vec<HistoryEntry> = Vec::with_capacity(MAX_HISTORY + 1);
    next.push(entry);
    let key = next[0].verse_input.clone();
    next.extend(
        history
            .into_iter()
            .filter(|item| item.verse_input != key),
    );
    next.truncate(MAX_HISTORY);
    next
}
