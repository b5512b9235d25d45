//! Static verse-text lookup table (개역개정 excerpts), embedded at compile
//! time and parsed once at first use. Read-only for the process lifetime.
//!
//! Keys are [`crate::books::lookup_key`] abbreviation keys ("시23:1").
//! A miss is not an error; the handler falls back to the provider's text or
//! a placeholder.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static VERSE_TABLE: Lazy<HashMap<String, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/bible.json")).expect("embedded bible.json parses")
});

/// Returns the known verse text for an abbreviation key, trimmed.
pub fn verse_text(key: &str) -> Option<&'static str> {
    VERSE_TABLE.get(key).map(|text| text.trim())
}
