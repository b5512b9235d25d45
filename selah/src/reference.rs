//! Verse reference normalization: free-form Korean scripture references in,
//! one canonical string out.
//!
//! Real input mixes three conventions for the same verse — the bare colon
//! form ("마가복음 10:27"), the 장/절 unit-word form ("마가복음 1장 1절"),
//! and the Psalms 편 form ("시편 23편 1절"). All three are rewritten to the
//! colon form before matching, so one pattern covers every dialect and the
//! canonical output is identical regardless of which the user typed.
//!
//! **Interaction**: `crate::schema` calls [`normalize`] for both the inbound
//! request and the completion's echoed reference; `crate::books` builds the
//! lookup key from the canonical form.

use once_cell::sync::Lazy;
use regex::Regex;

/// A parsed verse reference. Transient: built from raw text, immediately
/// formatted back to the canonical string or discarded.
///
/// Invariant: `book` is non-empty with single-space runs; when both verse
/// bounds are present, `end_verse >= start_verse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub book: String,
    pub chapter: u32,
    pub start_verse: Option<u32>,
    pub end_verse: Option<u32>,
}

/// Quotation and bracket glyphs stripped before any other rewrite.
static QUOTE_GLYPHS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["“”'’‛‹›«»「」『』]"#).expect("quote glyph pattern"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// `N장 M` / `N편 M` → `N:M`. The 편 branch keeps the Psalms dialect from
/// being swallowed into the book capture ("시편 23편 1" must not parse as
/// book "시편 23편").
static UNIT_CHAPTER_VERSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[장편]\s*(\d+)").expect("chapter-verse unit pattern"));

/// Trailing `N장` / `N편` with no verse → bare chapter number.
static UNIT_CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[장편]").expect("chapter unit pattern"));

/// `N절` → bare verse number.
static UNIT_VERSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*절").expect("verse unit pattern"));

static HYPHEN_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*").expect("hyphen spacing pattern"));

/// Book name (Hangul/Latin/digits/spaces, non-greedy), chapter, optional
/// `:verse`, optional `-endVerse`.
static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([가-힣A-Za-z0-9\s]+?)\s*(\d{1,3})(?::(\d{1,3})(?:-(\d{1,3}))?)?$")
        .expect("reference pattern")
});

/// Collapses unit words and spacing so every supported dialect lands on the
/// `book chapter[:verse[-end]]` shape the match pattern expects.
fn rewrite_units(sanitized: &str) -> String {
    let s = WHITESPACE_RUN.replace_all(sanitized, " ");
    let s = UNIT_CHAPTER_VERSE.replace_all(&s, "$1:$2");
    let s = UNIT_CHAPTER.replace_all(&s, "$1");
    let s = UNIT_VERSE.replace_all(&s, "$1");
    let s = s.replace('~', "-");
    HYPHEN_SPACING.replace_all(&s, "-").trim().to_string()
}

/// Parses a free-form reference into a [`ParsedReference`].
///
/// Returns `None` when the text is empty after stripping, the pattern does
/// not match, the book capture is empty, a numeric capture fails to parse,
/// or the end verse is strictly below the start verse. When only a start
/// verse is given, `end_verse` defaults to it.
pub fn parse_reference(raw: &str) -> Option<ParsedReference> {
    let sanitized = QUOTE_GLYPHS.replace_all(raw, "");
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return None;
    }

    let compacted = rewrite_units(sanitized);
    let captures = REFERENCE_PATTERN.captures(&compacted)?;

    let book = WHITESPACE_RUN
        .replace_all(captures.get(1)?.as_str(), " ")
        .trim()
        .to_string();
    if book.is_empty() {
        return None;
    }

    let chapter: u32 = captures.get(2)?.as_str().parse().ok()?;
    let start_verse: Option<u32> = match captures.get(3) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    let end_verse: Option<u32> = match captures.get(4) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    if let (Some(start), Some(end)) = (start_verse, end_verse) {
        if end < start {
            return None;
        }
    }

    Some(ParsedReference {
        book,
        chapter,
        start_verse,
        end_verse: end_verse.or(start_verse),
    })
}

/// Formats a [`ParsedReference`] to the canonical display string: chapter
/// only, `book ch:v` for a single verse, `book ch:s-e` for a true range.
pub fn format_reference(parsed: &ParsedReference) -> String {
    let ParsedReference {
        book,
        chapter,
        start_verse,
        end_verse,
    } = parsed;
    match start_verse {
        None => format!("{} {}", book, chapter),
        Some(start) => match end_verse {
            Some(end) if end != start => format!("{} {}:{}-{}", book, chapter, start, end),
            _ => format!("{} {}:{}", book, chapter, start),
        },
    }
}

/// Normalizes a free-form reference to its canonical form, or `None` when
/// no supported convention matches. Idempotent on canonical input.
pub fn normalize(raw: &str) -> Option<String> {
    parse_reference(raw).map(|parsed| format_reference(&parsed))
}
