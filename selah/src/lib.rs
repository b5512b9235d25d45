//! # Selah
//!
//! Structured verse meditations from a single LLM completion. A caller
//! submits a free-form Korean Bible verse reference; Selah normalizes it,
//! probes a static 개역개정 verse table, asks the model for one
//! structured-output completion, validates it against a strict contract,
//! and returns a uniform envelope — with a fixed deterministic fallback
//! when no credential is configured or the provider is rate limited.
//!
//! ## Main modules
//!
//! - [`reference`]: multi-dialect reference normalization
//!   ([`normalize`], [`ParsedReference`]).
//! - [`books`]: book abbreviation table and verse-table key construction
//!   ([`abbreviate`], [`lookup_key`]).
//! - [`bible`]: embedded read-only verse-text table ([`verse_text`]).
//! - [`schema`]: wire types and the two-phase validator
//!   ([`MeditationResult`], [`validate_request`], [`validate_completion`]).
//! - [`llm`]: model seam — [`MeditationModel`] trait, [`OpenAiModel`],
//!   [`MockModel`].
//! - [`handler`]: the per-request state machine ([`handle_meditation`],
//!   [`Envelope`]).
//! - [`prompts`], [`fallback`], [`history`]: fixed prompt templates, the
//!   deterministic fallback payload, bounded-history rules.
//!
//! Key types are re-exported at the crate root:
//! `use selah::{handle_meditation, Envelope, MeditationModel, OpenAiModel};`

pub mod bible;
pub mod books;
pub mod fallback;
pub mod handler;
pub mod history;
pub mod llm;
pub mod prompts;
pub mod reference;
pub mod schema;

pub use bible::verse_text;
pub use books::{abbreviate, lookup_key};
pub use fallback::{fallback_result, VERSE_TEXT_UNAVAILABLE};
pub use handler::{handle_meditation, Envelope, FailureEnvelope, SuccessEnvelope};
pub use history::{push_entry, HistoryEntry, MAX_HISTORY};
pub use llm::{MeditationModel, MockModel, ModelError, OpenAiModel};
pub use reference::{format_reference, normalize, parse_reference, ParsedReference};
pub use schema::{
    validate_completion, validate_request, Keyword, MeditationResult, RelatedVerse,
    ValidationError,
};
