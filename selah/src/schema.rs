//! Meditation result wire types and the two-phase schema validator.
//!
//! Validation is parse-then-check returning a tagged `Result`, never a
//! panic: serde rejects type mismatches and unknown/missing fields, then
//! explicit checks enforce the array-length bounds and re-normalize the
//! embedded reference. Error messages stay attached to the failing field.
//!
//! **Interaction**: `crate::handler` runs [`validate_request`] on the
//! inbound body and [`validate_completion`] on the provider's raw JSON
//! before any result escapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::reference::normalize;

/// User-visible message when the request body is valid JSON but carries no
/// usable reference field.
pub const MSG_EMPTY_REFERENCE: &str = "성경 구절을 입력해 주세요.";

/// User-visible message naming the accepted reference formats.
pub const MSG_REFERENCE_FORMAT: &str =
    "구절은 예: 마가복음 10:27, 마가복음 1장 1절, 시편 23편 1절, 마태복음 5장 1절-4절 형식으로 입력해 주세요.";

/// One keyword gloss from the meditation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keyword {
    pub term: String,
    pub meaning: String,
}

/// One related verse with the reason it connects to the passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedVerse {
    pub reference: String,
    pub reason: String,
}

/// A complete meditation: the canonical reference, background, exactly 3
/// keyword glosses, 2–3 related verses, exactly 3 reflection prompts, a
/// prayer, and the verse text once the merge step has run.
///
/// Array bounds are enforced by [`validate_completion`]; a violating
/// payload is rejected whole, never truncated or padded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MeditationResult {
    pub verse_input: String,
    pub background: String,
    pub keywords: Vec<Keyword>,
    pub related_verses: Vec<RelatedVerse>,
    pub reflections: Vec<String>,
    pub prayer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_text: Option<String>,
}

/// Why a request or completion failed validation. Display strings are the
/// user-facing (request) or log-facing (completion) messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Request: the reference field is missing, not a string, or empty.
    #[error("{MSG_EMPTY_REFERENCE}")]
    EmptyReference,
    /// Request or completion: the reference matches no supported convention.
    #[error("{MSG_REFERENCE_FORMAT}")]
    UnsupportedReference,
    /// Completion JSON does not deserialize against the exact field set.
    #[error("completion shape: {0}")]
    Shape(String),
    /// Completion: an array-length bound was violated.
    #[error("{field}: expected {expected}, got {actual}")]
    Cardinality {
        field: &'static str,
        expected: &'static str,
        actual: usize,
    },
    /// Completion: the echoed reference normalizes to a different verse
    /// than the request's canonical reference.
    #[error("verseInput: completion echoed {echoed}, request was {expected}")]
    ReferenceMismatch { echoed: String, expected: String },
}

/// Validates the inbound request body: requires a non-empty `verseInput`
/// string whose reference normalizes. Extra request fields are tolerated.
/// Returns the canonical reference.
pub fn validate_request(body: &Value) -> Result<String, ValidationError> {
    let raw = body
        .get("verseInput")
        .and_then(Value::as_str)
        .ok_or(ValidationError::EmptyReference)?;
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyReference);
    }
    normalize(raw).ok_or(ValidationError::UnsupportedReference)
}

/// Validates the provider's raw completion JSON against the contract:
/// exact field set (no extras, no coercion), exact/ranged array lengths,
/// and an embedded reference that independently normalizes to the same
/// canonical form as the request. On success the echoed reference is
/// rewritten to its canonical form.
pub fn validate_completion(
    raw: &str,
    expected: &str,
) -> Result<MeditationResult, ValidationError> {
    let mut result: MeditationResult =
        serde_json::from_str(raw).map_err(|e| ValidationError::Shape(e.to_string()))?;

    if result.keywords.len() != 3 {
        return Err(ValidationError::Cardinality {
            field: "keywords",
            expected: "exactly 3",
            actual: result.keywords.len(),
        });
    }
    if !(2..=3).contains(&result.related_verses.len()) {
        return Err(ValidationError::Cardinality {
            field: "relatedVerses",
            expected: "2 to 3",
            actual: result.related_verses.len(),
        });
    }
    if result.reflections.len() != 3 {
        return Err(ValidationError::Cardinality {
            field: "reflections",
            expected: "exactly 3",
            actual: result.reflections.len(),
        });
    }

    let echoed = normalize(&result.verse_input).ok_or(ValidationError::UnsupportedReference)?;
    if echoed != expected {
        return Err(ValidationError::ReferenceMismatch {
            echoed,
            expected: expected.to_string(),
        });
    }
    result.verse_input = echoed;

    Ok(result)
}

/// The strict structured-output contract sent with every provider call.
/// `verseText` is deliberately absent: strict mode requires every listed
/// property, and the merge step owns the verse text.
pub fn completion_json_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["verseInput", "background", "keywords", "relatedVerses", "reflections", "prayer"],
        "properties": {
            "verseInput": {
                "type": "string",
                "description": "사용자가 입력한 성경 구절"
            },
            "background": {
                "type": "string",
                "description": "본문의 역사적/문화적 배경 설명"
            },
            "keywords": {
                "type": "array",
                "minItems": 3,
                "maxItems": 3,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["term", "meaning"],
                    "properties": {
                        "term": { "type": "string" },
                        "meaning": { "type": "string" }
                    }
                }
            },
            "relatedVerses": {
                "type": "array",
                "minItems": 2,
                "maxItems": 3,
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["reference", "reason"],
                    "properties": {
                        "reference": { "type": "string" },
                        "reason": { "type": "string" }
                    }
                }
            },
            "reflections": {
                "type": "array",
                "minItems": 3,
                "maxItems": 3,
                "items": { "type": "string" }
            },
            "prayer": {
                "type": "string"
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_completion(verse_input: &str) -> Value {
        json!({
            "verseInput": verse_input,
            "background": "당시 유대 사회에서 부는 하나님의 복으로 여겨졌습니다.",
            "keywords": [
                { "term": "하나님", "meaning": "모든 가능성의 근원." },
                { "term": "불가능", "meaning": "사람의 한계 영역." },
                { "term": "은혜", "meaning": "조건 없는 선물." }
            ],
            "relatedVerses": [
                { "reference": "창세기 18:14", "reason": "하나님께 불가능이 없음을 보입니다." },
                { "reference": "예레미야 32:17", "reason": "창조주의 전능하심을 고백합니다." }
            ],
            "reflections": [
                "포기해 버린 기도 제목이 있는가?",
                "구원의 확신을 어떻게 누리고 있는가?",
                "어떤 순종을 드릴 수 있을까?"
            ],
            "prayer": "주님, 믿음으로 순종하게 해 주세요."
        })
    }

    #[test]
    fn validate_request_normalizes_unit_words() {
        let body = json!({ "verseInput": "시편 23편 1절" });
        assert_eq!(validate_request(&body).unwrap(), "시편 23:1");
    }

    #[test]
    fn validate_request_tolerates_extra_fields() {
        let body = json!({ "verseInput": "막 10:27", "clientVersion": 2 });
        assert_eq!(validate_request(&body).unwrap(), "막 10:27");
    }

    #[test]
    fn validate_request_rejects_missing_and_empty() {
        assert_eq!(
            validate_request(&json!({})),
            Err(ValidationError::EmptyReference)
        );
        assert_eq!(
            validate_request(&json!({ "verseInput": "  " })),
            Err(ValidationError::EmptyReference)
        );
        assert_eq!(
            validate_request(&json!({ "verseInput": 23 })),
            Err(ValidationError::EmptyReference)
        );
    }

    #[test]
    fn validate_request_rejects_unparsable_reference() {
        let err = validate_request(&json!({ "verseInput": "요한복음 abc" })).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedReference);
        assert!(err.to_string().contains("마가복음 10:27"));
    }

    #[test]
    fn valid_completion_passes_and_canonicalizes_echo() {
        let raw = sample_completion("마가복음 10장 27절").to_string();
        let result = validate_completion(&raw, "마가복음 10:27").unwrap();
        assert_eq!(result.verse_input, "마가복음 10:27");
        assert_eq!(result.keywords.len(), 3);
        assert!(result.verse_text.is_none());
    }

    #[test]
    fn wrong_keyword_count_is_rejected() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["keywords"].as_array_mut().unwrap().pop();
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Cardinality { field: "keywords", actual: 2, .. }
        ));
    }

    #[test]
    fn one_related_verse_is_rejected() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["relatedVerses"].as_array_mut().unwrap().pop();
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Cardinality { field: "relatedVerses", actual: 1, .. }
        ));
    }

    #[test]
    fn four_reflections_are_rejected_not_truncated() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["reflections"]
            .as_array_mut()
            .unwrap()
            .push(json!("하나 더"));
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Cardinality { field: "reflections", actual: 4, .. }
        ));
    }

    #[test]
    fn extra_field_is_rejected() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["extra"] = json!("surplus");
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut payload = sample_completion("마가복음 10:27");
        payload.as_object_mut().unwrap().remove("prayer");
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn type_coercion_is_refused() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["background"] = json!(42);
        let err = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn malformed_echoed_reference_is_rejected() {
        let raw = sample_completion("알 수 없는 형식").to_string();
        let err = validate_completion(&raw, "마가복음 10:27").unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedReference);
    }

    #[test]
    fn disagreeing_echoed_reference_is_rejected() {
        let raw = sample_completion("요한복음 3:16").to_string();
        let err = validate_completion(&raw, "마가복음 10:27").unwrap_err();
        assert!(matches!(err, ValidationError::ReferenceMismatch { .. }));
    }

    #[test]
    fn optional_verse_text_is_accepted() {
        let mut payload = sample_completion("마가복음 10:27");
        payload["verseText"] = json!("본문입니다.");
        let result = validate_completion(&payload.to_string(), "마가복음 10:27").unwrap();
        assert_eq!(result.verse_text.as_deref(), Some("본문입니다."));
    }

    #[test]
    fn provider_schema_is_strict_and_complete() {
        let schema = completion_json_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            ["verseInput", "background", "keywords", "relatedVerses", "reflections", "prayer"]
        );
        assert_eq!(schema["properties"]["keywords"]["minItems"], json!(3));
        assert_eq!(schema["properties"]["relatedVerses"]["maxItems"], json!(3));
        assert!(schema["properties"].get("verseText").is_none());
    }
}
