//! Tolerant extraction of a classification result from a raw model reply.
//!
//! The remote service is allowed to wrap the JSON in prose or code fences,
//! rename fields, omit fields, or hand back a single signal object where a
//! list was requested. Everything here defaults rather than fails; the one
//! exception is a reply with no parseable JSON object at all, which is
//! reported as [`ParseError`] so the caller can fall back to keyword scoring.

use serde_json::{Map, Value};

use crate::model::{NormalizedModelResult, RiskSignal};

/// Accepted key names for the high-risk flag, in priority order. The first
/// key present wins, even when several co-occur.
pub const HIGH_RISK_KEYS: &[&str] = &[
    "is_high_risk_signal",
    "is_high_risk",
    "high_risk_signal",
    "high_risk",
];

/// Accepted key names for the signal list, in priority order.
pub const SIGNAL_KEYS: &[&str] = &["signals", "risk_signals", "findings"];

/// Accepted key names for the rationale, in priority order.
pub const RATIONALE_KEYS: &[&str] = &["rationale", "reasoning", "explanation", "summary"];

/// Accepted key names for a signal's type field, in priority order.
pub const SIGNAL_TYPE_KEYS: &[&str] = &["type", "signal_type", "category", "classification", "kind"];

/// Accepted key names for a signal's detail field, in priority order.
pub const SIGNAL_DETAIL_KEYS: &[&str] = &[
    "detail",
    "description",
    "reason",
    "explanation",
    "content",
    "text",
    "message",
];

#[derive(Debug, thiserror::Error)]
#[error("model reply contained no parseable JSON object")]
pub struct ParseError;

/// Parses and normalizes a raw model reply.
///
/// Tries the whole text as JSON first, then strips Markdown code fences and
/// attempts two extracted candidates: the first balanced `{...}` span, and a
/// narrower brace span containing the literal `"is_high_risk_signal"` key.
/// A successfully parsed object always normalizes; only the no-candidate
/// case errors.
pub fn parse_model_reply(raw: &str) -> Result<NormalizedModelResult, ParseError> {
    let object = extract_json_object(raw).ok_or(ParseError)?;
    Ok(normalize(&object))
}

fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => return Some(map),
        // Whole reply is valid JSON but not an object; extraction would only
        // find spans inside string literals.
        Ok(_) => return None,
        Err(_) => {}
    }

    let stripped = strip_code_fences(raw);
    let candidates = [
        balanced_object_span(&stripped),
        keyed_object_span(&stripped, "\"is_high_risk_signal\""),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            return Some(map);
        }
    }
    None
}

/// Removes ```json markers (case-insensitive) and bare ``` fences.
fn strip_code_fences(text: &str) -> String {
    let without_json = remove_ascii_ci(text, "```json");
    remove_ascii_ci(&without_json, "```")
}

fn remove_ascii_ci(text: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let m = marker.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if i + m.len() <= bytes.len() && bytes[i..i + m.len()].eq_ignore_ascii_case(m) {
            i += m.len();
            continue;
        }
        let ch_len = text[i..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(1);
        out.push_str(&text[i..i + ch_len]);
        i += ch_len;
    }
    out
}

/// Span from the first `{` to its matching close brace, tracking string
/// literals so braces inside quoted text do not unbalance the scan.
fn balanced_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, byte) in text.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Narrow candidate: a `{...}` span containing `key` with no intervening
/// close brace before it. Recovers the result object when the wider span is
/// polluted by stray braces elsewhere in the reply.
fn keyed_object_span<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let key_pos = text.find(key)?;
    let open = text[..key_pos].rfind('{')?;
    if text[open..key_pos].contains('}') {
        return None;
    }
    let close = key_pos + text[key_pos..].find('}')?;
    Some(&text[open..=close])
}

fn normalize(map: &Map<String, Value>) -> NormalizedModelResult {
    let is_high_risk = first_present(map, HIGH_RISK_KEYS)
        .map(truthy)
        .unwrap_or(false);

    let signals = match first_truthy(map, SIGNAL_KEYS) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|entry| !entry.is_null())
            .map(normalize_signal)
            .collect(),
        Some(single) => vec![normalize_signal(single)],
        None => Vec::new(),
    };

    let rationale = first_truthy(map, RATIONALE_KEYS)
        .map(coerce_string)
        .unwrap_or_default();

    NormalizedModelResult {
        is_high_risk,
        signals,
        rationale,
    }
}

/// Normalizes one signal entry. Recognized keys win; otherwise the entry's
/// string-valued properties are scanned in the object's own key order (the
/// parsed JSON text's insertion order, pinned by serde_json's preserve_order
/// feature): two or more strings become type and detail, exactly one becomes
/// the detail, none leaves generic placeholders.
pub fn normalize_signal(raw: &Value) -> RiskSignal {
    let Some(map) = raw.as_object() else {
        return RiskSignal {
            signal_type: "unknown".to_string(),
            detail: if truthy(raw) {
                coerce_string(raw)
            } else {
                "Invalid signal".to_string()
            },
            quote: String::new(),
            start: 0,
            end: 0,
        };
    };

    let mut signal_type = first_truthy(map, SIGNAL_TYPE_KEYS).map(coerce_string);
    let mut detail = first_truthy(map, SIGNAL_DETAIL_KEYS).map(coerce_string);

    if signal_type.is_none() || detail.is_none() {
        let strings: Vec<&str> = map
            .values()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if strings.len() >= 2 {
            signal_type.get_or_insert_with(|| strings[0].to_string());
            detail.get_or_insert_with(|| strings[1].to_string());
        } else if strings.len() == 1 {
            signal_type.get_or_insert_with(|| "risk_signal".to_string());
            detail.get_or_insert_with(|| strings[0].to_string());
        }
    }

    RiskSignal {
        signal_type: signal_type.unwrap_or_else(|| "unknown_type".to_string()),
        detail: detail.unwrap_or_else(|| "Unknown risk signal detected".to_string()),
        quote: map
            .get("quote")
            .filter(|v| truthy(v))
            .map(coerce_string)
            .unwrap_or_default(),
        start: map.get("start").and_then(Value::as_i64).unwrap_or(0),
        end: map.get("end").and_then(Value::as_i64).unwrap_or(0),
    }
}

/// First key present in the map, even when its value is null or false.
fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

/// First key whose value is truthy; null, false, 0 and "" fall through to
/// the next variant.
fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|value| truthy(value)))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json_object() {
        let result = parse_model_reply(
            r#"{"is_high_risk_signal": true, "signals": [], "rationale": "collects iris scans"}"#,
        )
        .unwrap();
        assert!(result.is_high_risk);
        assert!(result.signals.is_empty());
        assert_eq!(result.rationale, "collects iris scans");
    }

    #[test]
    fn parses_fenced_json_with_prose_prefix() {
        let raw = "Here you go: ```json\n{\"is_high_risk_signal\":true,\"signals\":[{\"category\":\"purpose\",\"reason\":\"biometric ID\"}],\"explanation\":\"matches Annex III\"}\n```";
        let result = parse_model_reply(raw).unwrap();
        assert!(result.is_high_risk);
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].signal_type, "purpose");
        assert_eq!(result.signals[0].detail, "biometric ID");
        assert_eq!(result.rationale, "matches Annex III");
    }

    #[test]
    fn uppercase_fence_marker_is_stripped() {
        let raw = "```JSON\n{\"is_high_risk_signal\": false}\n```";
        let result = parse_model_reply(raw).unwrap();
        assert!(!result.is_high_risk);
    }

    #[test]
    fn prose_only_reply_is_unparseable() {
        assert!(parse_model_reply("I cannot comply with this request.").is_err());
    }

    #[test]
    fn valid_json_that_is_not_an_object_is_unparseable() {
        assert!(parse_model_reply(r#"["is_high_risk_signal"]"#).is_err());
        assert!(parse_model_reply("42").is_err());
    }

    #[test]
    fn trailing_prose_after_object_still_parses() {
        let raw = "{\"is_high_risk_signal\": true, \"rationale\": \"gaze profiling\"} Hope that helps!";
        let result = parse_model_reply(raw).unwrap();
        assert!(result.is_high_risk);
        assert_eq!(result.rationale, "gaze profiling");
    }

    #[test]
    fn keyed_span_recovers_from_stray_braces() {
        let raw = "Notation {a;b} aside, the verdict is {\"is_high_risk_signal\": true}";
        let result = parse_model_reply(raw).unwrap();
        assert!(result.is_high_risk);
    }

    #[test]
    fn braces_inside_string_values_do_not_unbalance_the_span() {
        let raw = "Answer: {\"is_high_risk_signal\": false, \"rationale\": \"uses {placeholders}\"} done";
        let result = parse_model_reply(raw).unwrap();
        assert_eq!(result.rationale, "uses {placeholders}");
    }

    #[test]
    fn high_risk_key_variants_resolve_in_priority_order() {
        let result =
            parse_model_reply(r#"{"high_risk": true, "is_high_risk_signal": false}"#).unwrap();
        assert!(!result.is_high_risk);

        let result = parse_model_reply(r#"{"is_high_risk": 1}"#).unwrap();
        assert!(result.is_high_risk);
    }

    #[test]
    fn missing_high_risk_field_defaults_false() {
        let result = parse_model_reply(r#"{"signals": [], "rationale": "nothing found"}"#).unwrap();
        assert!(!result.is_high_risk);
    }

    #[test]
    fn null_high_risk_field_is_present_and_coerces_false() {
        // null stops the key search; it does not fall through to the next
        // variant the way the signals chain does.
        let result =
            parse_model_reply(r#"{"is_high_risk_signal": null, "high_risk": true}"#).unwrap();
        assert!(!result.is_high_risk);
    }

    #[test]
    fn scalar_signals_field_wraps_into_single_entry() {
        let result = parse_model_reply(
            r#"{"is_high_risk_signal": true, "signals": {"type": "purpose", "detail": "worker monitoring"}}"#,
        )
        .unwrap();
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].detail, "worker monitoring");
    }

    #[test]
    fn null_signal_entries_are_discarded() {
        let result = parse_model_reply(
            r#"{"is_high_risk_signal": true, "signals": [null, {"type": "purpose", "detail": "x"}, null]}"#,
        )
        .unwrap();
        assert_eq!(result.signals.len(), 1);
    }

    #[test]
    fn null_signals_falls_through_to_next_variant() {
        let result = parse_model_reply(
            r#"{"is_high_risk_signal": true, "signals": null, "findings": [{"type": "a", "detail": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].signal_type, "a");
    }

    #[test]
    fn rationale_variants_resolve_in_priority_order() {
        let result =
            parse_model_reply(r#"{"summary": "later", "reasoning": "earlier"}"#).unwrap();
        assert_eq!(result.rationale, "earlier");
    }

    #[test]
    fn missing_rationale_defaults_empty() {
        let result = parse_model_reply(r#"{"is_high_risk_signal": false}"#).unwrap();
        assert_eq!(result.rationale, "");
    }

    #[test]
    fn non_string_rationale_is_coerced() {
        let result = parse_model_reply(r#"{"rationale": 7}"#).unwrap();
        assert_eq!(result.rationale, "7");
    }

    // ── signal normalization ──

    #[test]
    fn unrecognized_keys_fall_back_to_first_two_string_values() {
        let signal = serde_json::json!({"foo": "eye tracking", "bar": "used for gaze analytics"});
        let normalized = normalize_signal(&signal);
        assert_eq!(normalized.signal_type, "eye tracking");
        assert_eq!(normalized.detail, "used for gaze analytics");
    }

    #[test]
    fn single_string_value_becomes_detail() {
        let signal = serde_json::json!({"note": "continuous location capture"});
        let normalized = normalize_signal(&signal);
        assert_eq!(normalized.signal_type, "risk_signal");
        assert_eq!(normalized.detail, "continuous location capture");
    }

    #[test]
    fn empty_object_gets_generic_placeholders() {
        let normalized = normalize_signal(&serde_json::json!({}));
        assert_eq!(normalized.signal_type, "unknown_type");
        assert_eq!(normalized.detail, "Unknown risk signal detected");
        assert_eq!(normalized.quote, "");
        assert_eq!(normalized.start, 0);
        assert_eq!(normalized.end, 0);
    }

    #[test]
    fn string_signal_becomes_detail_with_unknown_type() {
        let normalized = normalize_signal(&serde_json::json!("voiceprint matching"));
        assert_eq!(normalized.signal_type, "unknown");
        assert_eq!(normalized.detail, "voiceprint matching");
    }

    #[test]
    fn type_variants_resolve_in_priority_order() {
        let signal = serde_json::json!({"kind": "later", "signal_type": "earlier", "detail": "d"});
        let normalized = normalize_signal(&signal);
        assert_eq!(normalized.signal_type, "earlier");
    }

    #[test]
    fn recognized_type_with_missing_detail_scans_string_values() {
        // "purpose" is consumed by the type lookup; the scan still assigns
        // the second string value to detail.
        let signal = serde_json::json!({"type": "purpose", "extra": "profiling of pupils"});
        let normalized = normalize_signal(&signal);
        assert_eq!(normalized.signal_type, "purpose");
        assert_eq!(normalized.detail, "profiling of pupils");
    }

    #[test]
    fn quote_and_offsets_copy_through() {
        let signal = serde_json::json!({
            "type": "sensitive_data",
            "detail": "heart rate capture",
            "quote": "we record heart rate",
            "start": 120,
            "end": 141
        });
        let normalized = normalize_signal(&signal);
        assert_eq!(normalized.quote, "we record heart rate");
        assert_eq!(normalized.start, 120);
        assert_eq!(normalized.end, 141);
    }
}
