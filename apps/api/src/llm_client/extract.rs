//! Recovers a JSON document from free-form model output.
//!
//! Models wrap JSON in Markdown fences, prepend a sentence of prose, or append
//! a closing remark. The scanner below walks each `{`/`[` candidate, tracks a
//! bracket stack while honouring string literals and escapes, and returns the
//! first balanced fragment that is valid JSON.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("response contains no JSON object or array")]
    NoJson,
}

/// Removes every ```json / ``` fence marker and trims the result.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Returns the JSON fragment embedded in `raw`.
///
/// A balanced candidate that is not valid JSON is skipped whole; its inner
/// brackets are never tried on their own. Once a candidate runs off the end of
/// the text or closes with the wrong bracket, scanning stops and the legacy
/// slice (first opener through last closer) is returned so the caller reports
/// a parse error with the upstream text in hand.
pub fn extract_json(raw: &str) -> Result<String, ExtractError> {
    let clean = strip_code_fences(raw);
    let bytes = clean.as_bytes();

    let mut first_opener = None;
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b != b'{' && b != b'[' {
            pos += 1;
            continue;
        }
        first_opener.get_or_insert(pos);

        let Some(end) = scan_fragment(bytes, pos) else {
            break;
        };
        let fragment = &clean[pos..=end];
        if serde_json::from_str::<serde::de::IgnoredAny>(fragment).is_ok() {
            return Ok(fragment.to_string());
        }
        pos = end + 1;
    }

    let start = first_opener.ok_or(ExtractError::NoJson)?;
    let fragment = match clean.rfind(|c| c == '}' || c == ']') {
        Some(end) if end >= start => &clean[start..=end],
        _ => &clean[start..],
    };
    Ok(fragment.to_string())
}

/// Scans from the opener at `start` to its matching closer.
///
/// Returns the byte index of the closer, or `None` when the fragment is
/// truncated or its brackets are mismatched. Only ASCII bytes are inspected,
/// so every returned index lies on a char boundary.
fn scan_fragment(bytes: &[u8], start: usize) -> Option<usize> {
    let mut expected: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => expected.push(b'}'),
            b'[' => expected.push(b']'),
            b'}' | b']' => {
                if expected.pop() != Some(b) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json_returns_payload() {
        let raw = "```json\n{\"roleSummary\": \"Backend\", \"steps\": [1, 2]}\n```";
        assert_eq!(
            extract_json(raw).unwrap(),
            "{\"roleSummary\": \"Backend\", \"steps\": [1, 2]}"
        );
    }

    #[test]
    fn test_bare_fence_without_language_tag() {
        let raw = "```\n[{\"question\": \"Why Rust?\"}]\n```";
        assert_eq!(extract_json(raw).unwrap(), "[{\"question\": \"Why Rust?\"}]");
    }

    #[test]
    fn test_surrounding_prose_is_dropped() {
        let raw = "Some text {\"a\":1} trailing";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_braces_inside_strings_do_not_end_fragment() {
        let raw = "{\"a\":\"b{c}d\"}";
        assert_eq!(extract_json(raw).unwrap(), raw);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let raw = r#"Here you go: {"quote": "she said \"}\" twice", "n": 2} hope it helps"#;
        assert_eq!(
            extract_json(raw).unwrap(),
            r#"{"quote": "she said \"}\" twice", "n": 2}"#
        );
    }

    #[test]
    fn test_stray_braces_in_prose_are_skipped() {
        // The legacy first/last slice would cut from "{placeholder}" to the final "}".
        let raw = "Fill the {placeholder} below.\n{\"score\": 72}\nNote: values are {estimates}.";
        assert_eq!(extract_json(raw).unwrap(), "{\"score\": 72}");
    }

    #[test]
    fn test_trailing_closer_in_prose_is_ignored() {
        let raw = "[{\"type\": \"Behavioral\"}] (see above]";
        assert_eq!(extract_json(raw).unwrap(), "[{\"type\": \"Behavioral\"}]");
    }

    #[test]
    fn test_multibyte_text_is_sliced_on_char_boundaries() {
        let raw = "Résumé → {\"currency\": {\"symbol\": \"₹\", \"code\": \"INR\"}} ✓";
        assert_eq!(
            extract_json(raw).unwrap(),
            "{\"currency\": {\"symbol\": \"₹\", \"code\": \"INR\"}}"
        );
    }

    #[test]
    fn test_truncated_reply_falls_back_to_legacy_slice() {
        let raw = "{\"a\": [1, 2}";
        let fragment = extract_json(raw).unwrap();
        assert_eq!(fragment, "{\"a\": [1, 2}");
        assert!(serde_json::from_str::<serde_json::Value>(&fragment).is_err());
    }

    #[test]
    fn test_truncated_object_is_not_mined_for_inner_fragments() {
        let raw = r#"{"roleSummary": "x", "skillsGap": {"missing": ["Flink"]}, "steps": [{"phase": "P1""#;
        let fragment = extract_json(raw).unwrap();
        assert!(fragment.starts_with(r#"{"roleSummary""#));
        assert!(serde_json::from_str::<serde_json::Value>(&fragment).is_err());
    }

    #[test]
    fn test_truncated_array_is_not_mined_for_inner_fragments() {
        let raw = r#"[{"question": "q1", "type": "Technical"}, {"question": "q2""#;
        let fragment = extract_json(raw).unwrap();
        assert!(fragment.starts_with('['));
        assert!(serde_json::from_str::<serde_json::Value>(&fragment).is_err());
    }

    #[test]
    fn test_balanced_invalid_document_is_skipped_whole() {
        let raw = r#"{"a": 1,, "b": {"c": 2}}"#;
        let fragment = extract_json(raw).unwrap();
        assert_eq!(fragment, raw);
        assert!(serde_json::from_str::<serde_json::Value>(&fragment).is_err());
    }

    #[test]
    fn test_no_json_at_all() {
        assert_eq!(
            extract_json("I could not find data for that role."),
            Err(ExtractError::NoJson)
        );
    }
}
