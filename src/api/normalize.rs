//! Tolerant decoding of backend response bodies.
//!
//! The booking backend nominally speaks JSON but sometimes delivers a body
//! as a string wrapping valid JSON, as two JSON values concatenated back to
//! back with no separator, or as an array surrounded by stray characters.
//! This module recovers whatever structured data it can and reports
//! everything else as unparseable instead of erroring, so list screens can
//! degrade to an empty state.
//!
//! This is a compatibility shim for a known backend defect, not a format:
//! when two values are concatenated the first one wins, and no round-trip
//! guarantee is intended.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

lazy_static! {
    /// Boundary between two concatenated top-level arrays (`][`).
    static ref ARRAY_BOUNDARY: Regex = Regex::new(r"\]\s*\[").unwrap();
}

/// Outcome of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Structured data recovered from the body.
    Data(Value),
    /// Nothing usable could be recovered; carries the original value so
    /// callers can log it.
    Unparseable(Value),
}

impl Normalized {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Normalized::Data(value) => Some(value),
            Normalized::Unparseable(_) => None,
        }
    }
}

/// Recover structured data from a response body.
///
/// Policy, in order: a non-string value is returned unchanged; a string that
/// parses as JSON wholesale wins; else the first well-formed bracketed array
/// span; else the first well-formed braced object span; else the original
/// value is handed back as [`Normalized::Unparseable`]. Never panics.
pub fn normalize(body: Value) -> Normalized {
    let text = match body {
        Value::String(text) => text,
        structured => return Normalized::Data(structured),
    };

    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        return Normalized::Data(flatten_nested(value));
    }

    if ARRAY_BOUNDARY.is_match(&text) {
        debug!("response contains concatenated JSON arrays; keeping the first");
    }

    if let Some(value) = first_span(&text, b'[', b']') {
        return Normalized::Data(flatten_nested(value));
    }
    if let Some(value) = first_span(&text, b'{', b'}') {
        return Normalized::Data(value);
    }

    Normalized::Unparseable(Value::String(text))
}

/// Extract the first balanced `open`…`close` span that parses as JSON.
///
/// Walks the bytes from the first opening delimiter, tracking string and
/// escape state so delimiters inside string literals do not count. Stops at
/// the matching close, which is what makes the first of two concatenated
/// values win.
fn first_span(text: &str, open: u8, close: u8) -> Option<Value> {
    let start = text.find(open as char)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        if byte == b'"' {
            in_string = true;
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return serde_json::from_str(&text[start..=i]).ok();
            }
        }
    }
    None
}

/// Collapse one level of accidental nesting (`[[…]]` left over from
/// upstream fragment repair) when the outer array's only element is itself
/// an array.
fn flatten_nested(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 && items[0].is_array() => items.remove(0),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_input_is_returned_unchanged() {
        let object = json!({"id": 1, "status": "CONFIRMED"});
        assert_eq!(normalize(object.clone()), Normalized::Data(object));

        let array = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(normalize(array.clone()), Normalized::Data(array));

        // Nesting in already-structured input is not touched.
        let nested = json!([[1, 2]]);
        assert_eq!(normalize(nested.clone()), Normalized::Data(nested));
    }

    #[test]
    fn string_holding_one_array_is_parsed() {
        let body = Value::String(r#"[{"id":1,"status":"CONFIRMED"}]"#.to_string());
        assert_eq!(
            normalize(body),
            Normalized::Data(json!([{"id": 1, "status": "CONFIRMED"}]))
        );
    }

    #[test]
    fn concatenated_arrays_yield_the_first() {
        let body = Value::String(r#"[{"id":1}][{"id":2}]"#.to_string());
        assert_eq!(normalize(body), Normalized::Data(json!([{"id": 1}])));
    }

    #[test]
    fn concatenated_objects_yield_the_first() {
        let body = Value::String(r#"{"id":1}{"id":2}"#.to_string());
        assert_eq!(normalize(body), Normalized::Data(json!({"id": 1})));
    }

    #[test]
    fn array_wrapped_in_stray_characters_is_extracted() {
        let body = Value::String("xx]\n[{\"id\":7}] trailing garbage".to_string());
        assert_eq!(normalize(body), Normalized::Data(json!([{"id": 7}])));
    }

    #[test]
    fn brackets_inside_string_literals_do_not_close_the_span() {
        let body = Value::String(r#"noise [{"comment":"great ] value"}] tail"#.to_string());
        assert_eq!(
            normalize(body),
            Normalized::Data(json!([{"comment": "great ] value"}]))
        );
    }

    #[test]
    fn object_span_is_the_fallback_when_no_array_parses() {
        let body = Value::String(r#"error: {"message":"boom"}"#.to_string());
        assert_eq!(normalize(body), Normalized::Data(json!({"message": "boom"})));
    }

    #[test]
    fn unparseable_string_is_handed_back_as_sentinel() {
        let body = Value::String("definitely not json".to_string());
        assert_eq!(
            normalize(body),
            Normalized::Unparseable(Value::String("definitely not json".to_string()))
        );
    }

    #[test]
    fn repaired_single_element_nesting_is_flattened() {
        let body = Value::String(r#"[[{"id":1},{"id":2}]]"#.to_string());
        assert_eq!(normalize(body), Normalized::Data(json!([{"id": 1}, {"id": 2}])));
    }
}
