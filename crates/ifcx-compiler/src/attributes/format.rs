// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Script literal formatting for JSON values

use serde_json::{Number, Value};

/// Placeholder for object values nested inside arrays
pub const OBJECT_PLACEHOLDER: &str = "\"{object}\"";
/// Placeholder for null values
pub const NULL_PLACEHOLDER: &str = "\"UNKNOWN\"";

/// Format a JSON value as a script literal
///
/// Outer arrays use `[a, b]`; arrays nested in them (or any array when
/// `inner` is set) use `{{a, b}}`.
pub fn format_value(value: &Value, inner: bool) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Number(n) => format_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) if inner => format_vector(items, None),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| format_value(item, item.is_array()))
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Object(_) => OBJECT_PLACEHOLDER.to_string(),
        Value::Null => NULL_PLACEHOLDER.to_string(),
    }
}

/// Format array elements as a `{{a, b, c}}` brace list
///
/// `extra` is appended as a last element when present.
pub fn format_vector(items: &[Value], extra: Option<&str>) -> String {
    let mut parts: Vec<String> = items.iter().map(|item| format_value(item, false)).collect();
    if let Some(extra) = extra {
        parts.push(extra.to_string());
    }
    format!("{{{{{}}}}}", parts.join(", "))
}

/// Format an object's member values, comma separated
pub fn format_members(object: &serde_json::Map<String, Value>) -> String {
    object
        .values()
        .map(|value| format_value(value, false))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a number, keeping integers verbatim
pub fn format_number(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        i.to_string()
    } else if let Some(u) = number.as_u64() {
        u.to_string()
    } else {
        number.as_f64().map(format_float).unwrap_or_else(|| number.to_string())
    }
}

/// Format a float with the shortest round-trip digits; integral values keep `.0`
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{text}.0")
    } else {
        text
    }
}

/// Quote a string literal
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(&json!("a\"b"), false), r#""a\"b""#);
        assert_eq!(format_value(&json!(42), false), "42");
        assert_eq!(format_value(&json!(-9_000_000_000i64), false), "-9000000000");
        assert_eq!(format_value(&json!(3.0), false), "3.0");
        assert_eq!(format_value(&json!(0.1), false), "0.1");
        assert_eq!(format_value(&json!(true), false), "true");
        assert_eq!(format_value(&json!(null), false), "\"UNKNOWN\"");
        assert_eq!(format_value(&json!({ "a": 1 }), false), "\"{object}\"");
    }

    #[test]
    fn test_flat_array() {
        assert_eq!(format_value(&json!([1.5, 2.5, 3.5]), false), "[1.5, 2.5, 3.5]");
    }

    #[test]
    fn test_nested_array() {
        assert_eq!(format_value(&json!([[1, 2], [3, 4]]), false), "[{{1, 2}}, {{3, 4}}]");
        assert_eq!(format_value(&json!([1, 2]), true), "{{1, 2}}");
    }

    #[test]
    fn test_vector_with_extra() {
        let items = [json!(0.8), json!(0.1), json!(0.1)];
        assert_eq!(format_vector(&items, Some("0.5")), "{{0.8, 0.1, 0.1, 0.5}}");
        assert_eq!(format_vector(&items, None), "{{0.8, 0.1, 0.1}}");
    }

    #[test]
    fn test_members() {
        let value = json!({ "code": "IfcWall", "uri": "https://x" });
        assert_eq!(
            format_members(value.as_object().unwrap()),
            r#""IfcWall", "https://x""#
        );
    }

    #[test]
    fn test_quote_escapes_backslash() {
        assert_eq!(quote("C:\\x"), r#""C:\\x""#);
    }
}
