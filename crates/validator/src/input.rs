//! Input lookup for attribute keys.
//!
//! Attribute keys address values inside a `serde_json::Value`. A key that
//! exists verbatim at the top level wins. Otherwise the key is read as a
//! dot-path (`user.email`, `items.0.sku`). A `*` segment matches every
//! element of an array or every member of an object.

use serde_json::Value;

/// Path segment separator.
pub const PATH_SEPARATOR: char = '.';

/// Segment that matches every child.
pub const WILDCARD: &str = "*";

/// Looks up the value addressed by `key`.
///
/// # Examples
///
/// ```
/// use rulekit_validator::input::lookup;
/// use serde_json::json;
///
/// let data = json!({ "user": { "tags": ["a", "b"] }, "x.y": 1 });
/// assert_eq!(lookup(&data, "user.tags.1"), Some(&json!("b")));
/// assert_eq!(lookup(&data, "x.y"), Some(&json!(1)));
/// assert_eq!(lookup(&data, "user.missing"), None);
/// ```
#[must_use]
pub fn lookup<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(value) = data.as_object().and_then(|map| map.get(key)) {
        return Some(value);
    }
    key.split(PATH_SEPARATOR)
        .try_fold(data, |current, segment| child(current, segment))
}

/// Returns true if `key` contains a `*` segment.
#[must_use]
pub fn is_wildcard(key: &str) -> bool {
    key.split(PATH_SEPARATOR).any(|segment| segment == WILDCARD)
}

/// Expands every `*` segment of `pattern` against `data`.
///
/// Keys without wildcards come back unchanged. A wildcard over a missing
/// value or a scalar expands to nothing.
#[must_use]
pub fn expand(data: &Value, pattern: &str) -> Vec<String> {
    if !is_wildcard(pattern) {
        return vec![pattern.to_owned()];
    }
    let segments: Vec<&str> = pattern.split(PATH_SEPARATOR).collect();
    let mut out = Vec::new();
    expand_into(Some(data), String::new(), &segments, &mut out);
    out
}

fn expand_into(value: Option<&Value>, prefix: String, rest: &[&str], out: &mut Vec<String>) {
    let Some((segment, rest)) = rest.split_first() else {
        out.push(prefix);
        return;
    };

    if *segment != WILDCARD {
        let next = value.and_then(|v| child(v, segment));
        expand_into(next, join(&prefix, segment), rest, out);
        return;
    }

    match value {
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                expand_into(Some(item), join(&prefix, &index.to_string()), rest, out);
            }
        }
        Some(Value::Object(members)) => {
            for (key, member) in members {
                expand_into(Some(member), join(&prefix, key), rest, out);
            }
        }
        _ => {}
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn top_level_key_wins_over_path() {
        let data = json!({ "a.b": 1, "a": { "b": 2 } });
        assert_eq!(lookup(&data, "a.b"), Some(&json!(1)));
    }

    #[test]
    fn path_reaches_into_arrays() {
        let data = json!({ "items": [{ "sku": "x" }, { "sku": "y" }] });
        assert_eq!(lookup(&data, "items.1.sku"), Some(&json!("y")));
        assert_eq!(lookup(&data, "items.9.sku"), None);
        assert_eq!(lookup(&data, "items.first"), None);
    }

    #[test]
    fn expands_array_wildcard() {
        let data = json!({ "items": [{ "sku": "x" }, {}] });
        assert_eq!(expand(&data, "items.*.sku"), ["items.0.sku", "items.1.sku"]);
    }

    #[test]
    fn expands_nested_wildcards() {
        let data = json!({ "groups": [{ "users": [1, 2] }, { "users": [3] }] });
        assert_eq!(
            expand(&data, "groups.*.users.*"),
            ["groups.0.users.0", "groups.0.users.1", "groups.1.users.0"]
        );
    }

    #[test]
    fn expands_object_wildcard() {
        let data = json!({ "prices": { "eur": 1, "usd": 2 } });
        let mut keys = expand(&data, "prices.*");
        keys.sort();
        assert_eq!(keys, ["prices.eur", "prices.usd"]);
    }

    #[test]
    fn wildcard_over_missing_value_expands_to_nothing() {
        assert!(expand(&json!({}), "items.*.sku").is_empty());
        assert!(expand(&json!({ "items": 5 }), "items.*").is_empty());
    }

    #[test]
    fn plain_key_is_returned_unchanged() {
        assert_eq!(expand(&json!({}), "email"), ["email"]);
        assert!(!is_wildcard("email"));
        assert!(is_wildcard("a.*"));
    }
}
