//! Change summaries for audit logging
//!
//! Describes how a section changed between its current and merged state.

use serde_json::{Map, Value};

/// Summarize the changes between two section states
///
/// Returns `None` when nothing changed. Objects are compared one level
/// deep. A section wrapped in a single key on both sides (such as
/// `{"addressBook": {...}}`) is described by its inner entries.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            if let Some((key, before_inner, after_inner)) = shared_wrapper(before_obj, after_obj) {
                return generate_diff(before_inner, after_inner)
                    .map(|inner| format!("{}: {}", key, inner));
            }

            let changes = object_changes(before_obj, after_obj);
            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ if before == after => None,
        _ => Some(format!("{} -> {}", format_value(before), format_value(after))),
    }
}

fn object_changes(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    let mut changes = Vec::new();

    for (key, before_val) in before {
        match after.get(key) {
            Some(after_val) if after_val != before_val => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    changes
}

/// Both sides are `{key: {...}}` with the same single key
fn shared_wrapper<'a>(
    before: &'a Map<String, Value>,
    after: &'a Map<String, Value>,
) -> Option<(&'a str, &'a Value, &'a Value)> {
    if before.len() != 1 || after.len() != 1 {
        return None;
    }
    let (key, before_inner) = before.iter().next()?;
    let after_inner = after.get(key)?;
    (before_inner.is_object() && after_inner.is_object()).then_some((
        key.as_str(),
        before_inner,
        after_inner,
    ))
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
