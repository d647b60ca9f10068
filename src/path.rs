//! Dotted-path resolution against nested data
//!
//! Paths address nested JSON mappings: `"foo.bar"` reads key `bar` inside the
//! object at key `foo`. Every non-final segment must land on an object;
//! resolution never descends into scalars or arrays, it yields
//! [`Resolved::Absent`] instead. Resolution is pure and deterministic, which
//! the expansion engine relies on when it re-resolves the path it was
//! dispatched for.

use serde_json::Value;

use crate::value::Resolved;

/// Resolve a dot-separated path against `data`.
pub fn resolve<'a>(data: &'a Value, path: &str) -> Resolved<'a> {
    let segments: Vec<&str> = path.split('.').collect();
    resolve_path(data, &segments)
}

/// Resolve a pre-split path against `data`.
pub fn resolve_path<'a>(data: &'a Value, segments: &[&str]) -> Resolved<'a> {
    let Some((last, descent)) = segments.split_last() else {
        return Resolved::classify(data);
    };

    let mut current = data;
    for segment in descent {
        let Value::Object(fields) = current else {
            return Resolved::Absent;
        };
        match fields.get(*segment) {
            Some(next) => current = next,
            None => return Resolved::Absent,
        }
    }

    let Value::Object(fields) = current else {
        return Resolved::Absent;
    };
    fields.get(*last).map_or(Resolved::Absent, Resolved::classify)
}
