//! Resolution outcomes for path lookups
//!
//! Every data lookup in this crate funnels through [`Resolved`], the tagged
//! outcome of resolving a path against a data context. Downstream code pattern
//! matches on the variant instead of re-testing JSON shapes, so the rules for
//! "what counts as a scalar" or "what makes a record well-formed" live in one
//! place: the classification at the resolver boundary.
//!
//! The variants and their meanings:
//!
//! - [`Resolved::Absent`]: the path did not resolve (missing key, descent
//!   into a non-mapping, or an explicit `null`). Binding leaves the node
//!   unchanged.
//! - [`Resolved::Remove`]: the path resolved to `false`, the explicit
//!   "delete the owning node" signal. Never conflated with `Absent`.
//! - [`Resolved::Scalar`]: a string, number, or `true`, stringified.
//! - [`Resolved::Record`]: a JSON object, viewed through its optional
//!   `name`/`value` fields as an [`AttributeRecord`].
//! - [`Resolved::Sequence`]: a JSON array, borrowed in order; drives node
//!   replication.

use std::borrow::Cow;

use serde_json::Value;

/// The outcome of resolving a path against a data context
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// Path not found, or found `null`: leave the target unchanged.
    Absent,
    /// Explicit `false`: delete the owning node.
    Remove,
    /// Stringified scalar content.
    Scalar(Cow<'a, str>),
    /// An object exposing optional `name`/`value` fields.
    Record(AttributeRecord<'a>),
    /// An ordered sequence driving node replication.
    Sequence(&'a [Value]),
}

impl<'a> Resolved<'a> {
    /// Classify a raw JSON value into its resolution outcome.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => Resolved::Absent,
            Value::Bool(false) => Resolved::Remove,
            Value::Bool(true) => Resolved::Scalar(Cow::Borrowed("true")),
            Value::Number(n) => Resolved::Scalar(Cow::Owned(n.to_string())),
            Value::String(s) => Resolved::Scalar(Cow::Borrowed(s)),
            Value::Array(items) => Resolved::Sequence(items),
            Value::Object(_) => Resolved::Record(AttributeRecord::from_value(value)),
        }
    }
}

/// A `{name, value}` data shape used to synthesize or extend a markup attribute
///
/// Both fields are optional at this level; consumers call [`entry`] and skip
/// the record silently when it is malformed (missing value, missing or empty
/// name).
///
/// [`entry`]: AttributeRecord::entry
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord<'a> {
    pub name: Option<&'a str>,
    pub value: Option<Cow<'a, str>>,
}

impl<'a> AttributeRecord<'a> {
    fn from_value(value: &'a Value) -> Self {
        let fields = value.as_object();
        AttributeRecord {
            name: fields
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty()),
            value: fields.and_then(|f| f.get("value")).and_then(scalar_text),
        }
    }

    /// The `(name, value)` pair, or `None` for a malformed record.
    pub fn entry(&self) -> Option<(&str, &str)> {
        match (self.name, self.value.as_deref()) {
            (Some(name), Some(value)) => Some((name, value)),
            _ => None,
        }
    }
}

/// Attribute text: strings pass through, numbers are stringified.
fn scalar_text(value: &Value) -> Option<Cow<str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}
