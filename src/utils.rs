//! Shared text and serialization helpers

use std::borrow::Cow;

use dom_query::Document;

/// Escape text so it survives insertion as HTML character data.
pub fn escape_text(input: &str) -> Cow<str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut escaped = String::with_capacity(input.len() + input.len() / 4);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Whether the authored text is a full document rather than a fragment.
///
/// The parser wraps fragments in synthetic `html`/`head`/`body` elements;
/// serialization needs to know whether those were authored or synthetic.
pub fn looks_like_document(template: &str) -> bool {
    template
        .trim_start()
        .get(..5)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("<html"))
}

/// Serialize a parsed document back to text.
///
/// Full documents serialize as their `<html>` element. Fragments serialize as
/// the contents the parser filed under `head` and `body`, so synthetic
/// wrappers never leak into the output.
pub fn serialize_document(doc: &Document, full_document: bool) -> String {
    if full_document {
        let html = doc.select("html");
        if !html.is_empty() {
            let mut out = String::new();
            for node in html.nodes() {
                out.push_str(&node.html());
            }
            return out;
        }
    }
    serialize_contents(doc)
}

fn serialize_contents(doc: &Document) -> String {
    let mut out = String::new();
    let mut found = false;
    for container in ["head", "body"] {
        let selection = doc.select(container);
        if let Some(node) = selection.nodes().first() {
            found = true;
            for child in node.children() {
                out.push_str(&child.html());
            }
        }
    }
    if !found {
        return doc.html().to_string();
    }
    out
}
