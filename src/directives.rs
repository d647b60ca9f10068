//! The directive vocabulary and the binding rules shared between the global
//! pass and expanded clones
//!
//! Directive names are fixed and case-sensitive. The `local-*` variants only
//! carry meaning inside an expanded clone, where they resolve against the
//! current sequence element instead of the full data context.

use dom_query::Node;
use serde_json::Value;

use crate::node_ext::NodeExt;
use crate::path::resolve;
use crate::utils::escape_text;
use crate::value::Resolved;

/// Binds an element to a data-context path.
pub const VALUE: &str = "value";
/// Binds an element to the current sequence-element path.
pub const LOCAL_VALUE: &str = "local-value";
/// Space-separated paths, each resolving to an attribute record.
pub const ATTRIBUTE: &str = "attribute";
/// Same, resolved against the current sequence element.
pub const LOCAL_ATTRIBUTE: &str = "local-attribute";
/// Names the file a `<partial>` placeholder inlines.
pub const TEMPLATE: &str = "template";

/// Tag name of partial-placeholder elements.
pub const PARTIAL_ELEMENT: &str = "partial";
/// Tag name of plain-text placeholder elements.
pub const TEXT_ELEMENT: &str = "text";

/// Marker attribute for the deferred-removal sweep. Nodes are never excised
/// mid-pass; they are tagged and removed once the tree has stabilized.
pub(crate) const REMOVAL_MARK: &str = "data-pending-removal";

/// Tag a node for the deferred-removal sweep.
pub(crate) fn mark_for_removal(node: &Node) {
    node.set_attr(REMOVAL_MARK, "1");
}

/// Apply an attribute directive: each path in the space-separated list
/// resolves against `scope` to one record or a sequence of records, and every
/// well-formed record either creates the named attribute or appends to it.
/// Malformed records are skipped.
pub(crate) fn apply_attribute_directive(node: &Node, paths: &str, scope: &Value) {
    for path in paths.split_whitespace() {
        match resolve(scope, path) {
            Resolved::Sequence(entries) => {
                for entry in entries {
                    merge_attribute(node, Resolved::classify(entry));
                }
            }
            single => merge_attribute(node, single),
        }
    }
}

fn merge_attribute(node: &Node, resolved: Resolved) {
    let Resolved::Record(record) = resolved else {
        return;
    };
    let Some((name, value)) = record.entry() else {
        return;
    };
    match node.attr(name) {
        Some(existing) => node.set_attr(name, &format!("{} {}", existing, value)),
        None => node.set_attr(name, value),
    }
}

/// Substitute a `<text>` placeholder element: a scalar result replaces the
/// element with a span carrying the value; anything else leaves the element
/// as authored.
pub(crate) fn substitute_text_element(node: &Node, resolved: Resolved) {
    if let Resolved::Scalar(text) = resolved {
        node.replace_with_markup(format!("<span>{}</span>", escape_text(&text)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;
    use serde_json::json;

    fn first_node<'a>(doc: &'a Document, selector: &str) -> Node<'a> {
        doc.select(selector).nodes().first().unwrap().clone()
    }

    #[test]
    fn test_attribute_directive_creates_attribute() {
        let doc = Document::from(r#"<body attribute="foo">test</body>"#);
        let node = first_node(&doc, "body");
        apply_attribute_directive(&node, "foo", &json!({"foo": {"name": "class", "value": "yes"}}));
        assert_eq!(node.attr("class").unwrap().as_ref(), "yes");
    }

    #[test]
    fn test_attribute_directive_appends_to_existing() {
        let doc = Document::from(r#"<p class="a" attribute="extra"></p>"#);
        let node = first_node(&doc, "p");
        apply_attribute_directive(&node, "extra", &json!({"extra": {"name": "class", "value": "b"}}));
        assert_eq!(node.attr("class").unwrap().as_ref(), "a b");
    }

    #[test]
    fn test_attribute_directive_takes_record_sequences() {
        let doc = Document::from("<p></p>");
        let node = first_node(&doc, "p");
        let data = json!({
            "attrs": [
                {"name": "class", "value": "a"},
                {"name": "class", "value": "b"},
                {"name": "id", "value": "x"},
            ]
        });
        apply_attribute_directive(&node, "attrs", &data);
        assert_eq!(node.attr("class").unwrap().as_ref(), "a b");
        assert_eq!(node.attr("id").unwrap().as_ref(), "x");
    }

    #[test]
    fn test_attribute_directive_multiple_paths_in_order() {
        let doc = Document::from("<p></p>");
        let node = first_node(&doc, "p");
        let data = json!({
            "one": {"name": "class", "value": "first"},
            "two": {"name": "class", "value": "second"},
        });
        apply_attribute_directive(&node, "one two", &data);
        assert_eq!(node.attr("class").unwrap().as_ref(), "first second");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let doc = Document::from("<p></p>");
        let node = first_node(&doc, "p");
        let data = json!({
            "bad": [
                {"value": "no name"},
                {"name": "", "value": "empty name"},
                {"name": "title"},
                "not a record",
            ]
        });
        apply_attribute_directive(&node, "bad missing.path", &data);
        assert!(node.attr("title").is_none());
        assert!(node.attr("class").is_none());
    }

    #[test]
    fn test_text_element_substitution() {
        let doc = Document::from(r#"<div><text value="t"></text></div>"#);
        let node = first_node(&doc, "text");
        substitute_text_element(&node, Resolved::classify(&json!("hello")));
        assert!(doc.select("text").is_empty());
        assert_eq!(first_node(&doc, "div span").text().as_ref(), "hello");
    }

    #[test]
    fn test_text_element_left_alone_when_unresolved() {
        let doc = Document::from(r#"<div><text value="t">authored</text></div>"#);
        let node = first_node(&doc, "text");
        substitute_text_element(&node, Resolved::Absent);
        assert_eq!(first_node(&doc, "text").text().as_ref(), "authored");
    }
}
