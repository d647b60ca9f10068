//! The binding pass over global directives
//!
//! One top-level pass resolves every global directive in the working
//! document, delegating sequence-valued bindings to the array expander. All
//! structural passes iterate over up-front snapshots of their matching nodes,
//! and node removal is deferred: targets are tagged during binding and excised
//! in a single sweep once the tree has stabilized. Some tree back-ends do not
//! tolerate structural mutation during an in-flight query, and the discipline
//! also keeps clone insertion and original removal from interleaving.
//!
//! Pass order matters and mirrors the directive semantics:
//! 1. `<text>` placeholder substitution (global scope).
//! 2. `value` directives: removal marks, expansion, or trailing-text append.
//! 3. `attribute` directives, collected after expansion so directive
//!    carriers inside freshly inserted clones participate.
//! 4. Deferred-removal sweep.
//! 5. Preformatted-element guard for elements that collapse when empty.

use dom_query::{Document, Node};
use serde_json::Value;

use crate::directives::{
    apply_attribute_directive, mark_for_removal, substitute_text_element, ATTRIBUTE, LOCAL_VALUE,
    REMOVAL_MARK, TEXT_ELEMENT, VALUE,
};
use crate::error::Result;
use crate::expand::expand;
use crate::node_ext::NodeExt;
use crate::path::resolve;
use crate::value::Resolved;

/// Binds a data context to a parsed working document
pub struct Binder<'a> {
    data: &'a Value,
}

impl<'a> Binder<'a> {
    pub fn new(data: &'a Value) -> Self {
        Self { data }
    }

    /// Run the full binding pass, leaving the document finalized up to
    /// serialization.
    pub fn bind(&self, doc: &Document) -> Result<()> {
        self.substitute_text_elements(doc);
        self.bind_value_directives(doc)?;
        self.bind_attribute_directives(doc);
        sweep_removals(doc);
        pad_empty_preformatted(doc);
        Ok(())
    }

    fn substitute_text_elements(&self, doc: &Document) {
        let placeholders: Vec<Node> = doc.select(TEXT_ELEMENT).nodes().to_vec();
        for node in &placeholders {
            // local carriers are bound per expanded clone, not here
            if node.has_attr(LOCAL_VALUE) {
                continue;
            }
            if let Some(path) = node.attr(VALUE) {
                substitute_text_element(node, resolve(self.data, &path));
            }
        }
    }

    fn bind_value_directives(&self, doc: &Document) -> Result<()> {
        // The up-front snapshot is authoritative: carriers introduced by
        // expansion belong to local scopes and are not re-collected.
        let carriers: Vec<Node> = doc.select(&format!("*[{}]", VALUE)).nodes().to_vec();
        for node in &carriers {
            let Some(path) = node.attr(VALUE) else { continue };
            match resolve(self.data, &path) {
                Resolved::Remove => mark_for_removal(node),
                // expansion inserts bound clones ahead of the node and leaves
                // it tagged for the sweep
                Resolved::Sequence(_) => expand(node, self.data)?,
                Resolved::Scalar(text) => node.append_text(&text),
                Resolved::Absent | Resolved::Record(_) => {}
            }
        }
        Ok(())
    }

    fn bind_attribute_directives(&self, doc: &Document) {
        let carriers: Vec<Node> = doc.select(&format!("*[{}]", ATTRIBUTE)).nodes().to_vec();
        for node in &carriers {
            if let Some(paths) = node.attr(ATTRIBUTE) {
                apply_attribute_directive(node, &paths, self.data);
            }
        }
    }
}

/// Excise every node tagged during binding, in one pass over the stabilized
/// tree.
pub(crate) fn sweep_removals(doc: &Document) {
    let marked: Vec<Node> = doc
        .select(&format!("[{}]", REMOVAL_MARK))
        .nodes()
        .to_vec();
    for node in marked {
        node.remove_from_parent();
    }
}

/// Give empty textareas a placeholder space; serializing `<textarea></textarea>`
/// as a collapsed tag breaks HTML parsing in many browsers. The placeholder is
/// stripped back out of the serialized text.
pub(crate) fn pad_empty_preformatted(doc: &Document) {
    for node in doc.select("textarea").nodes() {
        if node.text().is_empty() {
            node.set_html(" ");
        }
    }
}

/// Remove the placeholder space again, right at the closing tag.
pub(crate) fn strip_preformatted_pad(html: String) -> String {
    html.replace(" </textarea", "</textarea")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_value_appends_trailing_content() {
        let doc = Document::from(r#"<p value="msg">Note: </p>"#);
        Binder::new(&json!({"msg": "hello"})).bind(&doc).unwrap();
        let node = doc.select("p").nodes().first().unwrap().clone();
        assert_eq!(node.text().as_ref(), "Note: hello");
        // the directive attribute is left intact
        assert_eq!(node.attr("value").unwrap().as_ref(), "msg");
    }

    #[test]
    fn test_false_removes_the_node() {
        let doc = Document::from(r#"<div><p value="x">gone</p><p>kept</p></div>"#);
        Binder::new(&json!({"x": false})).bind(&doc).unwrap();
        let paragraphs = doc.select("div p");
        assert_eq!(paragraphs.length(), 1);
        assert_eq!(paragraphs.nodes()[0].text().as_ref(), "kept");
    }

    #[test]
    fn test_unresolved_path_leaves_node_as_authored() {
        let doc = Document::from(r#"<p value="missing">authored</p>"#);
        Binder::new(&json!({})).bind(&doc).unwrap();
        let node = doc.select("p").nodes().first().unwrap().clone();
        assert_eq!(node.text().as_ref(), "authored");
    }

    #[test]
    fn test_expanded_sequence_replaces_the_template_node() {
        let doc = Document::from(r#"<body><p value="xs"></p></body>"#);
        Binder::new(&json!({"xs": ["a", "b"]})).bind(&doc).unwrap();
        let paragraphs = doc.select("p");
        assert_eq!(paragraphs.length(), 2);
        assert_eq!(paragraphs.nodes()[0].text().as_ref(), "a");
        assert_eq!(paragraphs.nodes()[1].text().as_ref(), "b");
    }

    #[test]
    fn test_attribute_carriers_inside_clones_bind_globally() {
        let doc = Document::from(r#"<ul><li value="xs"><b attribute="mark"></b></li></ul>"#);
        let data = json!({
            "xs": ["a", "b"],
            "mark": {"name": "class", "value": "hot"},
        });
        Binder::new(&data).bind(&doc).unwrap();
        let bolds = doc.select("li b");
        assert_eq!(bolds.length(), 2);
        for node in bolds.nodes() {
            assert_eq!(node.attr("class").unwrap().as_ref(), "hot");
        }
    }

    #[test]
    fn test_text_placeholder_substitution() {
        let doc = Document::from(r#"<h1><text value="title"></text></h1>"#);
        Binder::new(&json!({"title": "Welcome"})).bind(&doc).unwrap();
        assert!(doc.select("h1 text").is_empty());
        let span = doc.select("h1 span").nodes().first().unwrap().clone();
        assert_eq!(span.text().as_ref(), "Welcome");
    }

    #[test]
    fn test_empty_textarea_gets_padded() {
        let doc = Document::from("<form><textarea></textarea></form>");
        Binder::new(&json!({})).bind(&doc).unwrap();
        let node = doc.select("textarea").nodes().first().unwrap().clone();
        assert_eq!(node.text().as_ref(), " ");
    }

    #[test]
    fn test_strip_preformatted_pad() {
        assert_eq!(
            strip_preformatted_pad("<textarea> </textarea>".to_string()),
            "<textarea></textarea>"
        );
        assert_eq!(
            strip_preformatted_pad("<textarea>kept text</textarea>".to_string()),
            "<textarea>kept text</textarea>"
        );
    }
}
