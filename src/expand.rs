//! Array expansion: replicating directive-bound nodes for sequence data
//!
//! When a value directive resolves to a sequence, the bound node becomes a
//! per-element template: one deep clone is inserted for every sequence
//! element, immediately preceding the node, in sequence order. Inside each
//! clone, `local-value` and `local-attribute` directives resolve against that
//! clone's sequence element rather than the full data context. A sequence
//! element that is itself a sequence (or whose local path resolves to one)
//! recurses, so nesting depth is bounded only by the data.
//!
//! Cloning is serialize-and-reparse: the node's outer HTML is parsed into a
//! scratch document, bound there, and the bound fragments plus the original
//! (tagged for the deferred-removal sweep) are spliced back in one structural
//! substitution. Nothing is excised mid-pass.

use dom_query::{Document, Node, Selection};
use serde_json::Value;

use crate::directives::{
    apply_attribute_directive, mark_for_removal, substitute_text_element, LOCAL_ATTRIBUTE,
    LOCAL_VALUE, TEXT_ELEMENT, VALUE,
};
use crate::error::{Error, Result};
use crate::node_ext::NodeExt;
use crate::path::resolve;
use crate::utils::serialize_document;
use crate::value::Resolved;

/// Insert one bound sibling clone of `node` per element of the driving
/// sequence, immediately preceding `node`, preserving sequence order. The
/// node itself stays in position tagged for the deferred-removal sweep.
///
/// The driving sequence is `scope` itself when `scope` is an array (nested
/// dispatch), otherwise the node's `local-value` or `value` path re-resolved
/// against `scope`, which must yield a sequence.
pub fn expand(node: &Node, scope: &Value) -> Result<()> {
    let items = sequence_items(node, scope)?;
    if node.parent().is_none() {
        return Ok(());
    }

    let template_html = node.html();
    let mut rendered = String::with_capacity(template_html.len() * (items.len() + 1));
    for item in items {
        rendered.push_str(&render_clone(&template_html, item)?);
    }

    mark_for_removal(node);
    rendered.push_str(&node.html());
    node.replace_with_markup(rendered);
    Ok(())
}

fn sequence_items<'a>(node: &Node, scope: &'a Value) -> Result<&'a [Value]> {
    if let Value::Array(items) = scope {
        return Ok(items);
    }
    let path = node
        .attr(LOCAL_VALUE)
        .or_else(|| node.attr(VALUE))
        .unwrap_or_default();
    match resolve(scope, &path) {
        Resolved::Sequence(items) => Ok(items),
        _ => Err(Error::sequence_expected(path.to_string())),
    }
}

/// Bind one clone of the serialized template against one sequence element and
/// return its serialized form.
fn render_clone(template_html: &str, item: &Value) -> Result<String> {
    let fragment = Document::from(template_html);
    let clone = match first_parsed_root(&fragment) {
        Some(root) => root,
        // The fragment parser refused the markup (detached table parts and
        // the like); contribute nothing rather than corrupt the tree.
        None => return Ok(String::new()),
    };

    // Both carrier sets are snapshotted before any nested expansion splices
    // new nodes into the fragment; late arrivals belong to inner scopes that
    // already bound them.
    let locals = descendants(&clone, &format!("[{}]", LOCAL_VALUE));
    let attribute_carriers = descendants(&clone, &format!("[{}]", LOCAL_ATTRIBUTE));

    for local in &locals {
        bind_local_value(local, item)?;
    }

    // A nested expansion's clone carries the directive on its own root.
    if clone.has_attr(LOCAL_VALUE) {
        bind_local_value(&clone, item)?;
    }

    // Sequence elements double as bare scalars or reusable {name, value}
    // records; either way the text lands on the clone itself.
    match Resolved::classify(item) {
        Resolved::Scalar(text) => clone.append_text(&text),
        Resolved::Record(record) => {
            if let Some(value) = record.value.as_deref() {
                clone.append_text(value);
            }
        }
        _ => {}
    }

    for carrier in &attribute_carriers {
        if let Some(paths) = carrier.attr(LOCAL_ATTRIBUTE) {
            apply_attribute_directive(carrier, &paths, item);
        }
    }
    if let Some(paths) = clone.attr(LOCAL_ATTRIBUTE) {
        apply_attribute_directive(&clone, &paths, item);
    }

    // Plain-text placeholders go last so they never clobber structure the
    // steps above produced.
    for text in descendants(&clone, &format!("{}[{}]", TEXT_ELEMENT, LOCAL_VALUE)) {
        if let Some(path) = text.attr(LOCAL_VALUE) {
            substitute_text_element(&text, resolve(item, &path));
        }
    }

    // A deeper expansion may have replaced the root handle in place, so
    // serialize from the fragment rather than the handle.
    Ok(serialize_document(&fragment, false))
}

/// Apply the local-value rule to one carrier against one sequence element.
fn bind_local_value(node: &Node, item: &Value) -> Result<()> {
    // A sequence element that is itself a sequence replicates the carrier
    // once per inner element.
    if item.is_array() {
        return expand(node, item);
    }
    let Some(path) = node.attr(LOCAL_VALUE) else {
        return Ok(());
    };
    match resolve(item, &path) {
        Resolved::Sequence(_) => expand(node, item),
        Resolved::Remove => {
            mark_for_removal(node);
            Ok(())
        }
        Resolved::Scalar(text) => {
            node.append_text(&text);
            Ok(())
        }
        Resolved::Absent | Resolved::Record(_) => Ok(()),
    }
}

fn first_parsed_root<'a>(fragment: &'a Document) -> Option<Node<'a>> {
    for container in ["body > *", "head > *"] {
        if let Some(root) = fragment.select(container).nodes().first() {
            return Some(root.clone());
        }
    }
    None
}

fn descendants<'a>(node: &Node<'a>, selector: &str) -> Vec<Node<'a>> {
    Selection::from(node.clone()).select(selector).nodes().to_vec()
}
