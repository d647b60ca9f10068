//! Partial template resolution
//!
//! Templates reference separately stored fragments with placeholder elements:
//!
//! ```html
//! <partial template="header.html"></partial>
//! ```
//!
//! [`PartialResolver`] finds placeholders in document order, loads each
//! referenced file from the configured root, resolves partials *within* that
//! file first (unbounded nesting, depth-first), and substitutes the fully
//! resolved text in place of the placeholder. The placeholder element itself
//! is removed from the tree, so the serialized result is partial-free even
//! when the authored text and its parsed form disagree on whitespace.
//!
//! Resolution is deterministic, so results are cached process-wide keyed on
//! the exact source text. The cache is an explicit collaborator rather than a
//! hidden singleton: library users share [`global_partial_cache`] by default,
//! tests construct private caches and [`reset`](PartialCache::reset) them.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use dom_query::{Document, Node};
use once_cell::sync::Lazy;

use crate::directives::{PARTIAL_ELEMENT, TEMPLATE};
use crate::error::{Error, Result};
use crate::node_ext::NodeExt;
use crate::utils::{looks_like_document, serialize_document};

/// Append-only cache of resolved partial text, keyed by exact source text
///
/// Entries live until process exit or an explicit [`reset`](PartialCache::reset).
/// Concurrent renders may race to repopulate a key; resolution is idempotent,
/// so whichever write lands first is kept and the result is the same.
pub struct PartialCache {
    entries: RwLock<HashMap<String, String>>,
}

impl PartialCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the resolved form of a source text.
    pub fn get(&self, source: &str) -> Option<String> {
        if let Ok(entries) = self.entries.read() {
            entries.get(source).cloned()
        } else {
            None
        }
    }

    /// Record a resolution. The first write for a key wins.
    pub fn insert(&self, source: &str, resolved: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries
                .entry(source.to_string())
                .or_insert_with(|| resolved.to_string());
        }
    }

    /// Drop every entry. Intended for tests and long-lived processes that
    /// reload templates from disk.
    pub fn reset(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PartialCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_PARTIAL_CACHE: Lazy<Arc<PartialCache>> =
    Lazy::new(|| Arc::new(PartialCache::new()));

/// The process-wide cache shared by engines that were not given their own.
pub fn global_partial_cache() -> Arc<PartialCache> {
    Arc::clone(&GLOBAL_PARTIAL_CACHE)
}

/// Recursively inlines `<partial>` placeholders from a local template root
pub struct PartialResolver {
    root: String,
    cache: Arc<PartialCache>,
}

impl PartialResolver {
    pub fn new(root: impl Into<String>, cache: Arc<PartialCache>) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    /// Resolve every partial reference in `template`, recursively.
    ///
    /// A template without placeholders is returned byte-identical. Templates
    /// that required substitution come back in serialized form and are cached
    /// under their original text.
    pub fn resolve(&self, template: &str) -> Result<String> {
        let mut chain = Vec::new();
        self.resolve_chain(template, &mut chain)
    }

    fn resolve_chain(&self, text: &str, chain: &mut Vec<String>) -> Result<String> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit);
        }

        let doc = Document::from(text);
        let placeholders: Vec<Node> = doc.select(PARTIAL_ELEMENT).nodes().to_vec();
        if placeholders.is_empty() {
            return Ok(text.to_string());
        }

        if self.root.contains("://") {
            return Err(Error::remote_root(self.root.as_str()));
        }

        for placeholder in &placeholders {
            let name = placeholder
                .attr(TEMPLATE)
                .map(|name| name.to_string())
                .unwrap_or_default();

            if chain.iter().any(|inlining| *inlining == name) {
                return Err(Error::cycle(name));
            }

            let path = Path::new(&self.root).join(&name);
            let source = fs::read_to_string(&path)
                .map_err(|err| Error::partial_not_found(name.clone(), path.clone(), err))?;

            // A partial's own partials must be fully resolved before it is
            // substituted into its parent.
            chain.push(name);
            let inlined = self.resolve_chain(&source, chain)?;
            chain.pop();

            placeholder.replace_with_markup(inlined);
        }

        let resolved = serialize_document(&doc, looks_like_document(text));
        self.cache.insert(text, &resolved);
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip() {
        let cache = PartialCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("<p></p>"), None);

        cache.insert("<p></p>", "<p>resolved</p>");
        assert_eq!(cache.get("<p></p>").as_deref(), Some("<p>resolved</p>"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_first_write_wins() {
        let cache = PartialCache::new();
        cache.insert("key", "first");
        cache.insert("key", "second");
        assert_eq!(cache.get("key").as_deref(), Some("first"));
    }

    #[test]
    fn test_cache_reset() {
        let cache = PartialCache::new();
        cache.insert("key", "value");
        cache.reset();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_global_cache_is_shared() {
        let a = global_partial_cache();
        let b = global_partial_cache();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_partial_free_template_is_untouched() {
        let resolver = PartialResolver::new("./nowhere", Arc::new(PartialCache::new()));
        let template = "  <div>\n  <p>as authored</p>\n</div>";
        assert_eq!(resolver.resolve(template).unwrap(), template);
    }

    #[test]
    fn test_remote_root_is_rejected() {
        let resolver =
            PartialResolver::new("https://example.com/tmpl", Arc::new(PartialCache::new()));
        let err = resolver
            .resolve(r#"<partial template="header.html"></partial>"#)
            .unwrap_err();
        assert!(matches!(err, Error::RemoteRootUnsupported { .. }));
    }
}
