//! The public rendering facade
//!
//! [`TemplateEngine`] wires the pipeline together: partial resolution over the
//! raw text, parsing, the binding pass (with array expansion), and
//! serialization back to text. One call to [`render`](TemplateEngine::render)
//! is one render: the parsed tree is exclusively owned by that call and
//! discarded afterwards; only the partial cache is shared across renders.

use std::sync::Arc;

use dom_query::Document;
use serde::Serialize;
use serde_json::Value;

use crate::binder::{strip_preformatted_pad, Binder};
use crate::error::Result;
use crate::partials::{global_partial_cache, PartialCache, PartialResolver};
use crate::utils::{looks_like_document, serialize_document};

/// Engine configuration
///
/// ```rust,ignore
/// let config = EngineConfig::default().with_partial_root("./templates");
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory that `<partial template="...">` references resolve under.
    /// No implicit extension is added to referenced names.
    pub partial_root: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            partial_root: "./public/html".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_partial_root(mut self, root: impl Into<String>) -> Self {
        self.partial_root = root.into();
        self
    }
}

/// Renders directive-annotated templates against JSON-shaped data
pub struct TemplateEngine {
    partials: PartialResolver,
}

impl TemplateEngine {
    /// Create an engine sharing the process-wide partial cache.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_cache(config, global_partial_cache())
    }

    /// Create an engine with its own partial cache.
    pub fn with_cache(config: EngineConfig, cache: Arc<PartialCache>) -> Self {
        Self {
            partials: PartialResolver::new(config.partial_root, cache),
        }
    }

    /// Render a template against any serializable data value.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        self.render_value(template, &value)
    }

    /// Render a template against an already-built JSON value.
    ///
    /// The input may be a full document (`<html>…`) or a fragment; fragments
    /// serialize back without the parser's synthetic wrappers. A leading
    /// doctype is the caller's responsibility.
    pub fn render_value(&self, template: &str, data: &Value) -> Result<String> {
        let full_document = looks_like_document(template);
        let resolved = self.partials.resolve(template)?;
        let doc = Document::from(resolved.trim());
        Binder::new(data).bind(&doc)?;
        let html = serialize_document(&doc, full_document);
        Ok(strip_preformatted_pad(html))
    }

    /// Resolve partial references only, without binding.
    pub fn resolve_partials(&self, template: &str) -> Result<String> {
        self.partials.resolve(template)
    }
}
