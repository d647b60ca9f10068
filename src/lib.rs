//! Declarative HTML templating using directive attributes
//!
//! This crate binds JSON-shaped data to HTML templates annotated with a small,
//! fixed directive vocabulary. Elements carrying a `value` attribute receive
//! data looked up by dotted path; sequence-valued data replicates the bound
//! element once per entry; `attribute` directives synthesize or extend markup
//! attributes from `{name, value}` records; and `<partial template="...">`
//! placeholders inline separately stored template fragments before binding.
//!
//! # Examples
//!
//! ```rust,ignore
//! use html_weave::{EngineConfig, TemplateEngine};
//! use serde_json::json;
//!
//! # fn example() -> html_weave::Result<()> {
//! let engine = TemplateEngine::new(EngineConfig::default());
//!
//! let html = engine.render(
//!     r#"<ul><li value="vehicles"><span local-value="type"></span></li></ul>"#,
//!     &json!({ "vehicles": [ { "type": "car" }, { "type": "bicycle" } ] }),
//! )?;
//!
//! assert!(html.contains("car"));
//! assert!(html.contains("bicycle"));
//! # Ok(())
//! # }
//! ```
//!
//! Directive attributes are left intact in the output, so a rendered document
//! remains a valid template. A leading doctype is the caller's responsibility:
//! strip it before rendering, reattach it after.

pub mod binder;
pub mod directives;
pub mod engine;
pub mod error;
pub mod expand;
pub mod node_ext;
pub mod partials;
pub mod path;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use engine::{EngineConfig, TemplateEngine};
pub use error::{Error, Result};
pub use partials::{global_partial_cache, PartialCache, PartialResolver};
pub use path::{resolve, resolve_path};
pub use value::{AttributeRecord, Resolved};
