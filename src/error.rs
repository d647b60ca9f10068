//! Error handling for html-weave
//!
//! Structural and configuration problems (a missing partial file, a template
//! root pointing at a remote location, a partial chain that references itself,
//! a path that was expected to drive an expansion but did not resolve to a
//! sequence) are surfaced as explicit [`Error`] values carrying the offending
//! name or path. Data-shape misses are not errors: an unresolved binding path
//! leaves the node as authored, and a malformed `{name, value}` record is
//! skipped, because templates routinely address optional fields.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for template resolution and rendering
#[derive(Error, Debug)]
pub enum Error {
    /// A `<partial template="...">` reference could not be loaded from the
    /// configured root.
    #[error("partial not found: {name} (looked in {})", .path.display())]
    PartialNotFound {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured partial root names a remote location; partials are
    /// loaded from local files only.
    #[error("remote template roots are not supported: {root}")]
    RemoteRootUnsupported { root: String },

    /// A partial directly or indirectly includes itself.
    #[error("partial inclusion cycle detected at: {name}")]
    CycleDetected { name: String },

    /// An expansion was dispatched for a path that did not resolve to a
    /// sequence.
    #[error("expected a sequence at path: {path}")]
    SequenceExpected { path: String },

    /// Data conversion at the `Serialize` API boundary failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn partial_not_found(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::PartialNotFound {
            name: name.into(),
            path: path.into(),
            source,
        }
    }

    pub fn remote_root(root: impl Into<String>) -> Self {
        Error::RemoteRootUnsupported { root: root.into() }
    }

    pub fn cycle(name: impl Into<String>) -> Self {
        Error::CycleDetected { name: name.into() }
    }

    pub fn sequence_expected(path: impl Into<String>) -> Self {
        Error::SequenceExpected { path: path.into() }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
