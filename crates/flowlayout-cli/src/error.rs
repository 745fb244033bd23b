//! Error type for the Flowlayout CLI.

use std::io;

use thiserror::Error;

use flowlayout::LayoutError;

use crate::config::ConfigError;

/// Everything that can stop a CLI run.
///
/// `Json` keeps the raw input next to the parser error so the graph file
/// can be shown with the failing position highlighted.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid graph file `{path}`: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl CliError {
    /// Create a new `Json` error with the associated file contents.
    pub fn new_json_error(
        path: impl Into<String>,
        source: serde_json::Error,
        src: impl Into<String>,
    ) -> Self {
        Self::Json {
            path: path.into(),
            source,
            src: src.into(),
        }
    }
}
