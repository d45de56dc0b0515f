//! Error type shared by the resolver, the process wrapper and documents.

use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ForgeError>;

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// No candidate answered the version probe.
    #[error("Please specify path to the wkhtmltopdf binary, it couldn't be autodetected")]
    ExecutableNotFound,

    /// The renderer exited with a non-zero status.
    #[error("{command}\n\n{stderr}")]
    ProcessFailed { command: String, stderr: String },

    #[error("a wkhtmltopdf process is already running for this wrapper")]
    AlreadyOpen,

    #[error("document has no pages to render")]
    EmptyDocument,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
