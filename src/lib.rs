//! # wkhtml-forge – wkhtmltopdf subprocess wrapper
//!
//! This crate drives an external `wkhtmltopdf` binary. The pieces are:
//!
//! 1. **Resolve** – find an invocable renderer among candidates ([`resolver`])
//! 2. **Arguments** – tagged arguments and shell escaping ([`args`])
//! 3. **Process** – spawn, read stdout/stderr, close and check exit ([`process`])
//! 4. **Document** – global options plus pages, covers and TOCs ([`document`])
//!
//! Configuration is plain JSON via [`config`].

pub mod args;
pub mod config;
pub mod document;
pub mod error;
pub mod page;
pub mod process;
pub mod resolver;
pub mod toc;

// Re-exports for convenience
pub use args::{Arg, ArgValue};
pub use config::ForgeConfig;
pub use document::{Document, DocumentOptions, DocumentPart, Orientation};
pub use error::{ForgeError, Result};
pub use process::Process;
pub use resolver::Resolver;
