//! Table of contents part.

use crate::args::escape_shell_arg;
use crate::document::{Document, DocumentPart};

/// A generated table of contents inserted at its position in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Toc {
    pub header: String,
    /// Factor applied to the text size of each deeper heading level.
    pub headers_size_shrink: f64,
    /// CSS length used to indent each level.
    pub indentation_level: String,
}

impl Default for Toc {
    fn default() -> Self {
        Self {
            header: "Table of contents".to_string(),
            headers_size_shrink: 0.9,
            indentation_level: "1em".to_string(),
        }
    }
}

impl DocumentPart for Toc {
    fn build_shell_args(&self, _document: &Document) -> String {
        format!(
            " toc --toc-header-text {} --toc-level-indentation {} --toc-text-size-shrink {:.4}",
            escape_shell_arg(&self.header),
            escape_shell_arg(&self.indentation_level),
            self.headers_size_shrink
        )
    }
}
