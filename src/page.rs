//! Page and cover parts – the input objects of a document.

use std::path::PathBuf;

use crate::args::{serialize_args, Arg};
use crate::document::{Document, DocumentPart};

/// A page rendered from a file path or URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub src: String,
    pub zoom: Option<f64>,
    pub print_media_type: bool,
    pub disable_javascript: bool,
    /// Default text encoding for inputs that do not declare one.
    pub encoding: Option<String>,
}

impl Page {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    fn page_args(&self) -> Vec<Arg> {
        let mut args = vec![Arg::positional(self.src.as_str())];
        if let Some(zoom) = self.zoom {
            args.push(Arg::option("--zoom", zoom));
        }
        if self.print_media_type {
            args.push(Arg::flag("--print-media-type"));
        }
        if self.disable_javascript {
            args.push(Arg::flag("--disable-javascript"));
        }
        if let Some(encoding) = &self.encoding {
            args.push(Arg::option("--encoding", encoding.as_str()));
        }
        args
    }
}

impl DocumentPart for Page {
    fn build_shell_args(&self, _document: &Document) -> String {
        format!(" page{}", serialize_args(&self.page_args()))
    }
}

/// A cover page. wkhtmltopdf leaves covers out of the table of contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub src: String,
}

impl Cover {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl DocumentPart for Cover {
    fn build_shell_args(&self, _document: &Document) -> String {
        format!(" cover{}", serialize_args(&[Arg::positional(self.src.as_str())]))
    }
}

/// Output path used when none is given for `src`.
///
/// Local files keep their directory and stem. URLs are saved in the current
/// directory, named after their last path segment (or host). Stdin (`-`)
/// has no sensible default and returns `None`.
pub fn default_output_path(src: &str) -> Option<PathBuf> {
    if src == "-" {
        return None;
    }

    let mut out = match src.split_once("://") {
        Some((_, rest)) => {
            let rest = rest.split(['?', '#']).next().unwrap_or_default();
            let mut segments = rest.split('/').filter(|s| !s.is_empty());
            let host = segments.next()?;
            let name = segments.last().unwrap_or(host);
            PathBuf::from(name)
        }
        None => PathBuf::from(src),
    };
    out.set_extension("pdf");
    Some(out)
}
