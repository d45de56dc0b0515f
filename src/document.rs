//! Document – global options plus an ordered list of parts, rendered through
//! a single [`Process`].

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::args::Arg;
use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};
use crate::page::{Cover, Page};
use crate::process::Process;
use crate::resolver::Resolver;
use crate::toc::Toc;

/// Anything that contributes objects to the renderer command line.
///
/// The returned fragment must already be shell-escaped; it is appended to
/// the command line as is, after a separating space if it lacks one.
pub trait DocumentPart {
    fn build_shell_args(&self, document: &Document) -> String;
}

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Page margins in millimetres. Unset sides keep the renderer's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

/// Global options applied to the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Title embedded in the PDF metadata.
    pub title: Option<String>,
    pub orientation: Orientation,
    /// Paper size name understood by wkhtmltopdf (default "A4").
    pub page_size: String,
    pub margins: Margins,
    pub dpi: Option<u32>,
    pub grayscale: bool,
    /// Suppress progress output. Keeps stderr small while stdout is read.
    pub quiet: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: None,
            orientation: Orientation::Portrait,
            page_size: "A4".to_string(),
            margins: Margins::default(),
            dpi: None,
            grayscale: false,
            quiet: true,
        }
    }
}

/// A PDF assembled from pages, covers and tables of contents.
pub struct Document {
    pub options: DocumentOptions,
    executable: Option<String>,
    resolver: Resolver,
    parts: Vec<Box<dyn DocumentPart>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            options: DocumentOptions::default(),
            executable: None,
            resolver: Resolver::default(),
            parts: Vec::new(),
        }
    }

    pub fn from_config(config: &ForgeConfig) -> Self {
        Self {
            options: config.document.clone(),
            executable: config.executable.clone(),
            resolver: Resolver::new(config.candidates.iter().cloned()),
            parts: Vec::new(),
        }
    }

    /// Use `executable` instead of auto-detection.
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn add_part(&mut self, part: impl DocumentPart + 'static) -> &mut Self {
        self.parts.push(Box::new(part));
        self
    }

    pub fn add_page(&mut self, src: impl Into<String>) -> &mut Self {
        self.add_part(Page::new(src))
    }

    pub fn add_cover(&mut self, src: impl Into<String>) -> &mut Self {
        self.add_part(Cover::new(src))
    }

    pub fn add_toc(&mut self) -> &mut Self {
        self.add_part(Toc::default())
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Arguments derived from [`DocumentOptions`], in a fixed order.
    pub fn global_args(&self) -> Vec<Arg> {
        let opts = &self.options;
        let mut args = Vec::new();

        if opts.quiet {
            args.push(Arg::flag("-q"));
        }
        if opts.grayscale {
            args.push(Arg::flag("-g"));
        }
        if let Some(title) = &opts.title {
            args.push(Arg::option("--title", title.as_str()));
        }
        args.push(Arg::option("--orientation", opts.orientation.as_str()));
        args.push(Arg::option("--page-size", opts.page_size.as_str()));
        if let Some(dpi) = opts.dpi {
            args.push(Arg::option("--dpi", dpi));
        }

        let margins = [
            ("--margin-top", opts.margins.top),
            ("--margin-right", opts.margins.right),
            ("--margin-bottom", opts.margins.bottom),
            ("--margin-left", opts.margins.left),
        ];
        for (flag, value) in margins {
            if let Some(mm) = value {
                args.push(Arg::option(flag, mm));
            }
        }

        args
    }

    /// Global arguments followed by each part's fragment.
    pub fn shell_args(&self) -> Vec<Arg> {
        let mut args = self.global_args();
        args.extend(self.parts.iter().map(|p| Arg::raw(p.build_shell_args(self))));
        args
    }

    /// Spawn the renderer for this document. The caller must close the
    /// returned process.
    pub fn open(&self) -> Result<Process> {
        if self.parts.is_empty() {
            return Err(ForgeError::EmptyDocument);
        }

        let mut process = match &self.executable {
            Some(exe) => Process::new(Some(exe.clone())),
            None => Process::with_resolver(self.resolver.clone()),
        };
        process.open(&self.shell_args())?;
        Ok(process)
    }

    /// Render the whole PDF into memory.
    pub fn render(&self) -> Result<Vec<u8>> {
        let mut process = self.open()?;
        let output = process.get_output(None);
        process.close()?;
        output
    }

    /// Stream the PDF into `sink`, returning the number of bytes written.
    pub fn send<W: Write + ?Sized>(&self, sink: &mut W) -> Result<u64> {
        let mut process = self.open()?;
        let copied = process.copy_output_to(sink);
        process.close()?;
        copied
    }

    /// Write the PDF to the process's own stdout.
    pub fn print(&self) -> Result<()> {
        let mut process = self.open()?;
        let printed = process.print_output();
        process.close()?;
        printed
    }

    /// Render into the file at `path`.
    ///
    /// Output is staged in a temporary file next to `path` and moved into
    /// place only after the renderer exits successfully, so an existing file
    /// is left untouched on any failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let mut process = self.open()?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staged = NamedTempFile::new_in(dir)
            .map_err(ForgeError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                let written = process.copy_output_to(&mut writer)?;
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                Ok((file, written))
            });
        process.close()?;

        let (file, written) = staged?;
        file.persist(path).map_err(|e| e.error)?;
        log::debug!("Wrote {written} bytes to '{}'", path.display());
        Ok(written)
    }
}
