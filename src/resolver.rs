//! Executable resolver – finds which wkhtmltopdf binary answers on this host.

use std::process::Stdio;

use crate::error::{ForgeError, Result};
use crate::process::shell_command;

/// Binaries tried when no explicit path is configured.
pub const DEFAULT_EXECUTABLES: [&str; 3] = ["wkhtmltopdf", "wkhtmltopdf-amd64", "wkhtmltopdf-i386"];

/// Exit code wkhtmltopdf returns for `-v` without any input.
///
/// The probe deliberately looks for 1 and not 0: that is how the renderer
/// reports its version when no pages are given.
pub const VERSION_PROBE_SUCCESS: i32 = 1;

/// Ordered list of candidate executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    candidates: Vec<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLES)
    }
}

impl Resolver {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Return the first candidate whose version probe exits with
    /// [`VERSION_PROBE_SUCCESS`].
    pub fn detect(&self) -> Result<String> {
        for candidate in &self.candidates {
            if probe(candidate) == Some(VERSION_PROBE_SUCCESS) {
                log::info!("Using wkhtmltopdf executable '{candidate}'");
                return Ok(candidate.clone());
            }
        }
        Err(ForgeError::ExecutableNotFound)
    }
}

/// Convenience wrapper around [`Resolver::detect`].
pub fn detect<S: AsRef<str>>(candidates: &[S]) -> Result<String> {
    Resolver::new(candidates.iter().map(|c| c.as_ref().to_string())).detect()
}

/// Run `<candidate> -v` and return its exit code, if it produced one.
fn probe(candidate: &str) -> Option<i32> {
    let status = shell_command(&format!("{candidate} -v"))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => {
            log::debug!("Probe '{candidate} -v' exited with {status}");
            status.code()
        }
        Err(e) => {
            log::debug!("Probe '{candidate} -v' could not start: {e}");
            None
        }
    }
}
