//! Process wrapper – spawns the renderer and owns its pipes until close.
//!
//! A [`Process`] holds at most one running child. [`Process::open`] builds the
//! command line and spawns it through the shell with stdout and stderr
//! piped; the read methods consume stdout/stderr; [`Process::close`] drains
//! everything, reaps the child and turns a non-zero exit into
//! [`ForgeError::ProcessFailed`].

use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};

use crate::args::{command_line, Arg};
use crate::error::{ForgeError, Result};
use crate::resolver::Resolver;

/// Build a [`Command`] that runs `line` through the platform shell.
pub(crate) fn shell_command(line: &str) -> Command {
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

/// The live child together with its pipes and the command that started it.
struct Running {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr: ChildStderr,
    command: String,
}

impl Running {
    fn spawn(command: String) -> Result<Self> {
        log::debug!("Executing: {command}");
        let mut child = shell_command(&command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            reap(&mut child);
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "child pipes not captured").into());
        };

        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            stderr,
            command,
        })
    }

    /// Drain both pipes, wait for exit and report the status.
    fn finish(mut self) -> Result<()> {
        // stdout first, so a child blocked on a full pipe can run to exit.
        let drained = io::copy(&mut self.stdout, &mut io::sink());
        let mut stderr = Vec::new();
        let read = self.stderr.read_to_end(&mut stderr);
        let status = self.child.wait()?;
        drained?;
        read?;

        if status.success() {
            return Ok(());
        }

        log::warn!("'{}' exited with {status}", self.command);
        Err(ForgeError::ProcessFailed {
            command: self.command,
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Wrapper around one wkhtmltopdf invocation at a time.
///
/// When no executable is given, the [`Resolver`] is consulted on the first
/// [`open`](Process::open) and its answer is kept for later opens.
#[derive(Default)]
pub struct Process {
    executable: Option<String>,
    resolver: Resolver,
    running: Option<Running>,
}

impl Process {
    pub fn new(executable: Option<String>) -> Self {
        Self {
            executable,
            resolver: Resolver::default(),
            running: None,
        }
    }

    /// Auto-detect the executable among the resolver's candidates.
    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            executable: None,
            resolver,
            running: None,
        }
    }

    /// The configured or resolved executable, if known yet.
    pub fn executable(&self) -> Option<&str> {
        self.executable.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.running.is_some()
    }

    /// Command line of the running child.
    pub fn executed_command(&self) -> Option<&str> {
        self.running.as_ref().map(|r| r.command.as_str())
    }

    /// Spawn the renderer with `args`, writing the PDF to stdout.
    pub fn open(&mut self, args: &[Arg]) -> Result<()> {
        if self.running.is_some() {
            return Err(ForgeError::AlreadyOpen);
        }

        let executable = match &self.executable {
            Some(exe) => exe.clone(),
            None => {
                let exe = self.resolver.detect()?;
                self.executable = Some(exe.clone());
                exe
            }
        };

        self.running = Some(Running::spawn(command_line(&executable, args))?);
        Ok(())
    }

    /// Copy the remaining stdout to this process's own stdout.
    pub fn print_output(&mut self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.copy_output_to(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Read from stdout.
    ///
    /// With `Some(length)`, returns at most one line (newline included) of at
    /// most `length` bytes. With `None`, returns everything up to EOF. Both
    /// return an empty buffer once stdout is exhausted.
    pub fn get_output(&mut self, length: Option<usize>) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let Some(running) = self.running.as_mut() else {
            return Ok(buf);
        };

        match length {
            Some(limit) => {
                (&mut running.stdout)
                    .take(limit as u64)
                    .read_until(b'\n', &mut buf)?;
            }
            None => {
                running.stdout.read_to_end(&mut buf)?;
            }
        }
        Ok(buf)
    }

    /// Stream the remaining stdout into `sink`, returning the bytes copied.
    pub fn copy_output_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64> {
        match self.running.as_mut() {
            Some(running) => Ok(io::copy(&mut running.stdout, sink)?),
            None => Ok(0),
        }
    }

    /// Read the remaining stderr.
    pub fn get_error_output(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        if let Some(running) = self.running.as_mut() {
            running.stderr.read_to_end(&mut buf)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Wait for the child to exit.
    ///
    /// The child and its pipes are released before any error is returned.
    /// Closing a wrapper that is not open does nothing.
    pub fn close(&mut self) -> Result<()> {
        match self.running.take() {
            Some(running) => running.finish(),
            None => Ok(()),
        }
    }
}

impl Drop for Process {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            log::warn!("Killing unclosed wkhtmltopdf process: {}", running.command);
            reap(&mut running.child);
        }
    }
}
