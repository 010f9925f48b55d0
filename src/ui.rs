//! Status output for layer contributions
//!
//! The logger is an injected collaborator, never a process-wide singleton.
//! It renders exactly two kinds of status line per contribution ("Reusing
//! cached layer" / "Contributing to layer") and falls back to plain text
//! when colors are unavailable.

use console::style;
use std::fmt;
use std::io::{self, Write};

/// Status sink for human-readable contribution reporting
pub struct Logger {
    out: Option<Box<dyn Write + Send>>,
}

impl Logger {
    /// Create a logger writing to the given sink
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Some(Box::new(out)),
        }
    }

    /// Create a logger writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Create a logger that discards all output
    pub fn silent() -> Self {
        Self { out: None }
    }

    /// Write a header line
    ///
    /// Write failures are ignored; status output never fails a contribution.
    pub fn header(&mut self, message: impl fmt::Display) {
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "{}", message).ok();
        }
    }

    /// Report a cache hit for the named contribution
    pub fn reusing(&mut self, name: &str) {
        self.header(format!(
            "{}: {} cached layer",
            style(name).blue(),
            style("Reusing").green()
        ));
    }

    /// Report a cache miss for the named contribution
    pub fn contributing(&mut self, name: &str) {
        self.header(format!(
            "{}: {} to layer",
            style(name).blue(),
            style("Contributing").yellow()
        ));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("silent", &self.out.is_none())
            .finish()
    }
}
