//! Thin wrapper around the `ffmpeg` command-line tool.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{RenderError, Result};

/// Handle to an ffmpeg binary
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Ffmpeg {
    pub fn new<P: Into<PathBuf>>(binary: P) -> Self {
        Self { binary: binary.into() }
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Fail early with [`RenderError::FfmpegMissing`] if ffmpeg cannot run
    pub fn require(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RenderError::FfmpegMissing.into())
        }
    }

    /// Run ffmpeg to completion
    ///
    /// On failure the error string carries ffmpeg's stderr.
    pub fn run<I, S>(&self, args: I) -> std::result::Result<(), String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).stdin(Stdio::null());
        debug!("Running {:?}", cmd);

        let output = cmd
            .output()
            .map_err(|e| format!("failed to start {}: {}", self.binary.display(), e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("ffmpeg exited with {}: {}", output.status, stderr.trim()))
        }
    }
}

/// Quote a value for use as a filter option inside a filter graph
///
/// Escapes once for the option parser and once for the graph parser, so
/// colons, commas and quotes survive both.
pub fn quote_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        if matches!(c, '\\' | ':' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("'{}'", escaped.replace('\'', "'\\''"))
}

/// Seconds formatted the way ffmpeg expects on the command line
pub fn seconds(value: f64) -> String {
    let formatted = format!("{:.6}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
