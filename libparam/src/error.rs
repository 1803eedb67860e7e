//! Error types for PARAM loading and the result helpers.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type for PARAM loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    /// `line` is zero-based.
    pub fn loc_suffix(&self, line: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {} of <{}>", line + 1, name),
            None => format!(" at line {}", line + 1),
        }
    }
}

/// Error type for loading a PARAM file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A parameter declared `int` whose value is not an integer literal.
    #[error("Invalid int value \"{value}\" for parameter '{name}'{location}")]
    InvalidInt {
        name: String,
        value: String,
        location: String,
    },

    /// A parameter declared `float` whose value is not a float literal.
    #[error("Invalid float value \"{value}\" for parameter '{name}'{location}")]
    InvalidFloat {
        name: String,
        value: String,
        location: String,
    },
}

/// Error type for the result, file and command helpers.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Filesystem operation failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A command could not be started.
    #[error("Cannot run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A command ran but exited unsuccessfully.
    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    /// Result document could not be serialized.
    #[error("Cannot encode results: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkspaceError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| WorkspaceError::Io { path, source }
    }
}
