use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by the logger and its building blocks.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log directory could not be created. Fatal at construction.
    #[error("failed to create log directory {}: {source}", path.display())]
    Directory { path: PathBuf, source: io::Error },

    #[error("failed to open log file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to write log record to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to mirror log record to stderr: {0}")]
    Console(#[source] io::Error),

    #[error("failed to close log file {}: {source}", path.display())]
    Close { path: PathBuf, source: io::Error },

    /// The logger was used after `close`.
    #[error("logger is closed")]
    Closed,

    /// A writer panicked while holding the sink lock.
    #[error("logger lock poisoned")]
    Poisoned,

    #[error("invalid log level {0:?}, expected one of debug, info, warn, error")]
    InvalidLevel(String),

    #[error("invalid log format {0:?}, expected json or text")]
    InvalidFormat(String),

    #[error("unable to read logger configuration from environment: {0}")]
    Env(String),
}
