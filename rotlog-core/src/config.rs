use std::{fmt, path::PathBuf, str::FromStr};

use derive_from_env::FromEnv;

use crate::{error::LogError, level::LogLevel};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Text => f.write_str("text"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(LogError::InvalidFormat(s.to_string())),
        }
    }
}

/// Configuration for a logger, fixed once the logger is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Root of the log files, created recursively if missing.
    pub directory: PathBuf,
    /// Size in bytes that triggers a same-day rotation. 0 disables it.
    pub max_file_size: u64,
    /// Number of log files retained by cleanup. 0 disables cleanup.
    pub max_files: usize,
    /// Mirror every record to stderr.
    pub enable_console: bool,
    pub format: LogFormat,
    /// Records below this level are dropped.
    pub level: LogLevel,
    /// Queue a retention cleanup after every rotation.
    pub cleanup_on_rotate: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            max_file_size: 0,
            max_files: 0,
            enable_console: false,
            format: LogFormat::Json,
            level: LogLevel::Info,
            cleanup_on_rotate: false,
        }
    }
}

impl LoggerConfig {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    /// Reads `LOG_LEVEL`, `LOG_FORMAT`, `LOG_FILE_PATH`, `LOG_MAX_SIZE` (megabytes),
    /// `LOG_MAX_FILES`, `LOG_ENABLE_CONSOLE` and `LOG_CLEANUP_ON_ROTATE`.
    pub fn from_env() -> Result<Self, LogError> {
        let env = EnvLoggerConfig::from_env().map_err(|e| LogError::Env(format!("{e:?}")))?;
        Self::try_from(env)
    }

    pub fn with_max_file_size(self, bytes: u64) -> Self {
        Self {
            max_file_size: bytes,
            ..self
        }
    }

    pub fn with_max_files(self, count: usize) -> Self {
        Self {
            max_files: count,
            ..self
        }
    }

    /// Dynamically set the console mirroring flag.
    pub fn with_console(self, yes: bool) -> Self {
        Self {
            enable_console: yes,
            ..self
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    pub fn with_level(self, level: LogLevel) -> Self {
        Self { level, ..self }
    }

    pub fn with_cleanup_on_rotate(self, yes: bool) -> Self {
        Self {
            cleanup_on_rotate: yes,
            ..self
        }
    }
}

#[derive(FromEnv)]
#[from_env(prefix = "LOG")]
#[allow(non_snake_case)]
struct EnvLoggerConfig {
    #[from_env(default = "debug")]
    LEVEL: String,
    #[from_env(default = "json")]
    FORMAT: String,
    #[from_env(default = "./logs")]
    FILE_PATH: String,
    #[from_env(default = "100")]
    MAX_SIZE: u64,
    #[from_env(default = "7")]
    MAX_FILES: usize,
    #[from_env(default = "true")]
    ENABLE_CONSOLE: bool,
    #[from_env(default = "false")]
    CLEANUP_ON_ROTATE: bool,
}

impl TryFrom<EnvLoggerConfig> for LoggerConfig {
    type Error = LogError;

    fn try_from(env: EnvLoggerConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            directory: PathBuf::from(env.FILE_PATH),
            max_file_size: env.MAX_SIZE.saturating_mul(BYTES_PER_MB),
            max_files: env.MAX_FILES,
            enable_console: env.ENABLE_CONSOLE,
            format: env.FORMAT.parse()?,
            level: env.LEVEL.parse()?,
            cleanup_on_rotate: env.CLEANUP_ON_ROTATE,
        })
    }
}
