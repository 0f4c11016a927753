use chrono::Utc;
use colored::Colorize;

use crate::level::LogLevel;

/// Formats a line for the out-of-band diagnostic channel (stderr).
pub fn format_diagnostic(message: &str, level: LogLevel) -> String {
    let time = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f");
    let level = match level {
        LogLevel::Error => "ERROR".red(),
        LogLevel::Warn => "WARN".yellow(),
        LogLevel::Info => "INFO".green(),
        LogLevel::Debug => "DEBUG".blue(),
    };
    format!("[{time} rotlog {level}] {message}")
}

/// Reports a problem the logger swallows instead of returning, such as a failed cleanup.
pub fn report(level: LogLevel, message: &str) {
    eprintln!("{}", format_diagnostic(message, level));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_diagnostic() {
        colored::control::set_override(false);
        let line = format_diagnostic("failed to remove /tmp/x.log", LogLevel::Warn);
        assert!(line.starts_with('['));
        assert!(line.ends_with("rotlog WARN] failed to remove /tmp/x.log"));
    }
}
