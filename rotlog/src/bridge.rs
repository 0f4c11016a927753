use std::sync::Arc;

use log::{Log, Metadata, Record, SetLoggerError};
use rotlog_core::{Fields, LogLevel, report};

use crate::logger::StructuredLogger;

/// Routes `log` macros (`log::info!` and friends) into a [`StructuredLogger`].
///
/// The record target is kept as a `target` field. `Trace` is written as `DEBUG`.
pub struct LogBridge {
    logger: Arc<StructuredLogger>,
}

impl LogBridge {
    pub fn new(logger: Arc<StructuredLogger>) -> Self {
        Self { logger }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        LogLevel::from(metadata.level()) >= self.logger.config().level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let fields = Fields::new().with("target", record.target());
        if let Err(e) = self
            .logger
            .log(record.level().into(), &record.args().to_string(), fields)
        {
            report(LogLevel::Error, &format!("failed to write log record: {e}"));
        }
    }

    fn flush(&self) {}
}

/// Installs a [`LogBridge`] as the process-wide `log` backend.
///
/// Fails if another `log` backend is already installed.
pub fn init_log_bridge(logger: Arc<StructuredLogger>) -> Result<(), SetLoggerError> {
    let level = logger.config().level.to_level_filter();
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotlog_core::LoggerConfig;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bridge_writes_records() {
        let tmp = TempDir::new().unwrap();
        let config = LoggerConfig::new(tmp.path()).with_level(LogLevel::Info);
        let logger = Arc::new(StructuredLogger::new(config).unwrap());
        let bridge = LogBridge::new(Arc::clone(&logger));

        bridge.log(
            &Record::builder()
                .args(format_args!("hello {}", 42))
                .level(log::Level::Warn)
                .target("app::db")
                .build(),
        );
        bridge.log(
            &Record::builder()
                .args(format_args!("too chatty"))
                .level(log::Level::Trace)
                .target("app::db")
                .build(),
        );

        let content = fs::read_to_string(logger.current_file().unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        let record: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["level"], "WARN");
        assert_eq!(record["msg"], "hello 42");
        assert_eq!(record["target"], "app::db");
    }

    #[test]
    fn test_bridge_enabled_follows_config() {
        let tmp = TempDir::new().unwrap();
        let config = LoggerConfig::new(tmp.path()).with_level(LogLevel::Debug);
        let bridge = LogBridge::new(Arc::new(StructuredLogger::new(config).unwrap()));
        let trace = Metadata::builder().level(log::Level::Trace).build();
        let error = Metadata::builder().level(log::Level::Error).build();
        assert!(bridge.enabled(&trace));
        assert!(bridge.enabled(&error));
    }
}
