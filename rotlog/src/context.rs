use rotlog_core::{Fields, LogError, LogLevel};

use crate::logger::StructuredLogger;

/// A [`StructuredLogger`] view carrying base fields.
///
/// Call-site fields are merged over the base fields, so on a key collision the
/// call site wins. Holds no lock of its own.
#[derive(Clone)]
pub struct ContextLogger<'a> {
    logger: &'a StructuredLogger,
    fields: Fields,
}

impl<'a> ContextLogger<'a> {
    pub(crate) fn new(logger: &'a StructuredLogger, fields: Fields) -> Self {
        Self { logger, fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Nested context; `fields` override this context's base fields.
    pub fn with(&self, fields: impl Into<Fields>) -> ContextLogger<'a> {
        ContextLogger::new(self.logger, self.fields.merged(&fields.into()))
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl Into<Fields>,
    ) -> Result<(), LogError> {
        self.logger
            .log(level, message, self.fields.merged(&fields.into()))
    }

    pub fn debug(&self, message: &str, fields: impl Into<Fields>) -> Result<(), LogError> {
        self.log(LogLevel::Debug, message, fields)
    }

    pub fn info(&self, message: &str, fields: impl Into<Fields>) -> Result<(), LogError> {
        self.log(LogLevel::Info, message, fields)
    }

    pub fn warn(&self, message: &str, fields: impl Into<Fields>) -> Result<(), LogError> {
        self.log(LogLevel::Warn, message, fields)
    }

    pub fn error(&self, message: &str, fields: impl Into<Fields>) -> Result<(), LogError> {
        self.log(LogLevel::Error, message, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotlog_core::{LoggerConfig, fields};
    use serde_json::{Map, Value, json};
    use std::fs;
    use tempfile::TempDir;

    /// Field set of each written record, without time, level and msg.
    fn written_fields(logger: &StructuredLogger) -> Vec<Map<String, Value>> {
        let content = fs::read_to_string(logger.current_file().unwrap()).unwrap();
        content
            .lines()
            .map(|line| {
                let Value::Object(mut record) = serde_json::from_str::<Value>(line).unwrap() else {
                    panic!("record is not an object: {line}");
                };
                for key in ["time", "level", "msg"] {
                    record.remove(key);
                }
                record
            })
            .collect()
    }

    #[test]
    fn test_call_site_fields_win() {
        let tmp = TempDir::new().unwrap();
        let logger = StructuredLogger::new(LoggerConfig::new(tmp.path())).unwrap();

        logger
            .with(fields! { "service" => "api" })
            .info("x", fields! { "service" => "override", "req" => "1" })
            .unwrap();

        let records = written_fields(&logger);
        assert_eq!(records.len(), 1);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({ "service": "override", "req": "1" })
        );
    }

    #[test]
    fn test_base_fields_are_not_mutated() {
        let tmp = TempDir::new().unwrap();
        let logger = StructuredLogger::new(LoggerConfig::new(tmp.path())).unwrap();
        let ctx = logger.with(fields! { "service" => "api" });

        ctx.warn("first", fields! { "service" => "other" }).unwrap();
        ctx.warn("second", ()).unwrap();

        assert_eq!(ctx.fields(), &fields! { "service" => "api" });
        let records = written_fields(&logger);
        assert_eq!(records[0]["service"], "other");
        assert_eq!(records[1]["service"], "api");
    }

    #[test]
    fn test_nested_contexts_merge() {
        let tmp = TempDir::new().unwrap();
        let logger = StructuredLogger::new(LoggerConfig::new(tmp.path())).unwrap();
        let ctx = logger
            .with(fields! { "service" => "api", "region" => "eu" })
            .with(fields! { "region" => "us", "user" => 42 });

        ctx.error("boom", ()).unwrap();

        let records = written_fields(&logger);
        assert_eq!(
            Value::Object(records[0].clone()),
            json!({ "service": "api", "region": "us", "user": 42 })
        );
    }

    #[test]
    fn test_context_respects_level() {
        let tmp = TempDir::new().unwrap();
        let config = LoggerConfig::new(tmp.path()).with_level(LogLevel::Info);
        let logger = StructuredLogger::new(config).unwrap();
        let ctx = logger.with(fields! { "service" => "api" });

        ctx.debug("hidden", ()).unwrap();
        ctx.info("shown", ()).unwrap();

        assert_eq!(written_fields(&logger).len(), 1);
    }
}
