use std::borrow::Cow;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    config::LogFormat,
    fields::{FieldValue, Fields},
    level::LogLevel,
};

/// One log entry, rendered once and discarded.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: &'a str,
    pub fields: &'a Fields,
}

impl<'a> LogRecord<'a> {
    pub fn new(time: DateTime<Local>, level: LogLevel, message: &'a str, fields: &'a Fields) -> Self {
        Self {
            time,
            level,
            message,
            fields,
        }
    }

    /// Wire timestamp: RFC 3339, second precision, numeric offset.
    pub fn timestamp(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    /// Renders the record as a single newline-terminated line.
    pub fn render(&self, format: LogFormat) -> String {
        let mut line = match format {
            LogFormat::Json => self.to_json(),
            LogFormat::Text => self.to_text(),
        };
        line.push('\n');
        line
    }

    fn to_json(&self) -> String {
        // Serializing strings, numbers and bools into a String cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    fn to_text(&self) -> String {
        let mut line = format!(
            "time={} level={} msg={}",
            self.timestamp(),
            self.level,
            quote_text(self.message)
        );
        for (key, value) in self.fields.iter() {
            let value = match value {
                FieldValue::Str(s) => quote_text(s),
                other => other.to_string(),
            };
            line.push(' ');
            line.push_str(&quote_text(&field_key(key)));
            line.push('=');
            line.push_str(&value);
        }
        line
    }
}

impl Serialize for LogRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3 + self.fields.len()))?;
        map.serialize_entry("time", &self.timestamp())?;
        map.serialize_entry("level", self.level.as_str())?;
        map.serialize_entry("msg", self.message)?;
        for (key, value) in self.fields.iter() {
            map.serialize_entry(&field_key(key), value)?;
        }
        map.end()
    }
}

/// Header keys written by every record.
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// Field keys that would shadow a header key get a `fields.` prefix.
fn field_key(key: &str) -> Cow<'_, str> {
    if RESERVED_KEYS.contains(&key) {
        Cow::Owned(format!("fields.{key}"))
    } else {
        Cow::Borrowed(key)
    }
}

fn quote_text(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"');
    if needs_quotes {
        serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 12, 30, 5).unwrap()
    }

    #[test]
    fn test_json_keeps_field_order() {
        let fields = fields! { "service" => "api", "status" => 200, "ok" => true };
        let line = LogRecord::new(at_noon(), LogLevel::Info, "hello", &fields).render(LogFormat::Json);
        assert!(line.ends_with('\n'));
        let prefix = format!(
            r#"{{"time":"{}","level":"INFO","msg":"hello","service":"api","status":200,"ok":true}}"#,
            at_noon().to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        assert_eq!(line.trim_end(), prefix);
    }

    #[test]
    fn test_text_quotes_when_needed() {
        let fields = fields! { "path" => "/users", "agent" => "curl 8.0", "empty" => "", "n" => 1.5 };
        let line = LogRecord::new(at_noon(), LogLevel::Warn, "GET /users - 404", &fields)
            .render(LogFormat::Text);
        let expected = format!(
            "time={} level=WARN msg=\"GET /users - 404\" path=/users agent=\"curl 8.0\" empty=\"\" n=1.5\n",
            at_noon().to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn test_text_escapes_newlines() {
        let fields = Fields::new();
        let line = LogRecord::new(at_noon(), LogLevel::Error, "line1\nline2", &fields)
            .render(LogFormat::Text);
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains(r#"msg="line1\nline2""#));
    }

    #[test]
    fn test_header_named_fields_are_prefixed() {
        let fields = fields! { "msg" => "shadow", "level" => 3, "user" => "bob" };
        let record = LogRecord::new(at_noon(), LogLevel::Info, "real", &fields);

        let json = record.render(LogFormat::Json);
        let value: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(value.len(), 6);
        assert_eq!(value["msg"], "real");
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields.msg"], "shadow");
        assert_eq!(value["fields.level"], 3);
        assert_eq!(json.matches(r#""msg":"#).count(), 1);

        let text = record.render(LogFormat::Text);
        assert!(text.ends_with("msg=real fields.msg=shadow fields.level=3 user=bob\n"));
    }

    #[test]
    fn test_timestamp_has_second_precision() {
        let fields = Fields::new();
        let record = LogRecord::new(at_noon(), LogLevel::Debug, "x", &fields);
        let ts = record.timestamp();
        assert!(ts.starts_with("2024-03-09T12:30:05"));
        assert!(!ts.contains('.'));
    }
}
