//! # rotlog-core
//! Core building blocks for rotlog - rotation policy, sinks, retention and record encoding.

mod clock;
mod config;
mod diagnostics;
mod error;
mod fields;
mod level;
mod record;
mod retention;
mod rotation;
mod sink;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LogFormat, LoggerConfig};
pub use diagnostics::{format_diagnostic, report};
pub use error::LogError;
pub use fields::{FieldValue, Fields};
pub use level::LogLevel;
pub use record::LogRecord;
pub use retention::{Retention, RetentionWorker, cleanup};
pub use rotation::{
    FILE_PREFIX, LOG_EXTENSION, Rotation, RotationPolicy, SinkState, daily_file_name,
    sized_file_name,
};
pub use sink::Sink;
