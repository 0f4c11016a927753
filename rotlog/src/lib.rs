//! # rotlog
//! Rotating, concurrency-safe structured logger.
//!
//! Records go to `app-<YYYY-MM-DD>.log` in the configured directory. A new file is opened
//! when the day changes, or when the current file reaches `max_file_size`, in which case
//! it is named `app-<YYYY-MM-DD>_<HH-MM-SS>.log`. Old files beyond `max_files` are
//! removed when the logger is built.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! rotlog = "0.1.0"
//! ```
//!
//! ```rust
//! use rotlog::{LoggerConfig, StructuredLogger, fields};
//!
//! let dir = std::env::temp_dir().join("rotlog_doc_usage");
//! let logger = StructuredLogger::new(LoggerConfig::new(&dir)).expect("Unable to create logger");
//! logger.info("Hello, world!", fields! { "attempt" => 1 }).unwrap();
//! logger.close().unwrap();
//! ```
//!
//! ## Multi-threaded logging
//! The logger is `Send + Sync`; share it through an `Arc`.
//! ```rust
//! use std::sync::Arc;
//! use rotlog::{LoggerConfig, StructuredLogger, fields};
//!
//! let dir = std::env::temp_dir().join("rotlog_doc_threads");
//! let logger = Arc::new(StructuredLogger::new(LoggerConfig::new(&dir)).unwrap());
//!
//! let handles: Vec<_> = (0..5).map(|i| {
//!     let logger = Arc::clone(&logger);
//!     std::thread::spawn(move || {
//!         logger.warn("Hello from a worker", fields! { "thread" => i }).unwrap();
//!     })
//! }).collect();
//! for h in handles { h.join().unwrap(); }
//! logger.close().unwrap();
//! ```
//!
//! ## Context fields
//! ```rust
//! use rotlog::{LogFormat, LoggerConfig, StructuredLogger, fields};
//!
//! let dir = std::env::temp_dir().join("rotlog_doc_context");
//! let config = LoggerConfig::new(&dir).with_format(LogFormat::Text);
//! let logger = StructuredLogger::new(config).unwrap();
//!
//! let api = logger.with(fields! { "service" => "api" });
//! // call-site fields win: the record carries service=override req=1
//! api.info("x", fields! { "service" => "override", "req" => "1" }).unwrap();
//! ```
//!
//! ## Configuration from the environment
//! [`LoggerConfig::from_env`] reads `LOG_LEVEL`, `LOG_FORMAT`, `LOG_FILE_PATH`,
//! `LOG_MAX_SIZE` (megabytes), `LOG_MAX_FILES`, `LOG_ENABLE_CONSOLE` and
//! `LOG_CLEANUP_ON_ROTATE`.

mod bridge;
mod context;
mod logger;
mod request;

pub use bridge::{LogBridge, init_log_bridge};
pub use context::ContextLogger;
pub use logger::StructuredLogger;
pub use request::{RequestLog, generate_request_id};
pub use rotlog_core::{
    Clock, FieldValue, Fields, LogError, LogFormat, LogLevel, LoggerConfig, ManualClock,
    SystemClock, cleanup, fields,
};
