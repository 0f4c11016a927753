use std::{
    path::PathBuf,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, Local};
use rotlog_core::{
    Clock, Fields, LogError, LogLevel, LogRecord, LoggerConfig, Retention, RetentionWorker,
    Rotation, RotationPolicy, Sink, SystemClock, daily_file_name, report,
};

use crate::context::ContextLogger;

/// Rotating structured logger shared by any number of threads.
///
/// The live [`Sink`] sits behind a read-write lock. Logging only needs the shared
/// side; the exclusive side is taken to swap the sink on rotation and on [`close`].
///
/// [`close`]: StructuredLogger::close
pub struct StructuredLogger {
    config: LoggerConfig,
    policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    sink: RwLock<Option<Sink>>,
    retention: Option<RetentionWorker>,
}

impl StructuredLogger {
    /// Opens today's file under `config.directory`, creating the directory if needed,
    /// then runs one retention pass.
    pub fn new(config: LoggerConfig) -> Result<Self, LogError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: LoggerConfig, clock: Arc<dyn Clock>) -> Result<Self, LogError> {
        let today = clock.now().date_naive();
        let sink = Sink::open(
            &config.directory,
            &daily_file_name(today),
            today,
            config.enable_console,
        )?;

        let retention = Retention::new(config.directory.clone(), config.max_files);
        retention.run(Some(sink.path()));
        let retention = (config.cleanup_on_rotate && config.max_files > 0)
            .then(|| RetentionWorker::spawn(retention));

        Ok(Self {
            policy: RotationPolicy::new(config.max_file_size),
            config,
            clock,
            sink: RwLock::new(Some(sink)),
            retention,
        })
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Writes one record, rotating the file first if the day changed or the size limit was hit.
    ///
    /// A failed rotation drops the record and returns the error; the previous file stays
    /// live and the next call tries again.
    pub fn log(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl Into<Fields>,
    ) -> Result<(), LogError> {
        let now = self.clock.now();
        self.rotate_if_needed(&now)?;

        let guard = self.read_sink()?;
        let sink = guard.as_ref().ok_or(LogError::Closed)?;
        if level < self.config.level {
            return Ok(());
        }
        let fields = fields.into();
        let line = LogRecord::new(now, level, message, &fields).render(self.config.format);
        sink.write_line(&line)
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

    /// Returns a logger that adds `fields` to every record. The base logger is unchanged.
    pub fn with(&self, fields: impl Into<Fields>) -> ContextLogger<'_> {
        ContextLogger::new(self, fields.into())
    }

    /// Path of the file currently written to.
    pub fn current_file(&self) -> Result<PathBuf, LogError> {
        let guard = self.read_sink()?;
        let sink = guard.as_ref().ok_or(LogError::Closed)?;
        Ok(sink.path().to_path_buf())
    }

    /// Runs a retention pass now, sparing the live file. Returns the removed paths.
    pub fn cleanup(&self) -> Vec<PathBuf> {
        let active = self.current_file().ok();
        Retention::new(self.config.directory.clone(), self.config.max_files).run(active.as_deref())
    }

    /// Closes the live file and stops the retention worker.
    ///
    /// Producers must be done before this is called; logging afterwards returns
    /// [`LogError::Closed`], as does a second `close`.
    pub fn close(&self) -> Result<(), LogError> {
        let sink = self.write_sink()?.take().ok_or(LogError::Closed)?;
        let result = sink.close();
        if let Some(worker) = &self.retention {
            worker.shutdown();
        }
        result
    }

    /// Check under the shared lock, then re-check under the exclusive one so racing
    /// callers rotate once.
    fn rotate_if_needed(&self, now: &DateTime<Local>) -> Result<(), LogError> {
        {
            let guard = self.read_sink()?;
            let sink = guard.as_ref().ok_or(LogError::Closed)?;
            if self.policy.decide(&sink.state(), now) == Rotation::Keep {
                return Ok(());
            }
        }

        let mut guard = self.write_sink()?;
        let sink = guard.as_ref().ok_or(LogError::Closed)?;
        let Rotation::RotateTo(name) = self.policy.decide(&sink.state(), now) else {
            return Ok(());
        };
        let next = Sink::open(
            &self.config.directory,
            &name,
            now.date_naive(),
            self.config.enable_console,
        )?;
        let next_path = next.path().to_path_buf();
        // The new sink is installed before the old handle is closed.
        let previous = guard.replace(next);
        drop(guard);

        if let Some(previous) = previous
            && let Err(e) = previous.close()
        {
            report(LogLevel::Warn, &e.to_string());
        }
        if let Some(worker) = &self.retention {
            worker.request(Some(next_path));
        }
        Ok(())
    }

    fn read_sink(&self) -> Result<RwLockReadGuard<'_, Option<Sink>>, LogError> {
        self.sink.read().map_err(|_| LogError::Poisoned)
    }

    fn write_sink(&self) -> Result<RwLockWriteGuard<'_, Option<Sink>>, LogError> {
        self.sink.write().map_err(|_| LogError::Poisoned)
    }
}
