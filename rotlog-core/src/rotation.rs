use chrono::{DateTime, Local, NaiveDate};

/// File name prefix shared by every log file.
pub const FILE_PREFIX: &str = "app";
/// Extension recognised by rotation and retention.
pub const LOG_EXTENSION: &str = "log";

/// `app-<YYYY-MM-DD>.log`, the normal daily file.
pub fn daily_file_name(day: NaiveDate) -> String {
    format!("{FILE_PREFIX}-{}.{LOG_EXTENSION}", day.format("%Y-%m-%d"))
}

/// `app-<YYYY-MM-DD>_<HH-MM-SS>.log`, a same-day file opened after a size rotation.
pub fn sized_file_name(now: &DateTime<Local>) -> String {
    format!(
        "{FILE_PREFIX}-{}.{LOG_EXTENSION}",
        now.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// What the rotation policy needs to know about the live sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkState<'a> {
    pub name: &'a str,
    pub day: NaiveDate,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rotation {
    Keep,
    RotateTo(String),
}

/// Decides when the live sink must be replaced and what the next file is called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationPolicy {
    max_file_size: u64,
}

impl RotationPolicy {
    /// `max_file_size` of 0 disables size based rotation.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// A day change wins over the size limit.
    ///
    /// Days only move forward: a `now` behind the sink's day keeps the sink. A size
    /// rotation whose name is the live file's own name keeps it until the next second.
    pub fn decide(&self, state: &SinkState<'_>, now: &DateTime<Local>) -> Rotation {
        let today = now.date_naive();
        if today > state.day {
            return Rotation::RotateTo(daily_file_name(today));
        }
        if self.max_file_size > 0 && state.size >= self.max_file_size {
            let name = sized_file_name(now);
            if name != state.name {
                return Rotation::RotateTo(name);
            }
        }
        Rotation::Keep
    }
}
