use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::NaiveDate;

use crate::{error::LogError, rotation::SinkState};

/// The one open log file, with the day it was opened for and the bytes it holds.
///
/// Writes go through `&File` on a handle opened in append mode, so any number of
/// threads holding a shared reference can write complete lines without interleaving.
#[derive(Debug)]
pub struct Sink {
    file: File,
    path: PathBuf,
    name: String,
    day: NaiveDate,
    size: AtomicU64,
    console: bool,
}

impl Sink {
    /// Opens (or creates) `directory/name` for append, creating `directory` first.
    pub fn open(
        directory: &Path,
        name: &str,
        day: NaiveDate,
        console: bool,
    ) -> Result<Self, LogError> {
        fs::create_dir_all(directory).map_err(|source| LogError::Directory {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = directory.join(name);
        let open_err = |source: io::Error| LogError::Open {
            path: path.clone(),
            source,
        };
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();
        Ok(Self {
            file,
            path,
            name: name.to_string(),
            day,
            size: AtomicU64::new(size),
            console,
        })
    }

    pub fn state(&self) -> SinkState<'_> {
        SinkState {
            name: &self.name,
            day: self.day,
            size: self.size.load(Ordering::Acquire),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Appends one rendered record, then mirrors it to stderr if enabled.
    pub fn write_line(&self, line: &str) -> Result<(), LogError> {
        let bytes = line.as_bytes();
        (&self.file)
            .write_all(bytes)
            .map_err(|source| LogError::Write {
                path: self.path.clone(),
                source,
            })?;
        self.size.fetch_add(bytes.len() as u64, Ordering::AcqRel);
        if self.console {
            io::stderr().lock().write_all(bytes).map_err(LogError::Console)?;
        }
        Ok(())
    }

    /// Flushes the file to disk and releases the handle.
    pub fn close(self) -> Result<(), LogError> {
        self.file.sync_all().map_err(|source| LogError::Close {
            path: self.path,
            source,
        })
    }
}
