use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
    thread::JoinHandle,
    time::SystemTime,
};

use crossbeam_channel::{Sender, unbounded};

use crate::{diagnostics::report, level::LogLevel, rotation::LOG_EXTENSION};

/// Keeps at most `max_files` log files in `directory`, deleting the oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retention {
    directory: PathBuf,
    max_files: usize,
}

impl Retention {
    pub fn new<P: Into<PathBuf>>(directory: P, max_files: usize) -> Self {
        Self {
            directory: directory.into(),
            max_files,
        }
    }

    /// Deletes the oldest `.log` files beyond `max_files` and returns the removed paths.
    ///
    /// Files are ordered by modification time, ties broken by name. `protect` is counted
    /// but never deleted; the next oldest file goes in its place. Failures are reported
    /// and skipped, never returned.
    pub fn run(&self, protect: Option<&Path>) -> Vec<PathBuf> {
        self.run_with(protect, |path| fs::remove_file(path))
    }

    fn run_with<F>(&self, protect: Option<&Path>, mut remove: F) -> Vec<PathBuf>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        if self.max_files == 0 {
            return Vec::new();
        }
        let files = match list_log_files(&self.directory) {
            Ok(files) => files,
            Err(e) => {
                report(
                    LogLevel::Warn,
                    &format!(
                        "failed to read log directory {}: {e}",
                        self.directory.display()
                    ),
                );
                return Vec::new();
            }
        };
        let excess = files.len().saturating_sub(self.max_files);
        let mut removed = Vec::with_capacity(excess);
        for path in files
            .into_iter()
            .filter(|path| Some(path.as_path()) != protect)
            .take(excess)
        {
            match remove(&path) {
                Ok(()) => removed.push(path),
                Err(e) => report(
                    LogLevel::Warn,
                    &format!("failed to remove old log file {}: {e}", path.display()),
                ),
            }
        }
        removed
    }
}

/// One-shot retention pass over `directory`. A `max_files` of 0 does nothing.
pub fn cleanup<P: AsRef<Path>>(directory: P, max_files: usize) -> Vec<PathBuf> {
    Retention::new(directory.as_ref(), max_files).run(None)
}

/// Regular `.log` files, oldest first.
fn list_log_files(directory: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<(SystemTime, PathBuf)> = fs::read_dir(directory)?
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LOG_EXTENSION) {
                return None;
            }
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some((metadata.modified().ok()?, path))
        })
        .collect();
    files.sort();
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

enum CleanupRequest {
    Run(Option<PathBuf>),
    Shutdown,
}

/// Background thread running retention passes so rotation never waits on a directory scan.
///
/// Requests queued while a pass is running are coalesced into one pass.
pub struct RetentionWorker {
    sender: Sender<CleanupRequest>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl RetentionWorker {
    pub fn spawn(retention: Retention) -> Self {
        let (sender, receiver) = unbounded::<CleanupRequest>();
        let handler = std::thread::spawn(move || {
            while let Ok(request) = receiver.recv() {
                let mut batch = vec![request];
                while let Ok(request) = receiver.try_recv() {
                    batch.push(request);
                }

                let mut should_run = false;
                let mut should_shutdown = false;
                let mut protect = None;
                for request in batch {
                    match request {
                        CleanupRequest::Run(path) => {
                            should_run = true;
                            protect = path;
                        }
                        CleanupRequest::Shutdown => should_shutdown = true,
                    }
                }

                if should_run {
                    retention.run(protect.as_deref());
                }
                if should_shutdown {
                    break;
                }
            }
        });
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Queues a pass that will not delete `protect`.
    pub fn request(&self, protect: Option<PathBuf>) {
        if self.sender.send(CleanupRequest::Run(protect)).is_err() {
            report(
                LogLevel::Warn,
                "retention worker has stopped, cleanup request dropped",
            );
        }
    }

    /// Runs what is already queued, then joins the thread. Later calls do nothing.
    pub fn shutdown(&self) {
        let mut guard = self.handler.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = guard.take() {
            // ignore error if the thread already exited
            let _ = self.sender.send(CleanupRequest::Shutdown);
            if handle.join().is_err() {
                report(LogLevel::Error, "retention worker panicked");
            }
        }
    }
}

impl Drop for RetentionWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
