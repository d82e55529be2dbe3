//! Fire-and-forget output of generated typings.

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use thiserror::Error;

/// A request to write a typings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// Where the contents go. Existing files are overwritten.
    pub target: Utf8PathBuf,
    /// The typings text.
    pub contents: String,
}

impl WriteRequest {
    /// Creates a request for the typings of the stylesheet at `stylesheet`.
    pub fn for_stylesheet(stylesheet: &Utf8Path, contents: String) -> Self {
        Self {
            target: typings_path(stylesheet),
            contents,
        }
    }
}

/// Returns the typings path for a stylesheet: the full file name plus `.d.ts`.
pub fn typings_path(stylesheet: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}.d.ts", stylesheet))
}

/// Accepts write requests without blocking on IO.
///
/// Failures never reach the submitter.
pub trait WriteSink: Send + Sync {
    fn submit(&self, request: WriteRequest);
}

/// A write that did not succeed.
#[derive(Debug, Error)]
#[error("failed to write {target}: {source}")]
pub struct WriteFailure {
    pub target: Utf8PathBuf,
    pub source: std::io::Error,
}

/// Receives write failures.
pub trait WriteLog: Send + Sync {
    fn report(&self, failure: WriteFailure);
}

/// Reports write failures as `tracing` errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl WriteLog for TracingLog {
    fn report(&self, failure: WriteFailure) {
        tracing::error!(target_file = %failure.target, error = %failure.source, "failed to write typings");
    }
}

struct Worker {
    sender: Sender<WriteRequest>,
    handle: JoinHandle<()>,
}

/// Writes files on a dedicated thread, in submission order.
pub struct BackgroundWriter {
    worker: Mutex<Option<Worker>>,
    log: Arc<dyn WriteLog>,
}

impl BackgroundWriter {
    /// Starts the writer thread. Failures go to `log`.
    pub fn new(log: Arc<dyn WriteLog>) -> Self {
        let (sender, receiver) = mpsc::channel::<WriteRequest>();
        let thread_log = Arc::clone(&log);
        let handle = std::thread::spawn(move || {
            for request in receiver {
                write_file(&request, thread_log.as_ref());
            }
        });

        Self {
            worker: Mutex::new(Some(Worker { sender, handle })),
            log,
        }
    }

    /// Waits for every submitted write to finish and stops the thread.
    ///
    /// Requests submitted afterwards are reported as failures.
    pub fn finish(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Worker { sender, handle }) = worker {
            drop(sender);
            if handle.join().is_err() {
                tracing::error!("typings writer thread panicked");
            }
        }
    }
}

impl Default for BackgroundWriter {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}

impl WriteSink for BackgroundWriter {
    fn submit(&self, request: WriteRequest) {
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        let rejected = match worker.as_ref() {
            Some(worker) => worker.sender.send(request).err().map(|e| e.0),
            None => Some(request),
        };
        drop(worker);

        if let Some(request) = rejected {
            self.log.report(WriteFailure {
                target: request.target,
                source: std::io::Error::other("typings writer has shut down"),
            });
        }
    }
}

impl Drop for BackgroundWriter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl std::fmt::Debug for BackgroundWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundWriter").finish_non_exhaustive()
    }
}

fn write_file(request: &WriteRequest, log: &dyn WriteLog) {
    match std::fs::write(&request.target, &request.contents) {
        Ok(()) => tracing::debug!(target_file = %request.target, "wrote typings"),
        Err(source) => log.report(WriteFailure {
            target: request.target.clone(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingLog(Mutex<Vec<Utf8PathBuf>>);

    impl WriteLog for RecordingLog {
        fn report(&self, failure: WriteFailure) {
            self.0.lock().unwrap().push(failure.target);
        }
    }

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn test_typings_path() {
        assert_eq!(
            typings_path(Utf8Path::new("src/a.module.scss")).as_str(),
            "src/a.module.scss.d.ts"
        );
    }

    #[test]
    fn test_writes_and_overwrites() {
        let (_temp, root) = temp_root();
        let log = Arc::new(RecordingLog::default());
        let writer = BackgroundWriter::new(log.clone());
        let stylesheet = root.join("a.module.css");

        writer.submit(WriteRequest::for_stylesheet(&stylesheet, "first".to_string()));
        writer.submit(WriteRequest::for_stylesheet(&stylesheet, "second".to_string()));
        writer.finish();

        let written = std::fs::read_to_string(root.join("a.module.css.d.ts")).unwrap();
        assert_eq!(written, "second");
        assert!(log.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failures_go_to_log() {
        let (_temp, root) = temp_root();
        let log = Arc::new(RecordingLog::default());
        let writer = BackgroundWriter::new(log.clone());
        let stylesheet = root.join("missing/a.module.css");

        writer.submit(WriteRequest::for_stylesheet(&stylesheet, String::new()));
        writer.finish();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec![root.join("missing/a.module.css.d.ts")]
        );
    }

    #[test]
    fn test_submit_after_finish_is_reported() {
        let (_temp, root) = temp_root();
        let log = Arc::new(RecordingLog::default());
        let writer = BackgroundWriter::new(log.clone());
        writer.finish();

        writer.submit(WriteRequest::for_stylesheet(
            &root.join("late.module.css"),
            String::new(),
        ));

        assert_eq!(log.0.lock().unwrap().len(), 1);
        assert!(!root.join("late.module.css.d.ts").exists());
    }
}
