//! Flush policies and the background flush worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Controls when the state gets written to disk.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum FlushPolicy {
    /// Write after every mutation. The default; the file stays a
    /// write-after mirror of memory.
    Immediate,
    /// Background thread writes on a timer and whenever the state changes.
    Async(Duration),
    /// Only write when you call `flush()` yourself.
    Manual,
}

/// Background thread that runs a flush closure on a timer or when nudged
/// through the channel. Joins the thread on drop so nothing leaks.
pub(crate) struct FlushWorker {
    stop: Arc<AtomicBool>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl FlushWorker {
    /// Spawn a worker draining `rx`. The store keeps the sender side and
    /// nudges it after each mutation; dropping the sender makes the worker
    /// exit on its own.
    pub(crate) fn spawn<F>(interval: Duration, flush_fn: F, rx: mpsc::Receiver<()>) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let join_handle = thread::spawn(move || loop {
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            match rx.recv_timeout(interval) {
                Ok(()) | Err(mpsc::RecvTimeoutError::Timeout) => flush_fn(),
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        });

        Self {
            stop,
            join_handle: Some(join_handle),
        }
    }
}

impl Drop for FlushWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.join_handle.take() {
            let _ = h.join();
        }
    }
}
