//! Cancellable waits between polling cycles.
//!
//! A `ShutdownHandle` is moved into the Ctrl+C handler; the monitor loop
//! sleeps on the paired `ShutdownSignal` and wakes as soon as a stop is
//! requested or every handle has been dropped.
//!
//! Requests are counted, so a caller can escalate when a stop is requested
//! again while the first one is still being honored.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Create a connected handle/signal pair.
pub fn channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = mpsc::channel();
    let requests = Arc::new(AtomicUsize::new(0));
    (
        ShutdownHandle {
            tx,
            requests: Arc::clone(&requests),
        },
        ShutdownSignal { rx, requests },
    )
}

/// Requests a stop. Cheap to clone, safe to call from a signal handler thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Sender<()>,
    requests: Arc<AtomicUsize>,
}

impl ShutdownHandle {
    /// Request a stop and return how many stops have been requested so far,
    /// this one included.
    pub fn request(&self) -> usize {
        let count = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        // The receiver being gone means the loop already ended
        let _ = self.tx.send(());
        count
    }
}

/// Observes stop requests.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: Receiver<()>,
    requests: Arc<AtomicUsize>,
}

impl ShutdownSignal {
    /// Block for up to `timeout`. Returns true if a stop was requested.
    ///
    /// Returns at once when a request is already pending.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.requested_count() > 0 {
            return true;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    /// Non-blocking check for a stop request. Repeated calls keep
    /// reporting a request once one has been made.
    pub fn is_requested(&self) -> bool {
        if self.requested_count() > 0 {
            return true;
        }
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Number of stop requests made so far.
    pub fn requested_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}
