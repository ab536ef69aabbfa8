//! One-shot background jobs with a pollable result.
//!
//! External calls block, so each one runs on its own worker thread and
//! reports back through a channel. The UI thread polls with `try_take` on
//! every tick and never waits.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// State of a deferred result when polled.
#[derive(Debug, PartialEq)]
pub enum Poll<T> {
    /// Still running.
    Pending,
    /// Finished with a value.
    Ready(T),
    /// The worker went away without reporting (it panicked).
    Lost,
}

/// Handle to a value being computed on a worker thread.
pub struct Deferred<T> {
    receiver: Receiver<T>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Run `job` on a new thread.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may be gone if the owner was dropped; the result is
            // then simply discarded.
            let _ = sender.send(job());
        });
        Self { receiver }
    }

    /// Take the result without blocking.
    ///
    /// After `Ready` or `Lost` has been returned the handle is spent and
    /// further polls report `Lost`.
    pub fn try_take(&self) -> Poll<T> {
        match self.receiver.try_recv() {
            Ok(value) => Poll::Ready(value),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Lost,
        }
    }

    /// Block until the worker reports. `None` if it died first.
    pub fn wait(&self) -> Option<T> {
        self.receiver.recv().ok()
    }
}
