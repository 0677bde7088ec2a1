/// One-shot background requests.
///
/// Runs a single blocking API call on a named thread and hands the result
/// back through a channel, so the UI thread never waits on the network.
/// Dropping the [`FetchHandle`] discards whatever arrives later.
use crate::error::ApiError;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::thread;

/// Pending result of a background request.
pub struct FetchHandle<T> {
    rx: Receiver<Result<T, ApiError>>,
    _thread: Option<thread::JoinHandle<()>>,
}

impl<T: Send + 'static> FetchHandle<T> {
    /// Take the result if it has arrived.
    ///
    /// Returns `None` while the request is still in flight. A worker that
    /// died without answering is reported as a transport error.
    pub fn try_take(&self) -> Option<Result<T, ApiError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ApiError::Transport(
                "request worker exited without a response".into(),
            ))),
        }
    }

    /// Block until the result arrives. The GUI uses [`FetchHandle::try_take`].
    pub fn wait(self) -> Result<T, ApiError> {
        self.rx.recv().unwrap_or_else(|_| {
            Err(ApiError::Transport(
                "request worker exited without a response".into(),
            ))
        })
    }
}

/// Run `job` on a background thread named `stlvault-{name}`.
pub fn spawn_fetch<T, F>(name: &str, job: F) -> FetchHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    let (tx, rx) = bounded(1);
    let thread = thread::Builder::new()
        .name(format!("stlvault-{name}"))
        .spawn(move || {
            // The receiver may already be gone; that is the cancellation path.
            let _ = tx.send(job());
        })
        .expect("failed to spawn fetch thread");

    FetchHandle {
        rx,
        _thread: Some(thread),
    }
}
