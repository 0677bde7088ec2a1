/// Scan monitor: ties the [`ScanTracker`] to its background poller.
///
/// This is the object a view owns. It implements `observe(scan_id)`:
/// starting, restarting and tearing down the poller as the observed id
/// changes, draining poll results once per frame, ticking elapsed time, and
/// fetching the per-path results once a scan completes.
use super::poller::{start_polling, PollHandle, PollMessage};
use super::tracker::{Applied, ScanTracker, TrackerView};
use crate::api::VaultApi;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::model::{ScanPath, ScanStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Maximum poll messages drained per frame.
const MAX_MESSAGES_PER_FRAME: usize = 32;

/// Per-root-path results shown once a scan has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResults {
    NotRequested,
    Loading,
    Loaded(Vec<ScanPath>),
    Failed(String),
}

pub struct ScanMonitor {
    api: Arc<dyn VaultApi>,
    interval: Duration,
    visible: bool,
    tracker: ScanTracker,
    poller: Option<PollHandle>,
    paths_fetch: Option<FetchHandle<Vec<ScanPath>>>,
    paths: PathResults,
}

impl ScanMonitor {
    pub fn new(api: Arc<dyn VaultApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            visible: true,
            tracker: ScanTracker::new(),
            poller: None,
            paths_fetch: None,
            paths: PathResults::NotRequested,
        }
    }

    /// Observe `scan_id` (or nothing) and return the current view.
    ///
    /// A changed id tears down the old poller (its in-flight results are
    /// dropped with its channel) and, for a non-null id, starts a new one.
    pub fn observe(&mut self, scan_id: Option<&str>) -> TrackerView {
        if self.tracker.observe(scan_id) {
            self.poller = None;
            self.paths_fetch = None;
            self.paths = PathResults::NotRequested;
            if let Some(id) = scan_id {
                self.poller = Some(start_polling(
                    Arc::clone(&self.api),
                    id.to_owned(),
                    self.tracker.generation(),
                    self.interval,
                    self.visible,
                ));
            }
        }
        self.tracker.view()
    }

    /// Drain poll results and advance the elapsed-time clock.
    ///
    /// Called once per frame; returns `true` if anything visible changed.
    pub fn process_messages(&mut self, now: Instant) -> bool {
        let mut changed = false;

        let mut finished = None;
        if let Some(poller) = &self.poller {
            let mut drained = 0usize;
            while drained < MAX_MESSAGES_PER_FRAME {
                let Ok(msg) = poller.receiver.try_recv() else {
                    break;
                };
                drained += 1;
                changed = true;
                match msg {
                    PollMessage::Record { generation, record } => {
                        if let Applied::Finished(status) =
                            self.tracker.apply_record(generation, record, now)
                        {
                            finished = Some(status);
                            break;
                        }
                    }
                    PollMessage::Failed { generation, error } => {
                        self.tracker.apply_failure(generation, &error);
                    }
                }
            }
        }
        if let Some(status) = finished {
            self.poller = None;
            if status == ScanStatus::Completed {
                self.request_paths();
            }
        }

        changed |= self.tracker.tick(now);

        if let Some(fetch) = &self.paths_fetch {
            if let Some(result) = fetch.try_take() {
                self.paths = match result {
                    Ok(paths) => PathResults::Loaded(paths),
                    Err(e) => {
                        warn!("Loading scan results failed: {}", e);
                        PathResults::Failed(e.to_string())
                    }
                };
                self.paths_fetch = None;
                changed = true;
            }
        }

        changed
    }

    fn request_paths(&mut self) {
        let Some(id) = self.tracker.scan_id().map(str::to_owned) else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.paths = PathResults::Loading;
        self.paths_fetch = Some(spawn_fetch("scan-paths", move || api.scan_paths(&id)));
    }

    /// Window minimised (`false`) or restored (`true`).
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if let Some(poller) = &self.poller {
            poller.set_visible(visible);
        }
    }

    /// Window regained focus: re-poll a non-terminal scan right away.
    pub fn refresh_now(&self) {
        if let Some(poller) = &self.poller {
            poller.refresh_now();
        }
    }

    /// Retry loading the per-path results after a failure.
    pub fn retry_paths(&mut self) {
        if matches!(self.paths, PathResults::Failed(_))
            && self.tracker.status() == ScanStatus::Completed
        {
            self.request_paths();
        }
    }

    /// Dismiss the dialog if the scan is terminal. Ignored otherwise.
    pub fn request_dismiss(&mut self) -> bool {
        if self.tracker.request_dismiss() {
            self.poller = None;
            self.paths_fetch = None;
            self.paths = PathResults::NotRequested;
            true
        } else {
            false
        }
    }

    pub fn view(&self) -> TrackerView {
        self.tracker.view()
    }

    pub fn tracker(&self) -> &ScanTracker {
        &self.tracker
    }

    pub fn paths(&self) -> &PathResults {
        &self.paths
    }

    /// Whether a poll thread is currently attached.
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }
}
