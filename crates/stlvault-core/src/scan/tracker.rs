/// Scan lifecycle tracker: the pure state machine behind the progress dialog.
///
/// The tracker never talks to the network. It is fed polled [`ScanRecord`]s
/// and clock readings and derives a [`TrackerView`] from them:
///
/// ```text
///   dormant ──observe(Some)──▶ pending ─▶ running ─▶ completed
///      ▲                          │          │    └─▶ failed
///      └───observe(None) / dismiss (terminal only)
/// ```
///
/// Every observed scan id gets a new *generation*. Poll results carry the
/// generation they were requested under, and anything from an older
/// generation is discarded, so a slow response can never leak into the
/// state of a newer scan.
use crate::error::ApiError;
use crate::format::format_elapsed;
use crate::model::{ScanRecord, ScanStatus};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of feeding a polled record into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Belongs to a scan id that is no longer observed.
    Stale,
    /// The scan was already terminal; nothing changed.
    Ignored,
    /// Non-terminal progress update.
    Updated,
    /// The scan just reached `Completed` or `Failed`. Polling must stop.
    Finished(ScanStatus),
}

/// Everything a progress view needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerView {
    /// `false` when no scan is observed; nothing should be shown.
    pub active: bool,
    /// Observed, but no record has arrived yet.
    pub loading: bool,
    pub status: ScanStatus,
    pub headline: &'static str,
    pub found: u64,
    pub processed: u64,
    /// Files still to process; `None` when `processed >= found`.
    pub remaining: Option<u64>,
    /// Server percentage; shown while running and on completion.
    pub percent: Option<u64>,
    pub elapsed_secs: u64,
    pub formatted_elapsed: String,
    /// Server-supplied failure message, only for `Failed`.
    pub error_message: Option<String>,
    /// Last poll failure. Does not affect `status`.
    pub fetch_error: Option<String>,
    /// Whether a dismiss request would be honoured.
    pub closable: bool,
}

impl TrackerView {
    /// The view of a dormant tracker.
    pub fn inactive() -> Self {
        Self {
            active: false,
            loading: false,
            status: ScanStatus::Pending,
            headline: "",
            found: 0,
            processed: 0,
            remaining: None,
            percent: None,
            elapsed_secs: 0,
            formatted_elapsed: format_elapsed(0),
            error_message: None,
            fetch_error: None,
            closable: false,
        }
    }
}

/// Headline text for a status.
pub fn headline(status: ScanStatus) -> &'static str {
    match status {
        ScanStatus::Pending => "Starting Scan...",
        ScanStatus::Running => "Scanning Files...",
        ScanStatus::Completed => "Scan Completed!",
        ScanStatus::Failed => "Scan Failed",
    }
}

/// Client-side state for one observed scan.
#[derive(Debug, Default)]
pub struct ScanTracker {
    scan_id: Option<String>,
    generation: u64,
    record: Option<ScanRecord>,
    /// Captured on the first non-terminal record.
    started_at: Option<Instant>,
    elapsed_secs: u64,
    fetch_error: Option<String>,
}

impl ScanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `scan_id` (or go dormant with `None`).
    ///
    /// Returns `true` when the observed id changed, in which case all
    /// per-scan state was reset and the generation advanced; the caller must
    /// restart (or tear down) polling.
    pub fn observe(&mut self, scan_id: Option<&str>) -> bool {
        if self.scan_id.as_deref() == scan_id {
            return false;
        }
        debug!(
            "Scan tracker: {:?} -> {:?}",
            self.scan_id.as_deref(),
            scan_id
        );
        self.scan_id = scan_id.map(str::to_owned);
        self.generation = self.generation.wrapping_add(1);
        self.record = None;
        self.started_at = None;
        self.elapsed_secs = 0;
        self.fetch_error = None;
        true
    }

    pub fn scan_id(&self) -> Option<&str> {
        self.scan_id.as_deref()
    }

    /// Token identifying the currently observed scan id.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn record(&self) -> Option<&ScanRecord> {
        self.record.as_ref()
    }

    /// Status of the last record, `Pending` before the first one arrives.
    pub fn status(&self) -> ScanStatus {
        self.record.as_ref().map(|r| r.status).unwrap_or_default()
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Whether the scan should currently be polled.
    pub fn needs_polling(&self) -> bool {
        self.scan_id.is_some() && !self.is_terminal()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Feed a polled record requested under `generation`.
    pub fn apply_record(&mut self, generation: u64, record: ScanRecord, now: Instant) -> Applied {
        match self.scan_id.as_deref() {
            None => return Applied::Stale,
            Some(id)
                if generation != self.generation
                    || (!record.id.is_empty() && record.id != id) =>
            {
                debug!("Discarding stale scan record for {:?}", record.id);
                return Applied::Stale;
            }
            Some(_) => {}
        }
        if self.is_terminal() {
            return Applied::Ignored;
        }

        self.fetch_error = None;
        let status = record.status;
        if status.is_terminal() {
            // Freeze elapsed time at its final value.
            self.recompute_elapsed(now);
            info!(
                "Scan {} {} after {}: {} found, {} processed",
                self.scan_id.as_deref().unwrap_or_default(),
                status.as_str(),
                format_elapsed(self.elapsed_secs),
                record.found,
                record.processed
            );
            self.record = Some(record);
            Applied::Finished(status)
        } else {
            if self.started_at.is_none() {
                self.started_at = Some(now);
            }
            self.recompute_elapsed(now);
            self.record = Some(record);
            Applied::Updated
        }
    }

    /// Record a poll failure for `generation`. The scan status is untouched.
    ///
    /// Returns `false` for stale failures.
    pub fn apply_failure(&mut self, generation: u64, error: &ApiError) -> bool {
        if self.scan_id.is_none() || generation != self.generation {
            return false;
        }
        self.fetch_error = Some(error.to_string());
        true
    }

    /// Recompute elapsed time from the start timestamp.
    ///
    /// No-op once terminal. Returns `true` when the displayed value changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.is_terminal() {
            return false;
        }
        let before = self.elapsed_secs;
        self.recompute_elapsed(now);
        before != self.elapsed_secs
    }

    fn recompute_elapsed(&mut self, now: Instant) {
        if let Some(start) = self.started_at {
            let secs = now.saturating_duration_since(start).as_secs();
            self.elapsed_secs = self.elapsed_secs.max(secs);
        }
    }

    /// Dismissal is only allowed once the scan is terminal.
    pub fn can_dismiss(&self) -> bool {
        self.scan_id.is_some() && self.is_terminal()
    }

    /// Honour a dismiss request if allowed, returning the tracker to dormant.
    ///
    /// Returns `false` (and changes nothing) while pending or running.
    pub fn request_dismiss(&mut self) -> bool {
        if !self.can_dismiss() {
            debug!("Ignoring dismiss request while scan is {}", self.status().as_str());
            return false;
        }
        self.observe(None);
        true
    }

    /// Derive the current view model.
    pub fn view(&self) -> TrackerView {
        if self.scan_id.is_none() {
            return TrackerView::inactive();
        }
        let status = self.status();
        let (found, processed, progress, remaining) = match &self.record {
            Some(r) => (r.found, r.processed, r.progress.min(100), r.remaining()),
            None => (0, 0, 0, None),
        };
        let error_message = match (&self.record, status) {
            (Some(r), ScanStatus::Failed) => r.error.clone(),
            _ => None,
        };

        TrackerView {
            active: true,
            loading: self.record.is_none() && self.fetch_error.is_none(),
            status,
            headline: headline(status),
            found,
            processed,
            remaining,
            percent: (status != ScanStatus::Failed).then_some(progress),
            elapsed_secs: self.elapsed_secs,
            formatted_elapsed: format_elapsed(self.elapsed_secs),
            error_message,
            fetch_error: self.fetch_error.clone(),
            closable: self.can_dismiss(),
        }
    }
}
