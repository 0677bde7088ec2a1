/// Scan progress tracking.
///
/// - [`tracker`]: pure lifecycle state machine and view model.
/// - [`poller`]: background thread that polls one scan id.
/// - [`monitor`]: owns a tracker plus its poller; what views hold.
pub mod monitor;
pub mod poller;
pub mod tracker;

pub use monitor::{PathResults, ScanMonitor};
pub use poller::{start_polling, PollHandle, PollMessage};
pub use tracker::{Applied, ScanTracker, TrackerView};
