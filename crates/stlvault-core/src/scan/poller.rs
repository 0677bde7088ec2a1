/// Background poller for a single scan id.
///
/// Runs on its own thread and fetches `GET /scans/{id}` on a fixed interval
/// while the window is visible. Results travel to the UI thread over a
/// crossbeam channel, tagged with the tracker generation they belong to.
///
/// # Cadence
///
/// - first fetch immediately (as soon as the window is visible)
/// - then one fetch per `interval`
/// - hidden window: no fetches at all
/// - shown again after being hidden: fetch immediately
/// - [`PollHandle::refresh_now`] (focus regained): fetch immediately
/// - terminal record delivered, [`PollHandle::stop`], or handle dropped:
///   the thread exits
use crate::api::VaultApi;
use crate::error::ApiError;
use crate::model::ScanRecord;
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Capacity of the result channel. The UI drains it every frame, so this is
/// only reached if the UI stalls for a long time; the poller then blocks.
pub const POLL_CHANNEL_CAPACITY: usize = 64;

/// Result of one poll, sent from the poll thread to the UI.
#[derive(Debug)]
pub enum PollMessage {
    Record { generation: u64, record: ScanRecord },
    Failed { generation: u64, error: ApiError },
}

#[derive(Debug)]
enum PollCommand {
    SetVisible(bool),
    RefreshNow,
    Stop,
}

/// Handle to a running poller. Dropping it stops the thread.
pub struct PollHandle {
    /// Receiver for poll results.
    pub receiver: Receiver<PollMessage>,
    commands: Sender<PollCommand>,
    scan_id: String,
    generation: u64,
    _thread: Option<thread::JoinHandle<()>>,
}

impl PollHandle {
    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Suspend (`false`) or resume (`true`) polling.
    pub fn set_visible(&self, visible: bool) {
        let _ = self.commands.send(PollCommand::SetVisible(visible));
    }

    /// Fetch immediately, regardless of the interval.
    pub fn refresh_now(&self) {
        let _ = self.commands.send(PollCommand::RefreshNow);
    }

    /// Ask the thread to exit. Non-blocking.
    pub fn stop(&self) {
        let _ = self.commands.send(PollCommand::Stop);
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start polling `scan_id` on a background thread.
///
/// `generation` is echoed back in every [`PollMessage`]; `visible` is the
/// window visibility at start.
pub fn start_polling(
    api: Arc<dyn VaultApi>,
    scan_id: String,
    generation: u64,
    interval: Duration,
    visible: bool,
) -> PollHandle {
    let (result_tx, result_rx) = bounded::<PollMessage>(POLL_CHANNEL_CAPACITY);
    let (command_tx, command_rx) = unbounded::<PollCommand>();

    let id = scan_id.clone();
    let thread = thread::Builder::new()
        .name("stlvault-scan-poller".into())
        .spawn(move || {
            run_poller(api, id, generation, interval, visible, command_rx, result_tx);
        })
        .expect("failed to spawn scan poller thread");

    PollHandle {
        receiver: result_rx,
        commands: command_tx,
        scan_id,
        generation,
        _thread: Some(thread),
    }
}

fn run_poller(
    api: Arc<dyn VaultApi>,
    scan_id: String,
    generation: u64,
    interval: Duration,
    mut visible: bool,
    commands: Receiver<PollCommand>,
    results: Sender<PollMessage>,
) {
    info!("Polling scan {} every {:?}", scan_id, interval);
    let mut due = true;
    let mut next_poll = Instant::now();

    loop {
        if due && visible {
            due = false;
            match api.scan(&scan_id) {
                Ok(record) => {
                    let terminal = record.status.is_terminal();
                    if results
                        .send(PollMessage::Record { generation, record })
                        .is_err()
                    {
                        return;
                    }
                    if terminal {
                        info!("Scan {} reached a terminal state, poller exiting", scan_id);
                        return;
                    }
                }
                Err(error) => {
                    warn!("Polling scan {} failed: {}", scan_id, error);
                    if results
                        .send(PollMessage::Failed { generation, error })
                        .is_err()
                    {
                        return;
                    }
                }
            }
            next_poll = Instant::now() + interval;
        }

        // Hidden: sleep until a command arrives. Visible: until the next poll.
        let command = if visible {
            commands.recv_timeout(next_poll.saturating_duration_since(Instant::now()))
        } else {
            commands.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match command {
            Ok(PollCommand::SetVisible(v)) => {
                if v && !visible {
                    debug!("Scan {} poller resumed", scan_id);
                    due = true;
                } else if !v && visible {
                    debug!("Scan {} poller suspended", scan_id);
                }
                visible = v;
            }
            Ok(PollCommand::RefreshNow) => due = true,
            Err(RecvTimeoutError::Timeout) => due = true,
            Ok(PollCommand::Stop) | Err(RecvTimeoutError::Disconnected) => {
                debug!("Scan {} poller stopped", scan_id);
                return;
            }
        }
    }
}
