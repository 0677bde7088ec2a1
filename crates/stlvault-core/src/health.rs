/// Backend connectivity, checked against `GET /health` on a fixed interval.
use crate::api::VaultApi;
use crate::fetch::{spawn_fetch, FetchHandle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Time between health checks.
pub const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// No check has finished yet.
    #[default]
    Unknown,
    Online,
    Offline(String),
}

impl Connectivity {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

pub struct HealthMonitor {
    api: Arc<dyn VaultApi>,
    interval: Duration,
    state: Connectivity,
    fetch: Option<FetchHandle<()>>,
    next_check: Instant,
}

impl HealthMonitor {
    /// Create the monitor and start the first check.
    pub fn new(api: Arc<dyn VaultApi>, now: Instant) -> Self {
        Self::with_interval(api, HEALTH_CHECK_INTERVAL, now)
    }

    pub fn with_interval(api: Arc<dyn VaultApi>, interval: Duration, now: Instant) -> Self {
        let mut monitor = Self {
            api,
            interval,
            state: Connectivity::Unknown,
            fetch: None,
            next_check: now,
        };
        monitor.check_now(now);
        monitor
    }

    pub fn state(&self) -> &Connectivity {
        &self.state
    }

    pub fn is_checking(&self) -> bool {
        self.fetch.is_some()
    }

    /// Start a check unless one is in flight.
    pub fn check_now(&mut self, now: Instant) {
        if self.fetch.is_some() {
            return;
        }
        let api = Arc::clone(&self.api);
        self.fetch = Some(spawn_fetch("health", move || api.health()));
        self.next_check = now + self.interval;
    }

    /// Time until the next scheduled check; zero once it is due.
    pub fn next_check_in(&self, now: Instant) -> Duration {
        self.next_check.saturating_duration_since(now)
    }

    /// Collect a finished check and start the next one when due.
    ///
    /// Returns `true` if the connectivity state changed.
    pub fn process_messages(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(result) = self.fetch.as_ref().and_then(|f| f.try_take()) {
            self.fetch = None;
            let next = match result {
                Ok(()) => Connectivity::Online,
                Err(e) => Connectivity::Offline(e.to_string()),
            };
            if next != self.state {
                match &next {
                    Connectivity::Online => info!("Backend reachable"),
                    Connectivity::Offline(e) => warn!("Backend unreachable: {}", e),
                    Connectivity::Unknown => {}
                }
                self.state = next;
                changed = true;
            }
        }
        if self.fetch.is_none() && now >= self.next_check {
            self.check_now(now);
        }
        changed
    }
}
