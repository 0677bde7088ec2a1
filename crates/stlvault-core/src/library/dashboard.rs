/// Dashboard: library totals and the most recent scans.
use crate::api::VaultApi;
use crate::browse::ListLoad;
use crate::error::ApiError;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::model::{FileKind, FileQuery, ScanList};
use std::sync::Arc;
use tracing::warn;

/// Rows in the recent-scans table.
pub const RECENT_SCANS: u32 = 10;

/// Files whose sizes are summed for the size card.
pub const SIZE_SAMPLE: u32 = 100;

/// Headline numbers for the stat cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total_files: u64,
    pub stl: u64,
    pub zip: u64,
    pub rar: u64,
    /// Sum of sizes over the first [`SIZE_SAMPLE`] files.
    pub total_size: u64,
    /// `false` when the library holds more files than were summed.
    pub size_complete: bool,
}

impl LibraryStats {
    /// Gather the totals with one sampled page plus one count per file type.
    pub fn load(api: &dyn VaultApi) -> Result<Self, ApiError> {
        let sample = api.files(&FileQuery {
            page_size: SIZE_SAMPLE,
            ..FileQuery::default()
        })?;
        let count = |kind| api.files(&FileQuery::count_of(Some(kind))).map(|l| l.total);

        Ok(Self {
            total_files: sample.total,
            stl: count(FileKind::Stl)?,
            zip: count(FileKind::Zip)?,
            rar: count(FileKind::Rar)?,
            total_size: sample.items.iter().map(|f| f.size).sum(),
            size_complete: sample.items.len() as u64 >= sample.total,
        })
    }
}

pub struct Dashboard {
    api: Arc<dyn VaultApi>,
    stats: ListLoad<LibraryStats>,
    recent: ListLoad<ScanList>,
    stats_fetch: Option<FetchHandle<LibraryStats>>,
    recent_fetch: Option<FetchHandle<ScanList>>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        let mut dashboard = Self {
            api,
            stats: ListLoad::Loading,
            recent: ListLoad::Loading,
            stats_fetch: None,
            recent_fetch: None,
        };
        dashboard.reload();
        dashboard
    }

    pub fn stats(&self) -> &ListLoad<LibraryStats> {
        &self.stats
    }

    pub fn recent(&self) -> &ListLoad<ScanList> {
        &self.recent
    }

    pub fn is_loading(&self) -> bool {
        self.stats_fetch.is_some() || self.recent_fetch.is_some()
    }

    pub fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        self.stats_fetch = Some(spawn_fetch("dashboard-stats", move || {
            LibraryStats::load(api.as_ref())
        }));
        let api = Arc::clone(&self.api);
        self.recent_fetch = Some(spawn_fetch("dashboard-scans", move || {
            api.scans(1, RECENT_SCANS)
        }));
    }

    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;
        if let Some(result) = self.stats_fetch.as_ref().and_then(|f| f.try_take()) {
            self.stats_fetch = None;
            self.stats = settle("library stats", result);
            changed = true;
        }
        if let Some(result) = self.recent_fetch.as_ref().and_then(|f| f.try_take()) {
            self.recent_fetch = None;
            self.recent = settle("recent scans", result);
            changed = true;
        }
        changed
    }
}

fn settle<T>(what: &str, result: Result<T, ApiError>) -> ListLoad<T> {
    match result {
        Ok(value) => ListLoad::Loaded(value),
        Err(e) => {
            warn!("Loading {} failed: {}", what, e);
            ListLoad::Failed(e.to_string())
        }
    }
}
