/// State behind the folder contents screen.
///
/// Owns the current query (page, page size, search, type and category
/// filters), the in-flight request and the last load result. The UI calls
/// [`FolderView::process_messages`] once per frame; a successful load is
/// pushed onto the [`BreadcrumbTrail`], failures never touch it.
use super::breadcrumb::{BreadcrumbNode, BreadcrumbTrail};
use crate::api::VaultApi;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::library::{AssignTarget, Assigned};
use crate::model::{FileKind, FolderDetail, FolderQuery, Propagation};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long the retry action stays disabled after a retry on a missing
/// folder.
pub const RETRY_COOLDOWN: Duration = Duration::from_secs(30);

/// Quiet period after the last keystroke before a search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Outcome of the most recent folder request.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderLoad {
    Loading,
    Loaded(FolderDetail),
    NotFound,
    Failed(String),
}

/// Countdown that gates the retry action.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryCooldown {
    until: Option<Instant>,
}

impl RetryCooldown {
    pub fn start(&mut self, now: Instant) {
        self.until = Some(now + RETRY_COOLDOWN);
    }

    /// Whole seconds left, rounded up; `0` once the cooldown has elapsed.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        match self.until {
            Some(until) if until > now => {
                let left = until - now;
                left.as_secs() + u64::from(left.subsec_nanos() > 0)
            }
            _ => 0,
        }
    }

    pub fn can_retry(&self, now: Instant) -> bool {
        self.remaining_secs(now) == 0
    }
}

/// Delays applying search text until typing pauses.
#[derive(Debug, Clone, Default)]
pub struct SearchDebounce {
    text: String,
    changed_at: Option<Instant>,
}

impl SearchDebounce {
    /// The text as typed, applied or not.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        if self.text != text {
            self.text = text.to_owned();
            self.changed_at = Some(now);
        }
    }

    /// Whether a change is waiting for the quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.changed_at.is_some()
    }

    /// Return the text once it has been stable for [`SEARCH_DEBOUNCE`].
    pub fn take_settled(&mut self, now: Instant) -> Option<String> {
        match self.changed_at {
            Some(at) if now.saturating_duration_since(at) >= SEARCH_DEBOUNCE => {
                self.changed_at = None;
                Some(self.text.clone())
            }
            _ => None,
        }
    }
}

pub struct FolderView {
    api: Arc<dyn VaultApi>,
    folder_id: String,
    query: FolderQuery,
    state: FolderLoad,
    fetch: Option<FetchHandle<FolderDetail>>,
    cooldown: RetryCooldown,
    search: SearchDebounce,
    propagation: Propagation,
}

impl FolderView {
    /// Open `folder_id` with default filters and start loading it.
    pub fn open(api: Arc<dyn VaultApi>, folder_id: impl Into<String>) -> Self {
        let mut view = Self {
            api,
            folder_id: folder_id.into(),
            query: FolderQuery::default(),
            state: FolderLoad::Loading,
            fetch: None,
            cooldown: RetryCooldown::default(),
            search: SearchDebounce::default(),
            propagation: Propagation::default(),
        };
        view.reload();
        view
    }

    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    pub fn query(&self) -> &FolderQuery {
        &self.query
    }

    pub fn state(&self) -> &FolderLoad {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    /// Loaded details, if the last request succeeded.
    pub fn detail(&self) -> Option<&FolderDetail> {
        match &self.state {
            FolderLoad::Loaded(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn search_text(&self) -> &str {
        self.search.text()
    }

    /// Typed search text not yet applied to the query.
    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn cooldown(&self) -> &RetryCooldown {
        &self.cooldown
    }

    /// Which contents follow the folder when its categories change.
    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    pub fn set_propagation(&mut self, propagation: Propagation) {
        self.propagation = propagation;
    }

    /// Re-request the current query, keeping the loaded page on screen.
    pub fn refresh(&mut self) {
        self.reload();
    }

    /// Show a finished assignment on the loaded page right away.
    ///
    /// Returns `true` if any row on the page was the target.
    pub fn apply_assigned(&mut self, assigned: &Assigned) -> bool {
        let FolderLoad::Loaded(detail) = &mut self.state else {
            return false;
        };
        let mut hit = false;
        match &assigned.target {
            AssignTarget::Folder { id, .. } => {
                if &detail.folder.id == id {
                    detail.folder.categories = assigned.categories.clone();
                    detail.categories = assigned.categories.clone();
                    hit = true;
                }
                for sub in detail.subfolders.iter_mut().filter(|f| &f.id == id) {
                    sub.categories = assigned.categories.clone();
                    hit = true;
                }
            }
            AssignTarget::File(id) => {
                for file in detail.files.iter_mut().filter(|f| &f.id == id) {
                    file.categories = assigned.categories.clone();
                    hit = true;
                }
            }
        }
        hit
    }

    /// Issue a request for the current query. A request already in flight
    /// is abandoned.
    fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        let id = self.folder_id.clone();
        let query = self.query.clone();
        debug!("Loading folder {} page {}", id, query.page);
        // Keep showing the previous page while the next one loads.
        if !matches!(self.state, FolderLoad::Loaded(_)) {
            self.state = FolderLoad::Loading;
        }
        self.fetch = Some(spawn_fetch("folder", move || api.folder(&id, &query)));
    }

    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if self.query.page != page {
            self.query.page = page;
            self.reload();
        }
    }

    /// Change the page size; returns to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        let page_size = page_size.max(1);
        if self.query.page_size != page_size {
            self.query.page_size = page_size;
            self.query.page = 1;
            self.reload();
        }
    }

    pub fn set_kind(&mut self, kind: Option<FileKind>) {
        if self.query.kind != kind {
            self.query.kind = kind;
            self.query.page = 1;
            self.reload();
        }
    }

    pub fn set_category(&mut self, category: Option<String>) {
        let category = category.filter(|c| !c.is_empty());
        if self.query.category != category {
            self.query.category = category;
            self.query.page = 1;
            self.reload();
        }
    }

    /// Record a keystroke in the search box. Applied by
    /// [`FolderView::process_messages`] after the debounce period.
    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.search.input(text, now);
    }

    fn apply_search(&mut self, text: String) {
        let search = Some(text.trim().to_owned()).filter(|s| !s.is_empty());
        if self.query.search != search {
            self.query.search = search;
            self.query.page = 1;
            self.reload();
        }
    }

    /// Retry the current request.
    ///
    /// A missing folder can only be retried once the cooldown has run out,
    /// and each retry restarts it. Returns `false` when the retry was refused.
    pub fn retry(&mut self, now: Instant) -> bool {
        if matches!(self.state, FolderLoad::NotFound) {
            if !self.cooldown.can_retry(now) {
                return false;
            }
            self.cooldown.start(now);
        }
        info!("Retrying folder {}", self.folder_id);
        self.state = FolderLoad::Loading;
        self.reload();
        true
    }

    /// Apply a settled search and collect a finished request.
    ///
    /// Returns `true` if anything visible changed.
    pub fn process_messages(&mut self, now: Instant, trail: &mut BreadcrumbTrail) -> bool {
        let mut changed = false;

        if let Some(text) = self.search.take_settled(now) {
            self.apply_search(text);
            changed = true;
        }

        let Some(result) = self.fetch.as_ref().and_then(|f| f.try_take()) else {
            return changed;
        };
        self.fetch = None;
        self.state = match result {
            Ok(detail) => {
                trail.on_folder_loaded(BreadcrumbNode::new(
                    detail.folder.id.clone(),
                    detail.folder.name.clone(),
                ));
                FolderLoad::Loaded(detail)
            }
            Err(e) if e.is_not_found() => {
                warn!("Folder {} not found", self.folder_id);
                FolderLoad::NotFound
            }
            Err(e) => {
                warn!("Loading folder {} failed: {}", self.folder_id, e);
                FolderLoad::Failed(e.to_string())
            }
        };
        true
    }
}
