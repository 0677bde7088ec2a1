/// Paginated top-level folder listing shown on the home screen.
use crate::api::VaultApi;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::library::{AssignTarget, Assigned};
use crate::model::FolderList;
use std::sync::Arc;
use tracing::warn;

/// Default page size of the home listing.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 20;

/// Load state of a paged listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListLoad<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ListLoad<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

pub struct FolderListView {
    api: Arc<dyn VaultApi>,
    page: u32,
    page_size: u32,
    state: ListLoad<FolderList>,
    fetch: Option<FetchHandle<FolderList>>,
}

impl FolderListView {
    /// Create the listing and request its first page.
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        let mut view = Self {
            api,
            page: 1,
            page_size: DEFAULT_LIST_PAGE_SIZE,
            state: ListLoad::Loading,
            fetch: None,
        };
        view.reload();
        view
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn state(&self) -> &ListLoad<FolderList> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    /// Number of pages for the last loaded total, at least one.
    pub fn total_pages(&self) -> u32 {
        match &self.state {
            ListLoad::Loaded(list) => {
                let pages = list.total.div_ceil(u64::from(self.page_size.max(1)));
                u32::try_from(pages).unwrap_or(u32::MAX).max(1)
            }
            _ => 1,
        }
    }

    pub fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        let (page, page_size) = (self.page, self.page_size);
        if !matches!(self.state, ListLoad::Loaded(_)) {
            self.state = ListLoad::Loading;
        }
        self.fetch = Some(spawn_fetch("folders", move || api.folders(page, page_size)));
    }

    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if self.page != page {
            self.page = page;
            self.reload();
        }
    }

    /// Change the page size; returns to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        let page_size = page_size.max(1);
        if self.page_size != page_size {
            self.page_size = page_size;
            self.page = 1;
            self.reload();
        }
    }

    /// Show a finished folder assignment on the matching row.
    pub fn apply_assigned(&mut self, assigned: &Assigned) {
        let AssignTarget::Folder { id, .. } = &assigned.target else {
            return;
        };
        if let ListLoad::Loaded(list) = &mut self.state {
            for folder in list.items.iter_mut().filter(|f| &f.id == id) {
                folder.categories = assigned.categories.clone();
            }
        }
    }

    /// Collect a finished request. Returns `true` if the state changed.
    pub fn process_messages(&mut self) -> bool {
        let Some(result) = self.fetch.as_ref().and_then(|f| f.try_take()) else {
            return false;
        };
        self.fetch = None;
        self.state = match result {
            Ok(list) => ListLoad::Loaded(list),
            Err(e) => {
                warn!("Loading folder list failed: {}", e);
                ListLoad::Failed(e.to_string())
            }
        };
        true
    }
}
