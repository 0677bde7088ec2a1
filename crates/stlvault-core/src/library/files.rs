/// State behind the library-wide file listing.
use super::assign::{AssignTarget, Assigned};
use crate::api::VaultApi;
use crate::browse::ListLoad;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::model::{FileKind, FileList, FileQuery};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct FileListView {
    api: Arc<dyn VaultApi>,
    query: FileQuery,
    state: ListLoad<FileList>,
    fetch: Option<FetchHandle<FileList>>,
}

impl FileListView {
    /// Create the listing and request its first page.
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        let mut view = Self {
            api,
            query: FileQuery::default(),
            state: ListLoad::Loading,
            fetch: None,
        };
        view.reload();
        view
    }

    pub fn query(&self) -> &FileQuery {
        &self.query
    }

    pub fn state(&self) -> &ListLoad<FileList> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    /// Re-request the current page, keeping the old rows on screen.
    pub fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        let query = self.query.clone();
        debug!("Loading files page {}", query.page);
        if !matches!(self.state, ListLoad::Loaded(_)) {
            self.state = ListLoad::Loading;
        }
        self.fetch = Some(spawn_fetch("files", move || api.files(&query)));
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

    /// Apply submitted search text. Blank text clears the search.
    pub fn set_text(&mut self, text: &str) {
        let text = Some(text.trim().to_owned()).filter(|t| !t.is_empty());
        if self.query.text != text {
            self.query.text = text;
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

    /// Show a finished assignment on the matching row right away.
    pub fn apply_assigned(&mut self, assigned: &Assigned) {
        let AssignTarget::File(id) = &assigned.target else {
            return;
        };
        if let ListLoad::Loaded(list) = &mut self.state {
            for file in list.items.iter_mut().filter(|f| &f.id == id) {
                file.categories = assigned.categories.clone();
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
                warn!("Loading files failed: {}", e);
                ListLoad::Failed(e.to_string())
            }
        };
        true
    }
}
