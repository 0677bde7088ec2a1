/// Categories: the full catalog used by pickers and filters, and the paged
/// management screen with its create/rename form.
use crate::api::VaultApi;
use crate::browse::ListLoad;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::model::{validate_category_name, Category, CategoryList};
use std::sync::Arc;
use tracing::{info, warn};

/// Page size used to fetch the catalog in one request.
pub const CATALOG_PAGE_SIZE: u32 = 100;

/// Default page size of the management screen.
pub const DEFAULT_CATEGORY_PAGE_SIZE: u32 = 20;

/// Every category, for filter combos and assignment pickers.
pub struct CategoryCatalog {
    api: Arc<dyn VaultApi>,
    state: ListLoad<CategoryList>,
    fetch: Option<FetchHandle<CategoryList>>,
}

impl CategoryCatalog {
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        let mut catalog = Self {
            api,
            state: ListLoad::Loading,
            fetch: None,
        };
        catalog.reload();
        catalog
    }

    pub fn state(&self) -> &ListLoad<CategoryList> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    /// Loaded categories; empty until the first load succeeds.
    pub fn categories(&self) -> &[Category] {
        self.state.loaded().map(|l| l.items.as_slice()).unwrap_or_default()
    }

    pub fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        if !matches!(self.state, ListLoad::Loaded(_)) {
            self.state = ListLoad::Loading;
        }
        self.fetch = Some(spawn_fetch("categories", move || {
            api.categories(1, CATALOG_PAGE_SIZE)
        }));
    }

    pub fn process_messages(&mut self) -> bool {
        let Some(result) = self.fetch.as_ref().and_then(|f| f.try_take()) else {
            return false;
        };
        self.fetch = None;
        self.state = match result {
            Ok(list) => ListLoad::Loaded(list),
            Err(e) => {
                warn!("Loading categories failed: {}", e);
                ListLoad::Failed(e.to_string())
            }
        };
        true
    }
}

/// Create or rename form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEditor {
    /// Category being renamed; `None` when creating.
    pub editing: Option<Category>,
    pub name: String,
    pub error: Option<String>,
}

impl CategoryEditor {
    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Category"
        } else {
            "Create Category"
        }
    }
}

/// State behind the category management screen.
pub struct CategoryManager {
    api: Arc<dyn VaultApi>,
    page: u32,
    page_size: u32,
    state: ListLoad<CategoryList>,
    fetch: Option<FetchHandle<CategoryList>>,
    editor: Option<CategoryEditor>,
    save: Option<FetchHandle<Category>>,
    delete: Option<(String, FetchHandle<()>)>,
    action_error: Option<String>,
    mutated: bool,
}

impl CategoryManager {
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        let mut manager = Self {
            api,
            page: 1,
            page_size: DEFAULT_CATEGORY_PAGE_SIZE,
            state: ListLoad::Loading,
            fetch: None,
            editor: None,
            save: None,
            delete: None,
            action_error: None,
            mutated: false,
        };
        manager.reload();
        manager
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn state(&self) -> &ListLoad<CategoryList> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.save.is_some()
    }

    /// Id of the category being deleted.
    pub fn deleting(&self) -> Option<&str> {
        self.delete.as_ref().map(|(id, _)| id.as_str())
    }

    /// Last failed delete.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn editor(&self) -> Option<&CategoryEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut CategoryEditor> {
        self.editor.as_mut()
    }

    /// Whether a create, rename or delete succeeded since the last call.
    pub fn take_mutated(&mut self) -> bool {
        std::mem::take(&mut self.mutated)
    }

    pub fn reload(&mut self) {
        let api = Arc::clone(&self.api);
        let (page, page_size) = (self.page, self.page_size);
        if !matches!(self.state, ListLoad::Loaded(_)) {
            self.state = ListLoad::Loading;
        }
        self.fetch = Some(spawn_fetch("category-page", move || {
            api.categories(page, page_size)
        }));
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

    pub fn open_create(&mut self) {
        self.editor = Some(CategoryEditor {
            editing: None,
            name: String::new(),
            error: None,
        });
    }

    pub fn open_edit(&mut self, category: Category) {
        self.editor = Some(CategoryEditor {
            name: category.name.clone(),
            editing: Some(category),
            error: None,
        });
    }

    /// Close the form. A save already sent still completes.
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validate the form and send it. Returns `false` if nothing was sent.
    pub fn submit(&mut self) -> bool {
        if self.save.is_some() {
            return false;
        }
        let Some(editor) = self.editor.as_mut() else {
            return false;
        };
        let name = match validate_category_name(&editor.name) {
            Ok(name) => name,
            Err(e) => {
                editor.error = Some(e.to_string());
                return false;
            }
        };
        editor.error = None;

        let api = Arc::clone(&self.api);
        let handle = match editor.editing.as_ref().map(|c| c.id.clone()) {
            Some(id) => {
                info!("Renaming category {} to {:?}", id, name);
                spawn_fetch("category-save", move || api.update_category(&id, &name))
            }
            None => {
                info!("Creating category {:?}", name);
                spawn_fetch("category-save", move || api.create_category(&name))
            }
        };
        self.save = Some(handle);
        true
    }

    /// Delete `id`. Returns `false` while another delete is in flight.
    pub fn delete(&mut self, id: &str) -> bool {
        if self.delete.is_some() {
            return false;
        }
        info!("Deleting category {}", id);
        self.action_error = None;
        let api = Arc::clone(&self.api);
        let owned = id.to_owned();
        let handle = spawn_fetch("category-delete", move || api.delete_category(&owned));
        self.delete = Some((id.to_owned(), handle));
        true
    }

    /// Collect finished requests. Returns `true` if anything changed.
    pub fn process_messages(&mut self) -> bool {
        let mut changed = false;

        if let Some(result) = self.save.as_ref().and_then(|f| f.try_take()) {
            self.save = None;
            changed = true;
            match result {
                Ok(saved) => {
                    info!("Saved category {}", saved.id);
                    self.editor = None;
                    self.mutated = true;
                    self.reload();
                }
                Err(e) => {
                    warn!("Saving category failed: {}", e);
                    if let Some(editor) = self.editor.as_mut() {
                        editor.error = Some(e.to_string());
                    } else {
                        self.action_error = Some(e.to_string());
                    }
                }
            }
        }

        if let Some(result) = self.delete.as_ref().and_then(|(_, f)| f.try_take()) {
            self.delete = None;
            changed = true;
            match result {
                Ok(()) => {
                    self.mutated = true;
                    self.reload();
                }
                Err(e) => {
                    warn!("Deleting category failed: {}", e);
                    self.action_error = Some(e.to_string());
                }
            }
        }

        if let Some(result) = self.fetch.as_ref().and_then(|f| f.try_take()) {
            self.fetch = None;
            changed = true;
            match result {
                // The last row of a trailing page was deleted.
                Ok(list) if list.items.is_empty() && self.page > 1 => {
                    self.page -= 1;
                    self.state = ListLoad::Loaded(list);
                    self.reload();
                }
                Ok(list) => self.state = ListLoad::Loaded(list),
                Err(e) => {
                    warn!("Loading categories failed: {}", e);
                    self.state = ListLoad::Failed(e.to_string());
                }
            }
        }

        changed
    }
}
