#![allow(dead_code)]

/// In-process [`VaultApi`] fake shared by the integration tests.
///
/// Scan polls walk through a scripted list of responses; once the script is
/// exhausted the last entry repeats. Folder requests answer from a map and
/// record every query they were called with. Files and categories live in
/// plain vectors; `fail_writes` makes every mutating call fail.
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use stlvault_core::api::VaultApi;
use stlvault_core::model::{
    Category, CategoryList, CategoryRef, CreateScanResponse, FileKind, FileList, FileQuery,
    Folder, FolderCategoryUpdate, FolderDetail, FolderList, FolderQuery, ModelFile, Pagination,
    ScanList, ScanPath, ScanRecord, ScanStatus,
};
use stlvault_core::ApiError;

#[derive(Default)]
pub struct FakeApi {
    scan_script: Mutex<Vec<Result<ScanRecord, ApiError>>>,
    scan_calls: AtomicUsize,
    paths: Mutex<Vec<ScanPath>>,
    paths_calls: AtomicUsize,
    folders: Mutex<HashMap<String, FolderDetail>>,
    folder_queries: Mutex<Vec<(String, FolderQuery)>>,
    list: Mutex<FolderList>,
    list_calls: AtomicUsize,
    scans: Mutex<ScanList>,
    scans_calls: Mutex<Vec<(u32, u32)>>,
    files: Mutex<Vec<ModelFile>>,
    file_queries: Mutex<Vec<FileQuery>>,
    categories: Mutex<Vec<Category>>,
    category_pages: Mutex<Vec<(u32, u32)>>,
    next_category: AtomicUsize,
    folder_updates: Mutex<Vec<(String, FolderCategoryUpdate)>>,
    file_updates: Mutex<Vec<(String, Vec<String>)>>,
    fail_writes: Mutex<Option<ApiError>>,
    health_error: Mutex<Option<ApiError>>,
    health_calls: AtomicUsize,
    write_delay: Mutex<Duration>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan polls answer with these records, in order.
    pub fn with_statuses(id: &str, statuses: &[ScanStatus]) -> Self {
        let api = Self::new();
        api.script(statuses.iter().map(|s| Ok(record(id, *s))).collect());
        api
    }

    pub fn script(&self, responses: Vec<Result<ScanRecord, ApiError>>) {
        *self.scan_script.lock() = responses;
    }

    pub fn set_paths(&self, paths: Vec<ScanPath>) {
        *self.paths.lock() = paths;
    }

    pub fn add_folder(&self, id: &str, name: &str) {
        self.folders.lock().insert(id.to_owned(), folder_detail(id, name));
    }

    pub fn set_list(&self, list: FolderList) {
        *self.list.lock() = list;
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn paths_calls(&self) -> usize {
        self.paths_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn folder_queries(&self) -> Vec<(String, FolderQuery)> {
        self.folder_queries.lock().clone()
    }

    pub fn set_scans(&self, scans: Vec<ScanRecord>) {
        let mut list = self.scans.lock();
        list.total = scans.len() as u64;
        list.items = scans;
    }

    pub fn scans_calls(&self) -> Vec<(u32, u32)> {
        self.scans_calls.lock().clone()
    }

    pub fn set_files(&self, files: Vec<ModelFile>) {
        *self.files.lock() = files;
    }

    pub fn file_queries(&self) -> Vec<FileQuery> {
        self.file_queries.lock().clone()
    }

    pub fn add_category(&self, id: &str, name: &str) {
        self.categories.lock().push(category(id, name));
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.lock().iter().map(|c| c.name.clone()).collect()
    }

    pub fn category_pages(&self) -> Vec<(u32, u32)> {
        self.category_pages.lock().clone()
    }

    pub fn folder_updates(&self) -> Vec<(String, FolderCategoryUpdate)> {
        self.folder_updates.lock().clone()
    }

    pub fn file_updates(&self) -> Vec<(String, Vec<String>)> {
        self.file_updates.lock().clone()
    }

    /// Make every create, rename, delete and assignment fail with `error`.
    pub fn fail_writes(&self, error: Option<ApiError>) {
        *self.fail_writes.lock() = error;
    }

    /// Hold every mutating call for `delay` before answering.
    pub fn delay_writes(&self, delay: Duration) {
        *self.write_delay.lock() = delay;
    }

    pub fn set_health(&self, error: Option<ApiError>) {
        *self.health_error.lock() = error;
    }

    pub fn health_calls(&self) -> usize {
        self.health_calls.load(Ordering::SeqCst)
    }

    fn write(&self) -> Result<(), ApiError> {
        let delay = *self.write_delay.lock();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        match self.fail_writes.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn resolve(&self, ids: &[String]) -> Vec<CategoryRef> {
        let categories = self.categories.lock();
        ids.iter()
            .map(|id| match categories.iter().find(|c| &c.id == id) {
                Some(c) => CategoryRef::Full(c.clone()),
                None => CategoryRef::Id(id.clone()),
            })
            .collect()
    }
}

impl VaultApi for FakeApi {
    fn create_scan(&self) -> Result<CreateScanResponse, ApiError> {
        Ok(CreateScanResponse {
            scan_id: "scan-new".into(),
        })
    }

    fn scan(&self, id: &str) -> Result<ScanRecord, ApiError> {
        let n = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.scan_script.lock();
        match script.get(n).or_else(|| script.last()) {
            Some(response) => response.clone(),
            None => Err(ApiError::NotFound {
                path: format!("/scans/{id}"),
            }),
        }
    }

    fn scans(&self, page: u32, page_size: u32) -> Result<ScanList, ApiError> {
        self.scans_calls.lock().push((page, page_size));
        let mut list = self.scans.lock().clone();
        list.items.truncate(page_size as usize);
        Ok(list)
    }

    fn scan_paths(&self, _id: &str) -> Result<Vec<ScanPath>, ApiError> {
        self.paths_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.paths.lock().clone())
    }

    fn folders(&self, _page: u32, _page_size: u32) -> Result<FolderList, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.list.lock().clone())
    }

    fn folder(&self, id: &str, query: &FolderQuery) -> Result<FolderDetail, ApiError> {
        self.folder_queries
            .lock()
            .push((id.to_owned(), query.clone()));
        self.folders
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                path: format!("/folders/{id}"),
            })
    }

    fn files(&self, query: &FileQuery) -> Result<FileList, ApiError> {
        self.file_queries.lock().push(query.clone());
        let matching: Vec<ModelFile> = self
            .files
            .lock()
            .iter()
            .filter(|f| query.kind.map_or(true, |k| f.kind == k))
            .filter(|f| {
                query
                    .text
                    .as_deref()
                    .map_or(true, |t| f.file_name.contains(t))
            })
            .cloned()
            .collect();
        Ok(FileList {
            total: matching.len() as u64,
            items: page_of(matching, query.page, query.page_size),
            page: query.page,
            page_size: query.page_size,
        })
    }

    fn categories(&self, page: u32, page_size: u32) -> Result<CategoryList, ApiError> {
        self.category_pages.lock().push((page, page_size));
        let all = self.categories.lock().clone();
        let total = all.len() as u64;
        Ok(CategoryList {
            items: page_of(all, page, page_size),
            total,
            page,
            page_size,
            total_pages: total.div_ceil(u64::from(page_size.max(1))) as u32,
        })
    }

    fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        self.write()?;
        let n = self.next_category.fetch_add(1, Ordering::SeqCst);
        let created = category(&format!("cat-{n}"), name);
        self.categories.lock().push(created.clone());
        Ok(created)
    }

    fn update_category(&self, id: &str, name: &str) -> Result<Category, ApiError> {
        self.write()?;
        let mut categories = self.categories.lock();
        let found = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ApiError::NotFound {
                path: format!("/categories/{id}"),
            })?;
        found.name = name.to_owned();
        Ok(found.clone())
    }

    fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.write()?;
        let mut categories = self.categories.lock();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            return Err(ApiError::NotFound {
                path: format!("/categories/{id}"),
            });
        }
        Ok(())
    }

    fn update_folder_categories(
        &self,
        id: &str,
        update: &FolderCategoryUpdate,
    ) -> Result<Vec<CategoryRef>, ApiError> {
        self.write()?;
        self.folder_updates
            .lock()
            .push((id.to_owned(), update.clone()));
        Ok(self.resolve(&update.category_ids))
    }

    fn update_file_categories(
        &self,
        id: &str,
        category_ids: &[String],
    ) -> Result<Vec<CategoryRef>, ApiError> {
        self.write()?;
        self.file_updates
            .lock()
            .push((id.to_owned(), category_ids.to_vec()));
        Ok(self.resolve(category_ids))
    }

    fn health(&self) -> Result<(), ApiError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        match self.health_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn page_of<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let size = page_size.max(1) as usize;
    let skip = (page.max(1) as usize - 1) * size;
    items.into_iter().skip(skip).take(size).collect()
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_owned(),
        name: name.to_owned(),
        created_at: None,
    }
}

pub fn model_file(id: &str, name: &str, kind: FileKind, size: u64) -> ModelFile {
    ModelFile {
        id: id.to_owned(),
        path: format!("/models/{name}"),
        file_name: name.to_owned(),
        kind,
        size,
        modified_at: None,
        categories: Vec::new(),
    }
}

pub fn record(id: &str, status: ScanStatus) -> ScanRecord {
    let mut r = ScanRecord::new(id, status);
    if status != ScanStatus::Pending {
        r.found = 10;
        r.processed = if status == ScanStatus::Running { 4 } else { 10 };
        r.progress = r.processed * 10;
    }
    r
}

pub fn folder(id: &str, name: &str) -> Folder {
    Folder {
        id: id.to_owned(),
        name: name.to_owned(),
        path: format!("/models/{name}"),
        file_count: None,
        categories: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn folder_detail(id: &str, name: &str) -> FolderDetail {
    FolderDetail {
        folder: folder(id, name),
        subfolders: Vec::new(),
        files: Vec::new(),
        categories: Vec::new(),
        pagination: Pagination {
            total: 0,
            page: 1,
            page_size: 50,
            total_pages: 1,
        },
    }
}

/// Call `f` until it returns `true`, panicking after five seconds.
pub fn wait_until<F: FnMut() -> bool>(what: &str, mut f: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if f() {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}
