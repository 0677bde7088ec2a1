/// End-to-end tests for `AppState`, the GUI application state machine.
///
/// These exercise the real state transitions without spinning up an egui
/// window, against an in-process fake backend:
///   - scan lifecycle (start, progress, completion, dismissal)
///   - window minimise / focus handling
///   - folder navigation and the persisted breadcrumb trail
///   - not-found retry cooldown
///   - section tabs, category assignment and the connectivity check
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stlvault_core::api::VaultApi;
use stlvault_core::browse::{
    FolderLoad, JsonFileStore, MemoryStore, SegmentTarget, SessionStore, BREADCRUMB_KEY,
};
use stlvault_core::config::ApiConfig;
use stlvault_core::health::Connectivity;
use stlvault_core::library::AssignTarget;
use stlvault_core::model::{
    Category, CategoryList, CategoryRef, CreateScanResponse, FileList, FileQuery, Folder,
    FolderCategoryUpdate, FolderDetail, FolderList, FolderQuery, Pagination, Propagation,
    ScanList, ScanPath, ScanRecord, ScanStatus,
};
use stlvault_core::ApiError;
use stlvault_gui::state::{AppState, Section, View};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Fake backend: scans walk through `statuses`, folders come from a fixed
/// set of ids, and one category ("Terrain") exists.
struct FakeBackend {
    statuses: Mutex<Vec<ScanStatus>>,
    scan_calls: AtomicUsize,
    create_fails: bool,
    scans_calls: AtomicUsize,
    files_calls: AtomicUsize,
    category_calls: AtomicUsize,
    folder_updates: Mutex<Vec<(String, FolderCategoryUpdate)>>,
}

impl FakeBackend {
    fn new(statuses: &[ScanStatus]) -> Self {
        Self {
            statuses: Mutex::new(statuses.to_vec()),
            scan_calls: AtomicUsize::new(0),
            create_fails: false,
            scans_calls: AtomicUsize::new(0),
            files_calls: AtomicUsize::new(0),
            category_calls: AtomicUsize::new(0),
            folder_updates: Mutex::new(Vec::new()),
        }
    }

    fn failing_create() -> Self {
        Self {
            create_fails: true,
            ..Self::new(&[])
        }
    }

    fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    fn scans_calls(&self) -> usize {
        self.scans_calls.load(Ordering::SeqCst)
    }

    fn files_calls(&self) -> usize {
        self.files_calls.load(Ordering::SeqCst)
    }

    fn category_calls(&self) -> usize {
        self.category_calls.load(Ordering::SeqCst)
    }
}

fn terrain() -> Category {
    Category {
        id: "c1".into(),
        name: "Terrain".into(),
        created_at: None,
    }
}

fn folder(id: &str) -> Folder {
    Folder {
        id: id.to_owned(),
        name: format!("Folder {id}"),
        path: format!("/models/{id}"),
        file_count: Some(3),
        categories: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

impl VaultApi for FakeBackend {
    fn create_scan(&self) -> Result<CreateScanResponse, ApiError> {
        if self.create_fails {
            return Err(ApiError::Status {
                code: 409,
                message: "a scan is already running".into(),
            });
        }
        Ok(CreateScanResponse {
            scan_id: "scan-1".into(),
        })
    }

    fn scan(&self, id: &str) -> Result<ScanRecord, ApiError> {
        let n = self.scan_calls.fetch_add(1, Ordering::SeqCst);
        let statuses = self.statuses.lock();
        let status = statuses
            .get(n)
            .or_else(|| statuses.last())
            .copied()
            .unwrap_or_default();
        let mut record = ScanRecord::new(id, status);
        record.found = 8;
        record.processed = if status == ScanStatus::Completed { 8 } else { 2 };
        record.progress = record.processed * 100 / record.found;
        Ok(record)
    }

    fn scans(&self, _page: u32, _page_size: u32) -> Result<ScanList, ApiError> {
        self.scans_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScanList::default())
    }

    fn scan_paths(&self, id: &str) -> Result<Vec<ScanPath>, ApiError> {
        Ok(vec![ScanPath {
            id: "p1".into(),
            scan_id: id.to_owned(),
            root_path: "/models".into(),
            files_found: 8,
            files_inserted: 8,
            files_updated: 0,
            folders_found: 2,
            folders_inserted: 2,
            folders_updated: 0,
            created_at: None,
        }])
    }

    fn folders(&self, _page: u32, _page_size: u32) -> Result<FolderList, ApiError> {
        Ok(FolderList {
            items: vec![folder("a"), folder("b")],
            total: 2,
        })
    }

    fn folder(&self, id: &str, _query: &FolderQuery) -> Result<FolderDetail, ApiError> {
        if !["a", "b", "c"].contains(&id) {
            return Err(ApiError::NotFound {
                path: format!("/folders/{id}"),
            });
        }
        Ok(FolderDetail {
            folder: folder(id),
            subfolders: Vec::new(),
            files: Vec::new(),
            categories: Vec::new(),
            pagination: Pagination::default(),
        })
    }

    fn files(&self, query: &FileQuery) -> Result<FileList, ApiError> {
        self.files_calls.fetch_add(1, Ordering::SeqCst);
        Ok(FileList {
            page: query.page,
            page_size: query.page_size,
            ..FileList::default()
        })
    }

    fn categories(&self, page: u32, page_size: u32) -> Result<CategoryList, ApiError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CategoryList {
            items: vec![terrain()],
            total: 1,
            page,
            page_size,
            total_pages: 1,
        })
    }

    fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        Ok(Category {
            id: "c2".into(),
            name: name.to_owned(),
            created_at: None,
        })
    }

    fn update_category(&self, id: &str, name: &str) -> Result<Category, ApiError> {
        Ok(Category {
            id: id.to_owned(),
            name: name.to_owned(),
            created_at: None,
        })
    }

    fn delete_category(&self, _id: &str) -> Result<(), ApiError> {
        Ok(())
    }

    fn update_folder_categories(
        &self,
        id: &str,
        update: &FolderCategoryUpdate,
    ) -> Result<Vec<CategoryRef>, ApiError> {
        self.folder_updates
            .lock()
            .push((id.to_owned(), update.clone()));
        Ok(update
            .category_ids
            .iter()
            .map(|id| CategoryRef::Id(id.clone()))
            .collect())
    }

    fn update_file_categories(
        &self,
        _id: &str,
        category_ids: &[String],
    ) -> Result<Vec<CategoryRef>, ApiError> {
        Ok(category_ids.iter().map(|id| CategoryRef::Id(id.clone())).collect())
    }

    fn health(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

fn config(poll: Duration) -> ApiConfig {
    ApiConfig {
        poll_interval: poll,
        ..ApiConfig::default()
    }
}

fn new_state(api: &Arc<FakeBackend>, store: Arc<dyn SessionStore>, poll: Duration) -> AppState {
    AppState::new(api.clone(), store, &config(poll))
}

/// Pump `process_messages()` until `done` holds or five seconds pass.
fn pump_until(state: &mut AppState, what: &str, done: impl Fn(&AppState) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        state.process_messages(Instant::now());
        if done(state) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn trail_ids(state: &AppState) -> Vec<String> {
    state.trail.nodes().iter().map(|n| n.id.clone()).collect()
}

fn folder_state(state: &AppState) -> Option<FolderLoad> {
    state.folder.as_ref().map(|f| f.state().clone())
}

// ── Scan lifecycle ────────────────────────────────────────────────────────────

/// Starting a scan opens the dialog, which tracks it to completion and can
/// then be dismissed.
#[test]
fn scan_runs_to_completion_and_dismisses() {
    let api = Arc::new(FakeBackend::new(&[
        ScanStatus::Pending,
        ScanStatus::Running,
        ScanStatus::Completed,
    ]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_millis(20));
    assert!(!state.scan_view().active);
    assert!(state.can_start_scan());

    state.start_scan();
    assert!(state.is_starting_scan());
    assert!(!state.can_start_scan());

    pump_until(&mut state, "dialog to open", |s| s.scan_view().active);
    assert_eq!(state.active_scan(), Some("scan-1"));

    // The dialog cannot be closed while the scan is live.
    if !state.scan_view().status.is_terminal() {
        assert!(!state.dismiss_scan());
        assert!(state.scan_view().active);
    }

    pump_until(&mut state, "completion", |s| {
        s.scan_view().status == ScanStatus::Completed
    });
    let view = state.scan_view();
    assert_eq!(view.headline, "Scan Completed!");
    assert_eq!(view.processed, 8);
    assert!(view.closable);
    assert!(state.can_start_scan());

    assert!(state.dismiss_scan());
    assert!(!state.scan_view().active);
    assert_eq!(state.active_scan(), None);

    // Stays dismissed on later frames.
    state.process_messages(Instant::now());
    assert!(!state.scan_view().active);
}

/// A rejected `POST /scan` surfaces an error and opens no dialog.
#[test]
fn scan_start_failure_is_reported() {
    let api = Arc::new(FakeBackend::failing_create());
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_millis(20));
    state.start_scan();
    pump_until(&mut state, "start failure", |s| s.scan_start_error.is_some());
    assert!(!state.scan_view().active);
    assert!(state.can_start_scan());
    assert!(state
        .scan_start_error
        .as_deref()
        .is_some_and(|e| e.contains("already running")));
}

/// Minimising stops polling; regaining focus polls immediately.
#[test]
fn window_state_drives_polling() {
    let api = Arc::new(FakeBackend::new(&[ScanStatus::Running]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(60));

    state.observe_window(true, false);
    state.start_scan();
    pump_until(&mut state, "dialog to open", |s| s.scan_view().active);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(api.scan_calls(), 0, "no polls while minimised");

    // Restored but not yet focused: visibility alone resumes polling.
    state.observe_window(false, false);
    pump_until(&mut state, "first poll", |_| api.scan_calls() == 1);

    // Focus regained: immediate refresh despite the long interval.
    state.observe_window(false, true);
    pump_until(&mut state, "refresh on focus", |_| api.scan_calls() == 2);

    // Staying focused does not trigger further refreshes.
    state.observe_window(false, true);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(api.scan_calls(), 2);
}

/// Restoring and focusing the window in the same frame polls once, not
/// twice.
#[test]
fn restore_with_focus_polls_once() {
    let api = Arc::new(FakeBackend::new(&[ScanStatus::Running]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(60));

    state.observe_window(true, false);
    state.start_scan();
    pump_until(&mut state, "dialog to open", |s| s.scan_view().active);
    assert_eq!(api.scan_calls(), 0);

    state.observe_window(false, true);
    pump_until(&mut state, "poll on restore", |_| api.scan_calls() == 1);
    std::thread::sleep(Duration::from_millis(100));
    state.process_messages(Instant::now());
    assert_eq!(api.scan_calls(), 1);
}

// ── Navigation ────────────────────────────────────────────────────────────────

/// Fresh sessions start on the home listing.
#[test]
fn starts_on_home_listing() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    assert_eq!(state.view(), View::Home);
    pump_until(&mut state, "folder list", |s| !s.home.is_loading());
}

/// Opening folders builds the trail; breadcrumb clicks truncate it; home
/// clears it from the store.
#[test]
fn navigation_updates_trail() {
    let api = Arc::new(FakeBackend::new(&[]));
    let store = Arc::new(MemoryStore::new());
    let mut state = new_state(&api, store.clone(), Duration::from_secs(2));

    for id in ["a", "b", "c"] {
        state.open_folder(id);
        pump_until(&mut state, "folder load", |s| {
            s.trail.current().is_some_and(|n| n.id == id)
        });
    }
    assert_eq!(trail_ids(&state), ["a", "b", "c"]);
    assert_eq!(state.view(), View::Folder);

    state.navigate(SegmentTarget::Folder("a".into()));
    pump_until(&mut state, "jump back", |s| s.trail.nodes().len() == 1);
    assert_eq!(trail_ids(&state), ["a"]);

    state.navigate(SegmentTarget::Home);
    assert_eq!(state.view(), View::Home);
    assert!(state.trail.is_empty());
    assert_eq!(store.get(BREADCRUMB_KEY), None);
}

/// A saved trail reopens its last folder on start-up.
#[test]
fn restores_last_folder_from_session() {
    let tmp = TempDir::new().unwrap();
    let api = Arc::new(FakeBackend::new(&[]));
    {
        let store = Arc::new(JsonFileStore::open(tmp.path()).unwrap());
        let mut state = new_state(&api, store, Duration::from_secs(2));
        state.open_folder("a");
        pump_until(&mut state, "a", |s| s.trail.nodes().len() == 1);
        state.open_folder("b");
        pump_until(&mut state, "b", |s| s.trail.nodes().len() == 2);
    }

    let store = Arc::new(JsonFileStore::open(tmp.path()).unwrap());
    let state = new_state(&api, store, Duration::from_secs(2));
    assert_eq!(state.view(), View::Folder);
    assert_eq!(state.folder.as_ref().map(|f| f.folder_id()), Some("b"));
    assert_eq!(trail_ids(&state), ["a", "b"]);
}

/// A missing folder shows not-found, keeps the trail, and rate-limits retry.
#[test]
fn missing_folder_retry_cooldown() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    state.open_folder("a");
    pump_until(&mut state, "a", |s| s.trail.nodes().len() == 1);

    state.open_folder("gone");
    pump_until(&mut state, "not found", |s| {
        folder_state(s) == Some(FolderLoad::NotFound)
    });
    assert_eq!(trail_ids(&state), ["a"]);

    let now = Instant::now();
    assert!(state.retry_folder(now));
    pump_until(&mut state, "retry result", |s| {
        s.folder.as_ref().is_some_and(|f| !f.is_loading())
    });
    assert!(!state.retry_folder(now + Duration::from_secs(5)));
    assert!(state.retry_folder(now + Duration::from_secs(31)));
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Library screens are created on first visit and reloaded on the next.
#[test]
fn sections_load_on_demand() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    assert_eq!(state.section(), Section::Library);
    assert!(state.dashboard.is_none() && state.files.is_none());

    state.show(Section::Dashboard);
    assert_eq!(state.view(), View::Dashboard);
    pump_until(&mut state, "dashboard", |s| {
        s.dashboard.as_ref().is_some_and(|d| !d.is_loading())
    });
    assert_eq!(api.scans_calls(), 1);

    state.show(Section::Files);
    assert_eq!(state.view(), View::Files);
    pump_until(&mut state, "files", |s| {
        s.files.as_ref().is_some_and(|f| !f.is_loading())
    });
    let files_calls = api.files_calls();

    state.show(Section::Dashboard);
    pump_until(&mut state, "dashboard reload", |s| {
        s.dashboard.as_ref().is_some_and(|d| !d.is_loading())
    });
    assert_eq!(api.scans_calls(), 2);

    state.show(Section::Files);
    pump_until(&mut state, "files reload", |s| {
        s.files.as_ref().is_some_and(|f| !f.is_loading())
    });
    assert_eq!(api.files_calls(), files_calls + 1);

    state.show(Section::Categories);
    assert_eq!(state.view(), View::Categories);
    pump_until(&mut state, "category page", |s| {
        s.category_admin.as_ref().is_some_and(|a| !a.is_loading())
    });
}

/// Opening a folder from any tab switches back to the library.
#[test]
fn opening_folder_returns_to_library() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    state.show(Section::Files);
    state.open_folder("a");
    assert_eq!(state.section(), Section::Library);
    assert_eq!(state.view(), View::Folder);
}

/// The category catalog loads at start-up and reloads after an edit on the
/// categories screen.
#[test]
fn category_edits_reload_catalog() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    pump_until(&mut state, "catalog", |s| !s.categories.is_loading());
    assert_eq!(state.categories.categories(), [terrain()]);
    let before = api.category_calls();

    state.show(Section::Categories);
    pump_until(&mut state, "category page", |s| {
        s.category_admin.as_ref().is_some_and(|a| !a.is_loading())
    });
    let admin = state.category_admin.as_mut().unwrap();
    admin.open_create();
    admin.editor_mut().unwrap().name = "Scenery".into();
    assert!(admin.submit());

    // Page reload plus catalog reload.
    pump_until(&mut state, "catalog reload", |s| {
        api.category_calls() >= before + 3 && !s.categories.is_loading()
    });
    assert!(state.category_admin.as_ref().unwrap().editor().is_none());
}

/// Assigning categories to the open folder shows them right away and
/// refreshes the folder.
#[test]
fn folder_assignment_updates_open_folder() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    state.open_folder("a");
    pump_until(&mut state, "folder", |s| s.trail.nodes().len() == 1);

    state.assign_categories(
        AssignTarget::Folder {
            id: "a".into(),
            propagation: Propagation::default(),
        },
        vec!["c1".into()],
    );
    assert!(state.assigner.is_busy());
    pump_until(&mut state, "assignment", |s| {
        !s.assigner.is_busy() && s.folder.as_ref().is_some_and(|f| !f.is_loading())
    });
    assert_eq!(state.assign_error(), None);
    let updates = api.folder_updates.lock().clone();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].1.apply_to_stl && !updates[0].1.apply_to_subfolders);
}

/// Four categories are refused before anything is sent.
#[test]
fn oversized_assignment_is_refused() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    let ids = ["c1", "c2", "c3", "c4"].iter().map(|s| s.to_string()).collect();
    state.assign_categories(AssignTarget::File("m1".into()), ids);
    assert!(!state.assigner.is_busy());
    assert!(state.assign_error().is_some_and(|e| e.contains("at most 3")));
}

/// The first health check runs at start-up.
#[test]
fn health_check_runs_at_startup() {
    let api = Arc::new(FakeBackend::new(&[]));
    let mut state = new_state(&api, Arc::new(MemoryStore::new()), Duration::from_secs(2));
    pump_until(&mut state, "health", |s| s.health.state() == &Connectivity::Online);
}
