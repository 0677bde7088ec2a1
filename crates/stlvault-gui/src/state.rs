/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. Background
/// requests report back over channels; everything is collected in
/// [`AppState::process_messages`], which runs once per frame.
use std::sync::Arc;
use std::time::Instant;
use stlvault_core::api::VaultApi;
use stlvault_core::browse::{
    BreadcrumbTrail, FolderListView, FolderView, SegmentTarget, SessionStore,
};
use stlvault_core::config::ApiConfig;
use stlvault_core::fetch::{spawn_fetch, FetchHandle};
use stlvault_core::health::HealthMonitor;
use stlvault_core::library::{
    AssignTarget, CategoryAssigner, CategoryCatalog, CategoryManager, Dashboard, FileListView,
};
use stlvault_core::model::{Category, CreateScanResponse};
use stlvault_core::scan::{ScanMonitor, TrackerView};
use tracing::{info, warn};

/// Top-level tabs in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Folder listing and folder contents.
    Library,
    Dashboard,
    Files,
    Categories,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Library,
        Section::Dashboard,
        Section::Files,
        Section::Categories,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Library => "📚 Library",
            Self::Dashboard => "📊 Dashboard",
            Self::Files => "📄 Files",
            Self::Categories => "🏷 Categories",
        }
    }
}

/// Which screen the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    /// Top-level folder listing.
    Home,
    /// Contents of one folder.
    Folder,
    Files,
    Categories,
}

/// All application state.
pub struct AppState {
    api: Arc<dyn VaultApi>,
    /// Base URL shown in the status bar.
    pub base_url: String,
    section: Section,

    // ── Scan ───────────────────────────────────────────
    pub scan: ScanMonitor,
    /// Scan whose progress dialog is open.
    active_scan: Option<String>,
    create_scan: Option<FetchHandle<CreateScanResponse>>,
    /// Failure to start a scan.
    pub scan_start_error: Option<String>,

    // ── Browse ─────────────────────────────────────────
    pub trail: BreadcrumbTrail,
    pub home: FolderListView,
    pub folder: Option<FolderView>,

    // ── Library screens, created on first visit ────────
    pub dashboard: Option<Dashboard>,
    pub files: Option<FileListView>,
    pub category_admin: Option<CategoryManager>,
    /// Category awaiting delete confirmation.
    pub confirm_delete: Option<Category>,

    // ── Categories ─────────────────────────────────────
    pub categories: CategoryCatalog,
    pub assigner: CategoryAssigner,
    /// Assignment refused before it was sent.
    assign_refused: Option<String>,

    // ── Connectivity ───────────────────────────────────
    pub health: HealthMonitor,

    // ── Window ─────────────────────────────────────────
    window_visible: bool,
    window_focused: bool,

    // ── Theme ──────────────────────────────────────────
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,
}

impl AppState {
    /// Create the initial state and issue the first requests.
    ///
    /// If the session store holds a breadcrumb trail, the folder at its end
    /// is reopened; otherwise the app starts on the home listing.
    pub fn new(api: Arc<dyn VaultApi>, store: Arc<dyn SessionStore>, config: &ApiConfig) -> Self {
        let trail = BreadcrumbTrail::initialize(store);
        let folder = trail
            .current()
            .map(|node| FolderView::open(Arc::clone(&api), node.id.clone()));

        Self {
            scan: ScanMonitor::new(Arc::clone(&api), config.poll_interval),
            home: FolderListView::new(Arc::clone(&api)),
            categories: CategoryCatalog::new(Arc::clone(&api)),
            assigner: CategoryAssigner::new(Arc::clone(&api)),
            health: HealthMonitor::new(Arc::clone(&api), Instant::now()),
            base_url: config.base_url.clone(),
            section: Section::Library,
            active_scan: None,
            create_scan: None,
            scan_start_error: None,
            trail,
            folder,
            dashboard: None,
            files: None,
            category_admin: None,
            confirm_delete: None,
            assign_refused: None,
            window_visible: true,
            window_focused: true,
            dark_mode: true,
            api,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn view(&self) -> View {
        match self.section {
            Section::Library if self.folder.is_some() => View::Folder,
            Section::Library => View::Home,
            Section::Dashboard => View::Dashboard,
            Section::Files => View::Files,
            Section::Categories => View::Categories,
        }
    }

    /// Switch tabs. A screen is created on its first visit and reloaded on
    /// later ones.
    pub fn show(&mut self, section: Section) {
        self.section = section;
        match section {
            Section::Library => {}
            Section::Dashboard => match self.dashboard.as_mut() {
                Some(dashboard) => dashboard.reload(),
                None => self.dashboard = Some(Dashboard::new(Arc::clone(&self.api))),
            },
            Section::Files => match self.files.as_mut() {
                Some(files) => files.reload(),
                None => self.files = Some(FileListView::new(Arc::clone(&self.api))),
            },
            Section::Categories => match self.category_admin.as_mut() {
                Some(admin) => admin.reload(),
                None => self.category_admin = Some(CategoryManager::new(Arc::clone(&self.api))),
            },
        }
    }

    pub fn active_scan(&self) -> Option<&str> {
        self.active_scan.as_deref()
    }

    /// A scan can be started unless one is being created or still running.
    pub fn can_start_scan(&self) -> bool {
        self.create_scan.is_none() && (self.active_scan.is_none() || self.scan.view().closable)
    }

    pub fn is_starting_scan(&self) -> bool {
        self.create_scan.is_some()
    }

    /// `POST /scan` in the background; the dialog opens once the id arrives.
    pub fn start_scan(&mut self) {
        if !self.can_start_scan() {
            return;
        }
        info!("Requesting a new scan");
        self.scan_start_error = None;
        let api = Arc::clone(&self.api);
        self.create_scan = Some(spawn_fetch("create-scan", move || api.create_scan()));
    }

    /// Progress dialog view model for the current frame.
    pub fn scan_view(&self) -> TrackerView {
        self.scan.view()
    }

    /// Close the progress dialog. Ignored while the scan is still live.
    pub fn dismiss_scan(&mut self) -> bool {
        if self.scan.request_dismiss() {
            self.active_scan = None;
            // The listing and totals may have changed underneath us.
            self.home.reload();
            if let Some(dashboard) = self.dashboard.as_mut() {
                dashboard.reload();
            }
            true
        } else {
            false
        }
    }

    /// Feed the window state of this frame.
    ///
    /// Minimising suspends polling; regaining focus triggers an immediate
    /// re-poll unless the same frame restored the window, which already
    /// polls on resume.
    pub fn observe_window(&mut self, minimized: bool, focused: bool) {
        let resumed = !self.window_visible && !minimized;
        self.set_window_visible(!minimized);
        if focused && !self.window_focused && !resumed {
            self.window_focus_regained();
        }
        self.window_focused = focused;
    }

    pub fn set_window_visible(&mut self, visible: bool) {
        if self.window_visible != visible {
            self.window_visible = visible;
            self.scan.set_visible(visible);
        }
    }

    pub fn window_focus_regained(&mut self) {
        self.scan.refresh_now();
    }

    pub fn open_folder(&mut self, id: &str) {
        self.section = Section::Library;
        if self.folder.as_ref().map(FolderView::folder_id) == Some(id) {
            return;
        }
        self.folder = Some(FolderView::open(Arc::clone(&self.api), id));
    }

    pub fn go_home(&mut self) {
        self.section = Section::Library;
        self.trail.on_navigate_home();
        self.folder = None;
    }

    /// Follow a breadcrumb segment.
    pub fn navigate(&mut self, target: SegmentTarget) {
        match target {
            SegmentTarget::Home => self.go_home(),
            SegmentTarget::Folder(id) => self.open_folder(&id),
        }
    }

    /// Retry the current folder request. Returns `false` if refused.
    pub fn retry_folder(&mut self, now: Instant) -> bool {
        self.folder.as_mut().is_some_and(|f| f.retry(now))
    }

    /// Replace the categories of a folder or file.
    pub fn assign_categories(&mut self, target: AssignTarget, category_ids: Vec<String>) {
        self.assign_refused = match self.assigner.assign(target, category_ids) {
            Ok(()) => None,
            Err(e) => {
                warn!("Category assignment refused: {}", e);
                Some(e.to_string())
            }
        };
    }

    /// Push the open folder's categories down to its contents.
    pub fn sync_open_folder(&mut self) {
        let Some(folder) = self.folder.as_ref() else {
            return;
        };
        let Some(detail) = folder.detail() else {
            return;
        };
        let result = self.assigner.sync_folder(
            &detail.folder.id,
            &detail.folder.categories,
            folder.propagation(),
        );
        self.assign_refused = result.err().map(|e| e.to_string());
    }

    /// Why the last assignment did not happen.
    pub fn assign_error(&self) -> Option<&str> {
        self.assign_refused
            .as_deref()
            .or_else(|| self.assigner.last_error())
    }

    /// Delete the category awaiting confirmation.
    pub fn confirm_category_delete(&mut self) {
        let Some(category) = self.confirm_delete.take() else {
            return;
        };
        if let Some(admin) = self.category_admin.as_mut() {
            admin.delete(&category.id);
        }
    }

    /// Whether anything is in flight that needs frames to be drawn.
    pub fn is_busy(&self) -> bool {
        self.create_scan.is_some()
            || self.scan.is_polling()
            || self.home.is_loading()
            || self
                .folder
                .as_ref()
                .is_some_and(|f| f.is_loading() || f.is_search_pending())
            || self.categories.is_loading()
            || self.assigner.is_busy()
            || self.health.is_checking()
            || self.dashboard.as_ref().is_some_and(Dashboard::is_loading)
            || self.files.as_ref().is_some_and(FileListView::is_loading)
            || self
                .category_admin
                .as_ref()
                .is_some_and(|a| a.is_loading() || a.is_saving() || a.deleting().is_some())
    }

    /// Collect background results. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint.
    pub fn process_messages(&mut self, now: Instant) -> bool {
        let mut repaint = false;

        if let Some(result) = self.create_scan.as_ref().and_then(|f| f.try_take()) {
            self.create_scan = None;
            repaint = true;
            match result {
                Ok(created) => {
                    info!("Scan {} started", created.scan_id);
                    self.active_scan = Some(created.scan_id);
                }
                Err(e) => {
                    warn!("Starting a scan failed: {}", e);
                    self.scan_start_error = Some(e.to_string());
                }
            }
        }

        self.scan.observe(self.active_scan.as_deref());
        repaint |= self.scan.process_messages(now);
        repaint |= self.home.process_messages();
        if let Some(folder) = self.folder.as_mut() {
            repaint |= folder.process_messages(now, &mut self.trail);
        }

        if let Some(result) = self.assigner.process_messages() {
            repaint = true;
            if let Ok(assigned) = result {
                let folder_target = matches!(assigned.target, AssignTarget::Folder { .. });
                self.home.apply_assigned(&assigned);
                if let Some(folder) = self.folder.as_mut() {
                    folder.apply_assigned(&assigned);
                    // Propagation may have touched rows on this page.
                    if folder_target {
                        folder.refresh();
                    }
                }
                if let Some(files) = self.files.as_mut() {
                    files.apply_assigned(&assigned);
                    if folder_target {
                        files.reload();
                    }
                }
            }
        }

        if let Some(admin) = self.category_admin.as_mut() {
            repaint |= admin.process_messages();
            if admin.take_mutated() {
                self.categories.reload();
            }
        }
        repaint |= self.categories.process_messages();
        if let Some(dashboard) = self.dashboard.as_mut() {
            repaint |= dashboard.process_messages();
        }
        if let Some(files) = self.files.as_mut() {
            repaint |= files.process_messages();
        }
        repaint |= self.health.process_messages(now);
        repaint
    }
}
