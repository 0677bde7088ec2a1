/// Folder browsing: session storage, the breadcrumb trail, and the state
/// behind the folder list and folder contents screens.
pub mod breadcrumb;
pub mod folder_list;
pub mod folder_view;
pub mod store;

pub use breadcrumb::{
    BreadcrumbNode, BreadcrumbSegment, BreadcrumbTrail, SegmentTarget, BREADCRUMB_KEY,
};
pub use folder_list::{FolderListView, ListLoad, DEFAULT_LIST_PAGE_SIZE};
pub use folder_view::{FolderLoad, FolderView, RetryCooldown, SearchDebounce};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
