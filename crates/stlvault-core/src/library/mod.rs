/// Library-wide screens: the dashboard, the file listing, category
/// management, and category assignment.
pub mod assign;
pub mod categories;
pub mod dashboard;
pub mod files;

pub use assign::{AssignError, AssignTarget, Assigned, CategoryAssigner};
pub use categories::{
    CategoryCatalog, CategoryEditor, CategoryManager, CATALOG_PAGE_SIZE,
    DEFAULT_CATEGORY_PAGE_SIZE,
};
pub use dashboard::{Dashboard, LibraryStats, RECENT_SCANS, SIZE_SAMPLE};
pub use files::FileListView;
