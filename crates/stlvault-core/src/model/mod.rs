/// Wire model for the STLVault backend.
///
/// All loosely typed payload fields are normalised here, at the
/// deserialisation boundary.
pub mod category;
pub mod file;
pub mod folder;
pub mod nullable;
pub mod scan;

pub use category::{
    category_labels, extract_category_ids, validate_category_name, AssignedCategories, Category,
    CategoryList, CategoryNameError, CategoryRef, FolderCategoryUpdate, Propagation,
    MAX_ASSIGNED_CATEGORIES,
};
pub use file::{FileList, FileQuery, DEFAULT_FILE_PAGE_SIZE};
pub use folder::{
    FileKind, Folder, FolderDetail, FolderList, FolderQuery, ModelFile, Pagination,
    DEFAULT_FOLDER_PAGE_SIZE, PAGE_SIZE_OPTIONS,
};
pub use scan::{CreateScanResponse, ScanList, ScanPath, ScanPathTotals, ScanRecord, ScanStatus};

use chrono::{DateTime, Local, Utc};

/// Parse a backend timestamp (RFC 3339).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a backend timestamp in local time, or `-` when unparsable.
pub fn display_timestamp(s: Option<&str>) -> String {
    s.and_then(parse_timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
