/// Backend REST API.
///
/// [`VaultApi`] is the seam every consumer depends on; [`HttpClient`] is the
/// real implementation and tests substitute in-process fakes.
pub mod http;

pub use http::HttpClient;

use crate::error::ApiError;
use crate::model::{
    Category, CategoryList, CategoryRef, CreateScanResponse, FileList, FileQuery,
    FolderCategoryUpdate, FolderDetail, FolderList, FolderQuery, ScanList, ScanPath, ScanRecord,
};

/// Logical calls against the model-library backend.
///
/// All calls block the calling thread; the GUI runs them on background
/// threads (see [`crate::fetch`] and [`crate::scan::poller`]).
pub trait VaultApi: Send + Sync {
    /// `POST /scan`: start a new scan job.
    fn create_scan(&self) -> Result<CreateScanResponse, ApiError>;

    /// `GET /scans/{id}`.
    fn scan(&self, id: &str) -> Result<ScanRecord, ApiError>;

    /// `GET /scans?page&page_size`.
    fn scans(&self, page: u32, page_size: u32) -> Result<ScanList, ApiError>;

    /// `GET /scans/{id}/paths`: per-root-path results of a finished scan.
    fn scan_paths(&self, id: &str) -> Result<Vec<ScanPath>, ApiError>;

    /// `GET /folders?page&page_size`.
    fn folders(&self, page: u32, page_size: u32) -> Result<FolderList, ApiError>;

    /// `GET /folders/{id}` with filters and pagination.
    fn folder(&self, id: &str, query: &FolderQuery) -> Result<FolderDetail, ApiError>;

    /// `GET /files` with filters and pagination.
    fn files(&self, query: &FileQuery) -> Result<FileList, ApiError>;

    /// `GET /categories?page&page_size`.
    fn categories(&self, page: u32, page_size: u32) -> Result<CategoryList, ApiError>;

    /// `POST /categories`.
    fn create_category(&self, name: &str) -> Result<Category, ApiError>;

    /// `PUT /categories/{id}`: rename.
    fn update_category(&self, id: &str, name: &str) -> Result<Category, ApiError>;

    /// `DELETE /categories/{id}`.
    fn delete_category(&self, id: &str) -> Result<(), ApiError>;

    /// `PATCH /folders/{id}/categories`. Returns the folder's categories as
    /// stored by the server.
    fn update_folder_categories(
        &self,
        id: &str,
        update: &FolderCategoryUpdate,
    ) -> Result<Vec<CategoryRef>, ApiError>;

    /// `PATCH /files/{id}/categories`.
    fn update_file_categories(
        &self,
        id: &str,
        category_ids: &[String],
    ) -> Result<Vec<CategoryRef>, ApiError>;

    /// `GET /health`.
    fn health(&self) -> Result<(), ApiError>;
}

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const SCAN: &str = "/scan";
    pub const SCANS: &str = "/scans";
    pub const FOLDERS: &str = "/folders";
    pub const FILES: &str = "/files";
    pub const CATEGORIES: &str = "/categories";

    pub fn scan(id: &str) -> String {
        format!("{SCANS}/{}", encode_segment(id))
    }

    pub fn scan_paths(id: &str) -> String {
        format!("{SCANS}/{}/paths", encode_segment(id))
    }

    pub fn folder(id: &str) -> String {
        format!("{FOLDERS}/{}", encode_segment(id))
    }

    pub fn folder_categories(id: &str) -> String {
        format!("{FOLDERS}/{}/categories", encode_segment(id))
    }

    pub fn file_categories(id: &str) -> String {
        format!("{FILES}/{}/categories", encode_segment(id))
    }

    pub fn category(id: &str) -> String {
        format!("{CATEGORIES}/{}", encode_segment(id))
    }

    /// Percent-encode an opaque id for use as one path segment.
    pub fn encode_segment(id: &str) -> String {
        let mut out = String::with_capacity(id.len());
        for b in id.bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{b:02X}"));
            }
        }
        out
    }
}
