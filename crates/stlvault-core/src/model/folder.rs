/// Folder and file records served by the browse endpoints.
use super::category::{Category, CategoryRef};
use super::nullable;
use serde::{Deserialize, Serialize};

/// Indexed model file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Stl,
    Zip,
    Rar,
    #[serde(other)]
    Other,
}

impl FileKind {
    /// The kinds a user can filter by.
    pub const FILTERABLE: [FileKind; 3] = [FileKind::Stl, FileKind::Zip, FileKind::Rar];

    /// Upper-case badge label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stl => "STL",
            Self::Zip => "ZIP",
            Self::Rar => "RAR",
            Self::Other => "FILE",
        }
    }

    /// Query-string spelling.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub file_count: Option<u64>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A single indexed model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub id: String,
    #[serde(default)]
    pub path: String,
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default, deserialize_with = "nullable::deserialize_int")]
    pub size: u64,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Response of `GET /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDetail {
    pub folder: Folder,
    #[serde(default)]
    pub subfolders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<ModelFile>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl FolderDetail {
    /// Fully described categories in this response, used to resolve bare
    /// ids on subfolders and files.
    pub fn known_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter_map(|c| match c {
                CategoryRef::Full(category) => Some(category.clone()),
                _ => None,
            })
            .collect()
    }
}

/// One page of `GET /folders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderList {
    #[serde(default)]
    pub items: Vec<Folder>,
    #[serde(default)]
    pub total: u64,
}

/// Default page size for folder contents.
pub const DEFAULT_FOLDER_PAGE_SIZE: u32 = 50;

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [20, 50, 100];

/// Filters and pagination for `GET /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub kind: Option<FileKind>,
    /// Category name, as the backend filters by name.
    pub category: Option<String>,
}

impl Default for FolderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_FOLDER_PAGE_SIZE,
            search: None,
            kind: None,
            category: None,
        }
    }
}

impl FolderQuery {
    /// Query-string pairs. Empty filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("page_size", self.page_size.max(1).to_string()),
        ];
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                params.push(("search", search.to_owned()));
            }
        }
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_param().to_owned()));
        }
        if let Some(category) = self.category.as_deref() {
            if !category.is_empty() {
                params.push(("category", category.to_owned()));
            }
        }
        params
    }
}
