/// Library-wide file listing (`GET /files`).
use super::folder::{FileKind, ModelFile};
use serde::{Deserialize, Serialize};

/// Default page size of the file listing.
pub const DEFAULT_FILE_PAGE_SIZE: u32 = 20;

/// One page of `GET /files`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub items: Vec<ModelFile>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// Filters and pagination for `GET /files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuery {
    pub page: u32,
    pub page_size: u32,
    /// Free-text match on the file name.
    pub text: Option<String>,
    pub kind: Option<FileKind>,
    /// Category name.
    pub category: Option<String>,
}

impl Default for FileQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_FILE_PAGE_SIZE,
            text: None,
            kind: None,
            category: None,
        }
    }
}

impl FileQuery {
    /// A query that only counts files of `kind`.
    pub fn count_of(kind: Option<FileKind>) -> Self {
        Self {
            page_size: 1,
            kind,
            ..Self::default()
        }
    }

    /// Query-string pairs. Empty filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            params.push(("q", text.to_owned()));
        }
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_param().to_owned()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            params.push(("category", category.to_owned()));
        }
        params.push(("page", self.page.max(1).to_string()));
        params.push(("page_size", self.page_size.max(1).to_string()));
        params
    }
}
