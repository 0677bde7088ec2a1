/// Category references.
///
/// Endpoints disagree on how they reference categories: some embed full
/// `{id, name}` objects, some send bare id strings. [`CategoryRef`] accepts
/// both so the folder model never carries untyped JSON.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most categories a folder or file may carry.
pub const MAX_ASSIGNED_CATEGORIES: usize = 3;

/// Allowed length of a category name, in characters, after trimming.
pub const CATEGORY_NAME_MIN: usize = 2;
pub const CATEGORY_NAME_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Full(Category),
    /// Anything else the server sent. Ignored by every consumer.
    Unknown(serde_json::Value),
}

impl CategoryRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) if !id.is_empty() => Some(id),
            Self::Full(c) if !c.id.is_empty() => Some(&c.id),
            _ => None,
        }
    }

    /// Display label; bare ids have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Full(c) if !c.name.is_empty() => Some(&c.name),
            _ => None,
        }
    }
}

/// One page of `GET /categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub items: Vec<Category>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

/// Rejected category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryNameError {
    #[error("please enter a category name")]
    Empty,
    #[error("name must be at least 2 characters")]
    TooShort,
    #[error("name must not exceed 50 characters")]
    TooLong,
}

/// Trim `name` and check its length.
pub fn validate_category_name(name: &str) -> Result<String, CategoryNameError> {
    let name = name.trim();
    match name.chars().count() {
        0 => Err(CategoryNameError::Empty),
        n if n < CATEGORY_NAME_MIN => Err(CategoryNameError::TooShort),
        n if n > CATEGORY_NAME_MAX => Err(CategoryNameError::TooLong),
        _ => Ok(name.to_owned()),
    }
}

/// Which contents of a folder inherit its categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Propagation {
    pub stl: bool,
    pub zip: bool,
    pub rar: bool,
    pub subfolders: bool,
}

impl Propagation {
    /// Only the folder itself.
    pub const NONE: Self = Self {
        stl: false,
        zip: false,
        rar: false,
        subfolders: false,
    };
}

impl Default for Propagation {
    /// Direct files of every kind, but not subfolders.
    fn default() -> Self {
        Self {
            stl: true,
            zip: true,
            rar: true,
            subfolders: false,
        }
    }
}

/// Body of `PATCH /folders/{id}/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderCategoryUpdate {
    pub category_ids: Vec<String>,
    pub apply_to_stl: bool,
    pub apply_to_zip: bool,
    pub apply_to_rar: bool,
    pub apply_to_subfolders: bool,
}

impl FolderCategoryUpdate {
    pub fn new(category_ids: Vec<String>, propagation: Propagation) -> Self {
        Self {
            category_ids,
            apply_to_stl: propagation.stl,
            apply_to_zip: propagation.zip,
            apply_to_rar: propagation.rar,
            apply_to_subfolders: propagation.subfolders,
        }
    }
}

/// Response of the category assignment endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssignedCategories {
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
}

/// Ids of every usable reference, in order.
pub fn extract_category_ids(refs: &[CategoryRef]) -> Vec<String> {
    refs.iter().filter_map(|r| r.id().map(str::to_owned)).collect()
}

/// Display names for a set of references, resolving bare ids against the
/// known categories. Ids that cannot be resolved are shown as-is.
pub fn category_labels(refs: &[CategoryRef], known: &[Category]) -> Vec<String> {
    refs.iter()
        .filter_map(|r| {
            if let Some(name) = r.name() {
                return Some(name.to_owned());
            }
            let id = r.id()?;
            Some(
                known
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| id.to_owned()),
            )
        })
        .collect()
}
