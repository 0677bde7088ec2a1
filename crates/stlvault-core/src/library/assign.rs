/// Category assignment for folders and files.
///
/// One update is in flight at a time; the views that show the target patch
/// their copy from the returned [`Assigned`] and reload.
use crate::api::VaultApi;
use crate::error::ApiError;
use crate::fetch::{spawn_fetch, FetchHandle};
use crate::model::{
    extract_category_ids, CategoryRef, FolderCategoryUpdate, Propagation,
    MAX_ASSIGNED_CATEGORIES,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// What receives the categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    /// A folder; `propagation` picks which of its contents follow it.
    Folder { id: String, propagation: Propagation },
    File(String),
}

impl AssignTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Folder { id, .. } | Self::File(id) => id,
        }
    }
}

/// Assignment refused before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("another category update is still in progress")]
    Busy,
    #[error("at most {max} categories can be assigned")]
    TooMany { max: usize },
}

/// A finished assignment, as stored by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Assigned {
    pub target: AssignTarget,
    pub categories: Vec<CategoryRef>,
}

pub struct CategoryAssigner {
    api: Arc<dyn VaultApi>,
    pending: Option<(AssignTarget, FetchHandle<Vec<CategoryRef>>)>,
    last_error: Option<String>,
}

impl CategoryAssigner {
    pub fn new(api: Arc<dyn VaultApi>) -> Self {
        Self {
            api,
            pending: None,
            last_error: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Target of the update in flight.
    pub fn pending_target(&self) -> Option<&AssignTarget> {
        self.pending.as_ref().map(|(target, _)| target)
    }

    /// Why the last update failed, until the next one succeeds.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replace the categories of `target` with `category_ids`.
    ///
    /// Duplicate ids are dropped; more than [`MAX_ASSIGNED_CATEGORIES`]
    /// distinct ids are refused.
    pub fn assign(
        &mut self,
        target: AssignTarget,
        category_ids: Vec<String>,
    ) -> Result<(), AssignError> {
        if self.is_busy() {
            return Err(AssignError::Busy);
        }
        let mut ids: Vec<String> = Vec::with_capacity(category_ids.len());
        for id in category_ids {
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        if ids.len() > MAX_ASSIGNED_CATEGORIES {
            return Err(AssignError::TooMany {
                max: MAX_ASSIGNED_CATEGORIES,
            });
        }

        info!("Assigning {} categories to {:?}", ids.len(), target);
        let api = Arc::clone(&self.api);
        let job_target = target.clone();
        let handle = spawn_fetch("assign-categories", move || match &job_target {
            AssignTarget::Folder { id, propagation } => {
                api.update_folder_categories(id, &FolderCategoryUpdate::new(ids, *propagation))
            }
            AssignTarget::File(id) => api.update_file_categories(id, &ids),
        });
        self.pending = Some((target, handle));
        Ok(())
    }

    /// Re-apply a folder's current categories, pushing them down to its
    /// contents per `propagation`.
    pub fn sync_folder(
        &mut self,
        folder_id: &str,
        current: &[CategoryRef],
        propagation: Propagation,
    ) -> Result<(), AssignError> {
        self.assign(
            AssignTarget::Folder {
                id: folder_id.to_owned(),
                propagation,
            },
            extract_category_ids(current),
        )
    }

    /// Collect a finished update, if any.
    pub fn process_messages(&mut self) -> Option<Result<Assigned, ApiError>> {
        let result = self.pending.as_ref().and_then(|(_, f)| f.try_take())?;
        let (target, _) = self.pending.take()?;
        match result {
            Ok(categories) => {
                self.last_error = None;
                Some(Ok(Assigned { target, categories }))
            }
            Err(e) => {
                warn!("Updating categories of {} failed: {}", target.id(), e);
                self.last_error = Some(e.to_string());
                Some(Err(e))
            }
        }
    }
}
