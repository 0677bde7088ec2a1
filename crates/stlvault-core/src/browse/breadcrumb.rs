/// Breadcrumb trail for folder navigation.
///
/// Keeps the ordered path of folders the user descended through so any
/// ancestor can be jumped to directly. Revisiting a folder already on the
/// trail truncates back to it instead of duplicating it. The trail is
/// written to the session store after every change.
///
/// Invariants: no id appears twice; the last node is the folder currently
/// displayed.
use super::store::SessionStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Session store key holding the serialised trail.
pub const BREADCRUMB_KEY: &str = "folderBreadcrumb";

/// One folder on the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbNode {
    pub id: String,
    pub name: String,
}

impl BreadcrumbNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Where a rendered segment navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTarget {
    /// The top-level folder listing.
    Home,
    Folder(String),
}

/// A rendered breadcrumb segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbSegment {
    pub label: String,
    pub target: SegmentTarget,
    pub clickable: bool,
}

/// Label of the synthetic leading segment.
pub const HOME_LABEL: &str = "Home";

/// The session's folder trail.
pub struct BreadcrumbTrail {
    nodes: Vec<BreadcrumbNode>,
    store: Arc<dyn SessionStore>,
}

impl BreadcrumbTrail {
    /// Restore the trail persisted in `store`, or start empty.
    ///
    /// A corrupt persisted value is discarded rather than reported.
    pub fn initialize(store: Arc<dyn SessionStore>) -> Self {
        let nodes = match store.get(BREADCRUMB_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<BreadcrumbNode>>(&raw) {
                Ok(nodes) => dedup_keep_first(nodes),
                Err(e) => {
                    warn!("Discarding unreadable breadcrumb trail: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("Breadcrumb trail restored with {} node(s)", nodes.len());
        Self { nodes, store }
    }

    pub fn nodes(&self) -> &[BreadcrumbNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The folder currently displayed, if any.
    pub fn current(&self) -> Option<&BreadcrumbNode> {
        self.nodes.last()
    }

    /// A folder's details finished loading.
    ///
    /// Truncates back to `node` if it is already on the trail, otherwise
    /// appends it.
    pub fn on_folder_loaded(&mut self, node: BreadcrumbNode) {
        match self.nodes.iter().position(|n| n.id == node.id) {
            Some(i) => self.nodes.truncate(i + 1),
            None => self.nodes.push(node),
        }
        self.persist();
    }

    /// The user returned to the top-level listing.
    pub fn on_navigate_home(&mut self) {
        self.nodes.clear();
        if let Err(e) = self.store.clear(BREADCRUMB_KEY) {
            warn!("Failed to clear persisted breadcrumb trail: {}", e);
        }
    }

    /// Segments to render: `Home`, then every trail node. All but the last
    /// trail node are clickable; `Home` always is.
    pub fn segments(&self) -> Vec<BreadcrumbSegment> {
        let last = self.nodes.len().saturating_sub(1);
        std::iter::once(BreadcrumbSegment {
            label: HOME_LABEL.to_string(),
            target: SegmentTarget::Home,
            clickable: true,
        })
        .chain(self.nodes.iter().enumerate().map(|(i, n)| BreadcrumbSegment {
            label: n.name.clone(),
            target: SegmentTarget::Folder(n.id.clone()),
            clickable: i < last,
        }))
        .collect()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.nodes)
            .map_err(Into::into)
            .and_then(|json| self.store.set(BREADCRUMB_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to persist breadcrumb trail: {}", e);
        }
    }
}

/// Drop later duplicates of an id, keeping the invariant on restore.
fn dedup_keep_first(nodes: Vec<BreadcrumbNode>) -> Vec<BreadcrumbNode> {
    let mut out: Vec<BreadcrumbNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !out.iter().any(|n| n.id == node.id) {
            out.push(node);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::store::MemoryStore;

    fn trail_with(ids: &[&str]) -> (BreadcrumbTrail, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mut trail = BreadcrumbTrail::initialize(store.clone());
        for id in ids {
            trail.on_folder_loaded(BreadcrumbNode::new(*id, id.to_uppercase()));
        }
        (trail, store)
    }

    fn ids(trail: &BreadcrumbTrail) -> Vec<&str> {
        trail.nodes().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_revisit_truncates() {
        let (mut trail, _) = trail_with(&["a", "b", "c"]);
        trail.on_folder_loaded(BreadcrumbNode::new("b", "B"));
        assert_eq!(ids(&trail), vec!["a", "b"]);
    }

    #[test]
    fn test_new_child_appends() {
        let (mut trail, _) = trail_with(&["a", "b"]);
        trail.on_folder_loaded(BreadcrumbNode::new("d", "D"));
        assert_eq!(ids(&trail), vec!["a", "b", "d"]);
        assert_eq!(trail.current().map(|n| n.id.as_str()), Some("d"));
    }

    #[test]
    fn test_reloading_current_is_noop() {
        let (mut trail, _) = trail_with(&["a", "b"]);
        trail.on_folder_loaded(BreadcrumbNode::new("b", "B"));
        assert_eq!(ids(&trail), vec!["a", "b"]);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (mut trail, store) = trail_with(&["a"]);
        trail.on_folder_loaded(BreadcrumbNode::new("b", "Bee"));
        let raw = store.get(BREADCRUMB_KEY).unwrap();
        let persisted: Vec<BreadcrumbNode> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, trail.nodes());
    }

    #[test]
    fn test_home_clears_trail_and_store() {
        let (mut trail, store) = trail_with(&["a", "b", "c"]);
        trail.on_navigate_home();
        assert!(trail.is_empty());
        assert_eq!(store.get(BREADCRUMB_KEY), None);

        // Also fine on an already empty trail.
        trail.on_navigate_home();
        assert!(trail.is_empty());
    }

    #[test]
    fn test_restore_from_store() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                BREADCRUMB_KEY,
                r#"[{"id":"a","name":"Models"},{"id":"b","name":"Dragons"}]"#,
            )
            .unwrap();
        let trail = BreadcrumbTrail::initialize(store);
        assert_eq!(ids(&trail), vec!["a", "b"]);
    }

    #[test]
    fn test_restore_corrupt_or_duplicated() {
        let store = Arc::new(MemoryStore::new());
        store.set(BREADCRUMB_KEY, "not json").unwrap();
        assert!(BreadcrumbTrail::initialize(store.clone()).is_empty());

        store
            .set(
                BREADCRUMB_KEY,
                r#"[{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"a","name":"A"}]"#,
            )
            .unwrap();
        let trail = BreadcrumbTrail::initialize(store);
        assert_eq!(ids(&trail), vec!["a", "b"]);
    }

    #[test]
    fn test_segments() {
        let (trail, _) = trail_with(&["a", "b", "c"]);
        let segments = trail.segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].target, SegmentTarget::Home);
        assert!(segments[0].clickable);
        assert!(segments[1].clickable);
        assert!(segments[2].clickable);
        assert!(!segments[3].clickable);
        assert_eq!(segments[3].label, "C");
        assert_eq!(segments[2].target, SegmentTarget::Folder("b".into()));
    }

    #[test]
    fn test_segments_empty_trail_is_home_only() {
        let (trail, _) = trail_with(&[]);
        let segments = trail.segments();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].clickable);
    }
}
