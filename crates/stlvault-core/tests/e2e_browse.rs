/// End-to-end folder browsing tests.
///
/// Drive [`FolderView`] and [`FolderListView`] against the fake backend and a
/// real on-disk session store, checking that the breadcrumb trail only
/// follows successful loads and survives a restart of the view state.
mod common;

use common::{folder, wait_until, FakeApi};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stlvault_core::browse::{
    BreadcrumbTrail, FolderListView, FolderLoad, FolderView, JsonFileStore, ListLoad,
    MemoryStore, SegmentTarget, SessionStore, BREADCRUMB_KEY,
};
use stlvault_core::model::{FileKind, FolderList};
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn library() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.add_folder("a", "Models");
    api.add_folder("b", "Dragons");
    api.add_folder("c", "Wyrms");
    api
}

fn settle(view: &mut FolderView, trail: &mut BreadcrumbTrail) {
    wait_until("folder load", || {
        view.process_messages(Instant::now(), trail);
        !view.is_loading()
    });
}

fn visit(api: &Arc<FakeApi>, id: &str, trail: &mut BreadcrumbTrail) -> FolderView {
    let mut view = FolderView::open(api.clone(), id);
    settle(&mut view, trail);
    view
}

fn trail_ids(trail: &BreadcrumbTrail) -> Vec<String> {
    trail.nodes().iter().map(|n| n.id.clone()).collect()
}

// ── Breadcrumbs ──────────────────────────────────────────────────────────────

/// Descend a → b → c, jump back to a, then down to b again.
#[test]
fn navigation_builds_and_truncates_trail() {
    let api = library();
    let mut trail = BreadcrumbTrail::initialize(Arc::new(MemoryStore::new()));

    for id in ["a", "b", "c"] {
        visit(&api, id, &mut trail);
    }
    assert_eq!(trail_ids(&trail), ["a", "b", "c"]);

    let segments = trail.segments();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1].label, "Models");
    assert!(!segments[3].clickable);

    visit(&api, "a", &mut trail);
    assert_eq!(trail_ids(&trail), ["a"]);

    visit(&api, "b", &mut trail);
    assert_eq!(trail_ids(&trail), ["a", "b"]);

    trail.on_navigate_home();
    assert!(trail.is_empty());
    assert_eq!(trail.segments()[0].target, SegmentTarget::Home);
}

/// A missing folder leaves the trail untouched and gates retries.
#[test]
fn not_found_leaves_trail_alone() {
    let api = library();
    let mut trail = BreadcrumbTrail::initialize(Arc::new(MemoryStore::new()));
    visit(&api, "a", &mut trail);

    let mut view = visit(&api, "missing", &mut trail);
    assert_eq!(view.state(), &FolderLoad::NotFound);
    assert_eq!(trail_ids(&trail), ["a"]);

    let now = Instant::now();
    assert!(view.retry(now));
    assert_eq!(view.cooldown().remaining_secs(now), 30);
    settle(&mut view, &mut trail);
    assert_eq!(view.state(), &FolderLoad::NotFound);

    // Cooling down: a second retry is refused until 30 s have passed.
    assert!(!view.retry(now + Duration::from_secs(10)));
    assert!(view.retry(now + Duration::from_secs(30)));
}

/// The trail persists through the file store and is restored from it.
#[test]
fn trail_survives_reinitialisation() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let api = library();
    {
        let store = Arc::new(JsonFileStore::open(tmp.path()).unwrap());
        let mut trail = BreadcrumbTrail::initialize(store);
        visit(&api, "a", &mut trail);
        visit(&api, "b", &mut trail);
    }

    let store = Arc::new(JsonFileStore::open(tmp.path()).unwrap());
    assert!(store.get(BREADCRUMB_KEY).is_some());
    let mut trail = BreadcrumbTrail::initialize(store.clone());
    assert_eq!(trail_ids(&trail), ["a", "b"]);

    trail.on_navigate_home();
    assert_eq!(store.get(BREADCRUMB_KEY), None);
}

// ── Filters ──────────────────────────────────────────────────────────────────

/// Filter changes return to page 1 and reach the backend.
#[test]
fn filters_reset_page() {
    let api = library();
    let mut trail = BreadcrumbTrail::initialize(Arc::new(MemoryStore::new()));
    let mut view = visit(&api, "a", &mut trail);

    view.set_page(3);
    settle(&mut view, &mut trail);
    assert_eq!(view.query().page, 3);

    view.set_kind(Some(FileKind::Stl));
    assert_eq!(view.query().page, 1);
    settle(&mut view, &mut trail);

    view.set_page(2);
    settle(&mut view, &mut trail);
    view.set_page_size(100);
    assert_eq!(view.query().page, 1);
    assert_eq!(view.query().page_size, 100);
    settle(&mut view, &mut trail);

    let (id, last) = api.folder_queries().pop().unwrap();
    assert_eq!(id, "a");
    assert_eq!(last.kind, Some(FileKind::Stl));
    assert_eq!(last.page, 1);
    assert_eq!(last.page_size, 100);
}

/// Search text is applied only after typing pauses.
#[test]
fn search_is_debounced() {
    let api = library();
    let mut trail = BreadcrumbTrail::initialize(Arc::new(MemoryStore::new()));
    let mut view = visit(&api, "a", &mut trail);
    view.set_page(2);
    settle(&mut view, &mut trail);
    let requests = api.folder_queries().len();

    let t0 = Instant::now();
    view.search_input("dr", t0);
    view.search_input("drag", t0 + Duration::from_millis(200));
    view.process_messages(t0 + Duration::from_millis(400), &mut trail);
    assert_eq!(view.query().search, None);
    assert_eq!(view.search_text(), "drag");

    view.process_messages(t0 + Duration::from_millis(800), &mut trail);
    assert_eq!(view.query().search.as_deref(), Some("drag"));
    assert_eq!(view.query().page, 1);
    settle(&mut view, &mut trail);
    assert_eq!(api.folder_queries().len(), requests + 1);
}

// ── Home listing ─────────────────────────────────────────────────────────────

#[test]
fn folder_list_pages() {
    let api = library();
    api.set_list(FolderList {
        items: vec![folder("a", "Models"), folder("x", "Terrain")],
        total: 45,
    });
    let mut list = FolderListView::new(api.clone());
    assert_eq!(list.page_size(), 20);

    wait_until("folder list", || list.process_messages());
    match list.state() {
        ListLoad::Loaded(l) => assert_eq!(l.items.len(), 2),
        other => panic!("unexpected state {other:?}"),
    }
    assert_eq!(list.total_pages(), 3);

    list.set_page(3);
    wait_until("page 3", || list.process_messages());
    assert_eq!(list.page(), 3);

    list.set_page_size(50);
    assert_eq!(list.page(), 1);
    wait_until("reload", || list.process_messages());
    assert_eq!(list.total_pages(), 1);
    assert_eq!(api.list_calls(), 3);
}
