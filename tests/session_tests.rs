//! Session reconciliation tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use common::seed_book;
use shelfmark::{
    services::session::{NoticeKind, PendingAction},
    store::{Document, DocumentStore, MemoryStore, Order, StoreError, StoreResult},
    BookDraft, CatalogService, CatalogSession,
};

fn session_over(store: Arc<dyn DocumentStore>) -> CatalogSession {
    CatalogSession::new(CatalogService::with_store(store))
}

/// Store whose every call fails, for exercising unavailability paths.
struct DownStore;

#[async_trait]
impl DocumentStore for DownStore {
    async fn list(&self, _: &str, _: &str, _: Order) -> StoreResult<Vec<Document>> {
        Err(StoreError::Response("status 503".to_string()))
    }

    async fn get(&self, _: &str, _: &str) -> StoreResult<Document> {
        Err(StoreError::Response("status 503".to_string()))
    }

    async fn create(&self, _: &str, _: Map<String, Value>) -> StoreResult<String> {
        Err(StoreError::Response("status 503".to_string()))
    }

    async fn update(&self, _: &str, _: &str, _: Map<String, Value>) -> StoreResult<()> {
        Err(StoreError::Response("status 503".to_string()))
    }

    async fn delete(&self, _: &str, _: &str) -> StoreResult<()> {
        Err(StoreError::Response("status 503".to_string()))
    }
}

/// Store that delays point reads, keeping requests in flight long enough for
/// the guard to be observable.
struct SlowReads {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait]
impl DocumentStore for SlowReads {
    async fn list(&self, collection: &str, order_by: &str, order: Order) -> StoreResult<Vec<Document>> {
        self.inner.list(collection, order_by, order).await
    }

    async fn get(&self, collection: &str, key: &str) -> StoreResult<Document> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(collection, key).await
    }

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        self.inner.create(collection, fields).await
    }

    async fn update(&self, collection: &str, key: &str, fields: Map<String, Value>) -> StoreResult<()> {
        self.inner.update(collection, key, fields).await
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        self.inner.delete(collection, key).await
    }
}

#[tokio::test]
async fn failed_refresh_presents_an_empty_list_and_a_notice() {
    let session = session_over(Arc::new(DownStore));
    session.refresh().await;

    assert!(session.books().is_empty());
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Failed to load books.");
}

#[tokio::test]
async fn confirmed_borrow_reconciles_the_snapshot() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_book(&store, "1984", "George Orwell", 3, 3).await;
    let session = session_over(store.clone());
    session.refresh().await;

    session.request_borrow(&id);
    let pending = session.pending().expect("confirmation should be pending");
    assert_eq!(pending.book_title, "1984");
    assert_eq!(pending.action, PendingAction::Borrow);

    session.confirm_pending().await;
    assert!(session.pending().is_none());

    // Local snapshot carries the same adjustment the store received, with no
    // re-fetch in between.
    assert_eq!(session.books()[0].available, 2);
    let stored = store.get("books", &id).await.expect("book vanished");
    assert_eq!(stored.fields.get("available"), Some(&Value::from(2)));

    let notices = session.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, "Book borrowed successfully!");
}

#[tokio::test]
async fn cancelled_confirmation_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_book(&store, "Walden", "Henry David Thoreau", 2, 2).await;
    let session = session_over(store);
    session.refresh().await;

    session.request_return(&id);
    assert!(session.pending().is_some());
    session.cancel_pending();
    assert!(session.pending().is_none());

    session.confirm_pending().await;
    assert_eq!(session.books()[0].available, 2);
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn failed_borrow_leaves_the_snapshot_untouched() {
    let store = Arc::new(MemoryStore::new());
    let id = seed_book(&store, "Pride and Prejudice", "Jane Austen", 2, 0).await;
    let session = session_over(store);
    session.refresh().await;

    session.borrow_book(&id).await;

    assert_eq!(session.books()[0].available, 0);
    let notices = session.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "No copies available to borrow");
}

#[tokio::test]
async fn guard_blocks_a_second_request_for_the_same_book() {
    let inner = MemoryStore::new();
    let id = seed_book(&inner, "Dune", "Frank Herbert", 3, 3).await;
    let store = Arc::new(SlowReads {
        inner,
        delay: Duration::from_millis(20),
    });
    let session = session_over(store.clone());
    session.refresh().await;

    tokio::join!(session.borrow_book(&id), session.borrow_book(&id));

    // Only the first request went out; the second was dropped by the guard.
    assert_eq!(session.books()[0].available, 2);
    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert!(!session.is_busy(&id));
}

#[tokio::test]
async fn operations_on_distinct_books_run_concurrently() {
    let inner = MemoryStore::new();
    let first = seed_book(&inner, "1984", "George Orwell", 2, 2).await;
    let second = seed_book(&inner, "Walden", "Henry David Thoreau", 2, 1).await;
    let store = Arc::new(SlowReads {
        inner,
        delay: Duration::from_millis(20),
    });
    let session = session_over(store);
    session.refresh().await;

    tokio::join!(session.borrow_book(&first), session.return_book(&second));

    let books = session.books();
    assert_eq!(books.iter().find(|b| b.id == first).unwrap().available, 1);
    assert_eq!(books.iter().find(|b| b.id == second).unwrap().available, 2);
    assert_eq!(session.take_notices().len(), 2);
}

#[tokio::test]
async fn search_matches_title_or_author_case_insensitively() {
    let store = Arc::new(MemoryStore::new());
    seed_book(&store, "1984", "George Orwell", 1, 1).await;
    seed_book(&store, "Animal Farm", "George Orwell", 1, 1).await;
    seed_book(&store, "Walden", "Henry David Thoreau", 1, 1).await;
    let session = session_over(store);
    session.refresh().await;

    session.set_search("orwell");
    assert_eq!(session.books().len(), 2);

    session.set_search("WALD");
    assert_eq!(session.books().len(), 1);

    session.clear_search();
    assert_eq!(session.books().len(), 3);
}

#[tokio::test]
async fn invalid_draft_fails_fast_and_stays_populated() {
    let store = Arc::new(MemoryStore::new());
    let session = session_over(store);
    session.refresh().await;

    session.set_draft(BookDraft {
        title: String::new(),
        author: "Jane Austen".to_string(),
        isbn: String::new(),
        quantity: 1,
    });
    assert!(!session.submit_draft().await);

    let errors = session.draft_errors();
    assert_eq!(errors.get("title").map(String::as_str), Some("Title is required"));
    assert_eq!(session.draft().author, "Jane Austen");
    assert!(session.books().is_empty());
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn successful_add_inserts_in_title_order_and_resets_the_draft() {
    let store = Arc::new(MemoryStore::new());
    seed_book(&store, "1984", "George Orwell", 1, 1).await;
    seed_book(&store, "Walden", "Henry David Thoreau", 1, 1).await;
    let session = session_over(store);
    session.refresh().await;

    session.set_draft(BookDraft {
        title: "Middlemarch".to_string(),
        author: "George Eliot".to_string(),
        isbn: String::new(),
        quantity: 2,
    });
    assert!(session.submit_draft().await);

    let titles: Vec<String> = session.books().into_iter().map(|b| b.title).collect();
    assert_eq!(titles, vec!["1984", "Middlemarch", "Walden"]);

    let draft = session.draft();
    assert!(draft.title.is_empty());
    assert_eq!(draft.quantity, 1);

    let notices = session.take_notices();
    assert_eq!(notices[0].message, "Book added successfully!");
}

#[tokio::test]
async fn store_failure_on_submit_keeps_the_draft() {
    let session = session_over(Arc::new(DownStore));

    session.set_draft(BookDraft {
        title: "Middlemarch".to_string(),
        author: "George Eliot".to_string(),
        isbn: String::new(),
        quantity: 2,
    });
    assert!(!session.submit_draft().await);

    assert_eq!(session.draft().title, "Middlemarch");
    assert!(session.draft_errors().is_empty());
    let notices = session.take_notices();
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Something went wrong. Please try again.");
}
