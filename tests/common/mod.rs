//! Shared helpers for integration tests

use serde_json::{json, Value};
use shelfmark::store::{DocumentStore, MemoryStore};

/// Seed a book document directly, bypassing the gateway, so tests can start
/// from any availability state.
pub async fn seed_book(
    store: &MemoryStore,
    title: &str,
    author: &str,
    quantity: u32,
    available: u32,
) -> String {
    let fields = match json!({
        "title": title,
        "author": author,
        "quantity": quantity,
        "available": available,
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    store
        .create("books", fields)
        .await
        .expect("failed to seed book")
}

/// Let detached transaction-log appends run to completion on the
/// current-thread test runtime.
#[allow(dead_code)]
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
