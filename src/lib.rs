//! Shelfmark library catalog client core
//!
//! The borrow/return availability-update protocol, add-book draft
//! validation, and UI session reconciliation for a library catalog backed by
//! a hosted key-document store. Rendering, routing, and presentational
//! components live elsewhere; this crate owns the state and the store
//! round trips.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{CatalogError, CatalogResult, FieldErrors};
pub use models::{Book, BookDraft, Transaction, TransactionAction, ValidatedBookDraft};
pub use services::{CatalogService, CatalogSession};
pub use store::{DocumentStore, MemoryStore, RestStore};
