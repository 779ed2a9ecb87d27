//! Borrow/return transaction log entry.
//!
//! Append-only and immutable; written on every availability update and read
//! back only for per-book history. `book_id` references a book by key with no
//! referential integrity enforced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    Borrow,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub book_id: String,
    pub action: TransactionAction,
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
}
