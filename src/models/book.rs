//! Book (inventory entry) model and submission-draft validation.
//!
//! `available` counts the un-borrowed copies of a book; the catalog keeps
//! `0 <= available <= quantity` for any reader after a completed operation.
//! Under concurrent writers the guarantee is weaker (see the borrow protocol
//! in `services::catalog`).

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{CatalogError, FieldErrors};

/// Book record from the `books` collection.
///
/// `id` is the store-assigned document key; `created_at` is stamped by the
/// store on creation (server time, so ordering never depends on client
/// clocks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub quantity: u32,
    pub available: u32,
    pub created_at: DateTime<Utc>,
}

static ISBN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{10}|\d{13})$").expect("valid ISBN regex"));

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// ISBN-10 or ISBN-13, hyphens and whitespace ignored. Empty input is valid
/// (the field is optional).
fn valid_isbn(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let cleaned: String = value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();
    if ISBN_DIGITS.is_match(&cleaned) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn_format"))
    }
}

/// Candidate book submission, unpersisted until a successful add.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookDraft {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,

    #[validate(custom(function = "valid_isbn", message = "Please enter a valid ISBN format"))]
    pub isbn: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            quantity: 1,
        }
    }
}

impl BookDraft {
    /// All applicable field errors, evaluated independently.
    ///
    /// An empty map means the draft is submission-ready.
    pub fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors
                .field_errors()
                .into_iter()
                .filter_map(|(field, field_errors)| {
                    field_errors.first().map(|e| {
                        let message = e
                            .message
                            .clone()
                            .map(|m| m.into_owned())
                            .unwrap_or_else(|| "Invalid value".to_string());
                        (field, message)
                    })
                })
                .collect(),
        }
    }

    /// Validate the draft, failing fast before any network call is attempted.
    pub fn into_validated(self) -> Result<ValidatedBookDraft, CatalogError> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(ValidatedBookDraft(self))
        } else {
            Err(CatalogError::Validation(errors))
        }
    }
}

/// A draft that has passed validation; the only input `add_book` accepts.
#[derive(Debug, Clone)]
pub struct ValidatedBookDraft(BookDraft);

impl ValidatedBookDraft {
    pub fn title(&self) -> &str {
        &self.0.title
    }

    pub fn author(&self) -> &str {
        &self.0.author
    }

    /// The ISBN as entered, or `None` when the optional field was left empty.
    pub fn isbn(&self) -> Option<&str> {
        let trimmed = self.0.isbn.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn quantity(&self) -> u32 {
        self.0.quantity
    }
}
