//! Error types for the Shelfmark catalog core

use std::collections::BTreeMap;

use thiserror::Error;

use crate::store::StoreError;

/// Per-field validation messages, keyed by form field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Main application error type
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Book not found")]
    NotFound,

    #[error("No copies available to borrow")]
    Unavailable,

    #[error("All copies are already returned")]
    AlreadyFull,

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

impl CatalogError {
    /// Message suitable for a user-facing notification.
    ///
    /// Business-rule failures are surfaced verbatim; store failures get a
    /// generic retry-suggesting message while the underlying detail stays in
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::NotFound => "Book not found".to_string(),
            CatalogError::Unavailable => "No copies available to borrow".to_string(),
            CatalogError::AlreadyFull => "All copies are already returned".to_string(),
            CatalogError::Validation(_) => "Please correct the highlighted fields".to_string(),
            CatalogError::StoreUnavailable(e) => {
                tracing::error!("Store error: {:?}", e);
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Field errors for a failed submission, empty for non-validation failures.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            CatalogError::Validation(errors) => errors.clone(),
            _ => FieldErrors::new(),
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => CatalogError::NotFound,
            other => CatalogError::StoreUnavailable(other),
        }
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
