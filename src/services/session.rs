//! UI-facing catalog session state.
//!
//! Holds the book snapshot, the per-id in-flight guard, pending
//! borrow/return confirmations, the add-book draft, and transient notices.
//! Results are reconciled optimistically: on an acknowledged borrow/return
//! the same clamped adjustment the gateway applied server-side is applied to
//! the local snapshot instead of re-fetching the list; on failure the
//! snapshot is left untouched and the failure becomes a notice.
//!
//! The per-id guard is cooperative and client-local: while a request for a
//! book id is outstanding no second request for that id is issued, but
//! operations on other ids proceed concurrently and a failure for one book
//! never invalidates another book's in-flight operation.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::{
    error::{CatalogError, FieldErrors},
    models::book::{Book, BookDraft},
    services::catalog::CatalogService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-visible notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Borrow,
    Return,
}

/// Borrow/return awaiting user confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    pub book_id: String,
    pub book_title: String,
    pub action: PendingAction,
}

#[derive(Default)]
struct SessionState {
    books: Vec<Book>,
    search: String,
    in_flight: HashSet<String>,
    submitting: bool,
    pending: Option<PendingConfirmation>,
    notices: Vec<Notice>,
    draft: BookDraft,
    draft_errors: FieldErrors,
}

pub struct CatalogSession {
    catalog: CatalogService,
    state: Mutex<SessionState>,
}

impl CatalogSession {
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            state: Mutex::new(SessionState::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // The lock is never held across an await; a poisoned lock means a
        // panicked sibling task and there is nothing better to do than
        // propagate.
        self.state.lock().expect("session state poisoned")
    }

    /// Reload the snapshot from the catalog. On failure the list is emptied
    /// and a "failed to load" notice is raised instead of propagating.
    pub async fn refresh(&self) {
        let result = self.catalog.list_books().await;
        let mut state = self.lock();
        match result {
            Ok(books) => state.books = books,
            Err(e) => {
                tracing::warn!("catalog refresh failed: {}", e);
                state.books.clear();
                state.notices.push(Notice::error("Failed to load books."));
            }
        }
    }

    /// Current snapshot filtered by the search term (case-insensitive
    /// substring match on title or author).
    pub fn books(&self) -> Vec<Book> {
        let state = self.lock();
        let needle = state.search.to_lowercase();
        state
            .books
            .iter()
            .filter(|b| {
                needle.is_empty()
                    || b.title.to_lowercase().contains(&needle)
                    || b.author.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    pub fn set_search(&self, term: &str) {
        self.lock().search = term.to_string();
    }

    pub fn clear_search(&self) {
        self.lock().search.clear();
    }

    /// Whether a request for this book id is currently outstanding; the UI
    /// disables the book's borrow/return triggers while this is true.
    pub fn is_busy(&self, book_id: &str) -> bool {
        self.lock().in_flight.contains(book_id)
    }

    pub fn pending(&self) -> Option<PendingConfirmation> {
        self.lock().pending.clone()
    }

    pub fn request_borrow(&self, book_id: &str) {
        self.request(book_id, PendingAction::Borrow);
    }

    pub fn request_return(&self, book_id: &str) {
        self.request(book_id, PendingAction::Return);
    }

    fn request(&self, book_id: &str, action: PendingAction) {
        let mut state = self.lock();
        if state.in_flight.contains(book_id) {
            return;
        }
        if let Some(book) = state.books.iter().find(|b| b.id == book_id) {
            state.pending = Some(PendingConfirmation {
                book_id: book.id.clone(),
                book_title: book.title.clone(),
                action,
            });
        }
    }

    pub fn cancel_pending(&self) {
        self.lock().pending = None;
    }

    /// Dispatch the pending confirmation, if any.
    pub async fn confirm_pending(&self) {
        let pending = self.lock().pending.take();
        if let Some(p) = pending {
            match p.action {
                PendingAction::Borrow => self.borrow_book(&p.book_id).await,
                PendingAction::Return => self.return_book(&p.book_id).await,
            }
        }
    }

    pub async fn borrow_book(&self, book_id: &str) {
        if !self.begin(book_id) {
            return;
        }
        let result = self.catalog.borrow_book(book_id).await;
        self.finish(book_id);

        let mut state = self.lock();
        match result {
            Ok(()) => {
                if let Some(book) = state.books.iter_mut().find(|b| b.id == book_id) {
                    // Same clamped adjustment the gateway applied remotely.
                    if book.available > 0 {
                        book.available -= 1;
                    }
                }
                state
                    .notices
                    .push(Notice::success("Book borrowed successfully!"));
            }
            Err(e) => state.notices.push(Notice::error(e.user_message())),
        }
    }

    pub async fn return_book(&self, book_id: &str) {
        if !self.begin(book_id) {
            return;
        }
        let result = self.catalog.return_book(book_id).await;
        self.finish(book_id);

        let mut state = self.lock();
        match result {
            Ok(()) => {
                if let Some(book) = state.books.iter_mut().find(|b| b.id == book_id) {
                    if book.available < book.quantity {
                        book.available += 1;
                    }
                }
                state
                    .notices
                    .push(Notice::success("Book returned successfully!"));
            }
            Err(e) => state.notices.push(Notice::error(e.user_message())),
        }
    }

    /// Claim the per-id guard; false means a request for this id is already
    /// outstanding and the caller must not issue another.
    fn begin(&self, book_id: &str) -> bool {
        self.lock().in_flight.insert(book_id.to_string())
    }

    /// Release the per-id guard; called on every exit path.
    fn finish(&self, book_id: &str) {
        self.lock().in_flight.remove(book_id);
    }

    pub fn draft(&self) -> BookDraft {
        self.lock().draft.clone()
    }

    pub fn draft_errors(&self) -> FieldErrors {
        self.lock().draft_errors.clone()
    }

    /// Replace the add-book draft, clearing stale field errors.
    pub fn set_draft(&self, draft: BookDraft) {
        let mut state = self.lock();
        state.draft = draft;
        state.draft_errors.clear();
    }

    /// Submit the add-book draft. Validation failures are resolved locally
    /// before any network call; on any failure the draft stays populated for
    /// correction. Returns whether the book was added.
    pub async fn submit_draft(&self) -> bool {
        let draft = {
            let mut state = self.lock();
            if state.submitting {
                return false;
            }
            state.submitting = true;
            state.draft.clone()
        };

        let outcome = match draft.into_validated() {
            Ok(valid) => self.catalog.add_book(valid).await,
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.submitting = false;
        match outcome {
            Ok(book) => {
                let at = state
                    .books
                    .iter()
                    .position(|b| b.title > book.title)
                    .unwrap_or(state.books.len());
                state.books.insert(at, book);
                state.draft = BookDraft::default();
                state.draft_errors.clear();
                state
                    .notices
                    .push(Notice::success("Book added successfully!"));
                true
            }
            Err(e) => {
                state.draft_errors = e.field_errors();
                if !matches!(e, CatalogError::Validation(_)) {
                    state.notices.push(Notice::error(e.user_message()));
                }
                false
            }
        }
    }

    /// Drain accumulated transient notices for display.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }
}
