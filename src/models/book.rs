//! Book model and lending constants.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of days a borrowed book is lent out for.
pub const LOAN_DURATION_DAYS: i64 = 14;

/// A catalog entry.
///
/// Optional text fields (`borrowed_by`, `genre`, `cover_url`) use the empty
/// string for "unset"; the persistence codec maps them to sentinel tokens
/// on disk. Wire names are camelCase (`isAvailable`, `borrowedBy`,
/// `coverUrl`, `dueDate`, `ratingCount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    /// `true` iff the book can be borrowed. Always consistent with
    /// `borrowed_by` and `due_date`, see [`Book::is_consistent`].
    pub is_available: bool,
    /// Username of the current borrower, empty when available.
    pub borrowed_by: String,
    /// Genre, empty when unset.
    pub genre: String,
    /// Cover image URL, empty when unset.
    pub cover_url: String,
    /// Loan expiry as a unix timestamp in seconds, 0 when available.
    pub due_date: i64,
    /// Running mean of all submitted star scores.
    pub rating: f64,
    /// Number of scores folded into `rating`.
    pub rating_count: u32,
}

impl Book {
    /// Creates a fresh, available, unrated catalog entry.
    pub fn new(id: u32, title: &str, author: &str, genre: &str, cover_url: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            is_available: true,
            borrowed_by: String::new(),
            genre: genre.to_string(),
            cover_url: cover_url.to_string(),
            due_date: 0,
            rating: 0.0,
            rating_count: 0,
        }
    }

    /// Availability invariant: a book is available exactly when it has no
    /// borrower and no due date.
    pub fn is_consistent(&self) -> bool {
        self.is_available == (self.borrowed_by.is_empty() && self.due_date == 0)
    }
}
