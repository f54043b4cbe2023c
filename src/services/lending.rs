//! Lending service: catalog mutations, borrow/return/rating transitions
//! and the write-through to durable storage.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, LOAN_DURATION_DAYS},
    repository::{codec::FIELD_DELIMITER, BookRepository, Catalog},
};

/// Maximum number of concurrent active loans per borrower.
pub const MAX_BORROWS_PER_USER: usize = 3;

const DAY_SECONDS: i64 = 24 * 60 * 60;

/// Orchestrates every catalog mutation.
///
/// One mutex guards the catalog and the id allocator. `borrow_book` is a
/// check-then-act sequence and `rate_book` a read-modify-write sequence, so
/// the lock is held from the first read to the end of the mutation; no other
/// operation can interleave. Every successful mutation is persisted before
/// the caller is told it succeeded.
pub struct LendingService {
    state: Mutex<LendingState>,
    repository: BookRepository,
}

struct LendingState {
    catalog: Catalog,
    next_id: u32,
}

impl LendingState {
    /// Monotonic id allocation, seeded past the highest persisted id so a
    /// new id can never collide with an existing record.
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Text fields flow into the delimited catalog file unescaped; the
/// delimiter or a line break would shift fields on the next load.
fn validate_text(field: &'static str, value: &str) -> AppResult<()> {
    if value.contains(FIELD_DELIMITER) || value.contains('\n') || value.contains('\r') {
        return Err(AppError::Validation(format!(
            "{} must not contain {:?} or line breaks",
            field, FIELD_DELIMITER
        )));
    }
    Ok(())
}

impl LendingService {
    /// Creates the service and loads the persisted catalog once.
    pub fn new(repository: BookRepository) -> AppResult<Self> {
        let books = repository.load()?;
        let catalog = Catalog::from_books(books);
        let next_id = catalog.max_id().map_or(1, |max| max + 1);
        tracing::info!("Loaded {} book(s) from storage", catalog.len());

        Ok(Self {
            state: Mutex::new(LendingState { catalog, next_id }),
            repository,
        })
    }

    /// Snapshot of the whole catalog, in insertion order.
    pub fn list_books(&self) -> AppResult<Vec<Book>> {
        Ok(self.state()?.catalog.all())
    }

    /// Adds a new available book and returns it with its allocated id.
    pub fn add_book(
        &self,
        title: &str,
        author: &str,
        genre: &str,
        cover_url: &str,
    ) -> AppResult<Book> {
        validate_text("title", title)?;
        validate_text("author", author)?;
        validate_text("genre", genre)?;
        validate_text("coverUrl", cover_url)?;

        let mut state = self.state()?;
        let id = state.allocate_id();
        let book = Book::new(id, title, author, genre, cover_url);
        state.catalog.add(book.clone());
        self.persist(&state)?;
        Ok(book)
    }

    /// Removes a book by id.
    pub fn delete_book(&self, id: u32) -> AppResult<()> {
        let mut state = self.state()?;
        if !state.catalog.remove(id) {
            return Err(AppError::NotFound(format!("no book with id {}", id)));
        }
        self.persist(&state)
    }

    /// Borrows a book: the `Available -> Borrowed` transition, guarded by
    /// the per-user loan limit. The due date is set 14 days out.
    pub fn borrow_book(&self, id: u32, username: &str) -> AppResult<()> {
        if username.is_empty() {
            return Err(AppError::Validation("username is required".to_string()));
        }
        validate_text("username", username)?;

        let mut state = self.state()?;

        let active = state
            .catalog
            .books()
            .iter()
            .filter(|b| !b.is_available && b.borrowed_by == username)
            .count();
        if active >= MAX_BORROWS_PER_USER {
            return Err(AppError::BorrowLimit(format!(
                "{} already has {} active loans",
                username, MAX_BORROWS_PER_USER
            )));
        }

        let book = state
            .catalog
            .find_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("no book with id {}", id)))?;
        if !book.is_available {
            return Err(AppError::Unavailable(format!(
                "book {} is already borrowed",
                id
            )));
        }

        book.is_available = false;
        book.borrowed_by = username.to_string();
        book.due_date = Utc::now().timestamp() + LOAN_DURATION_DAYS * DAY_SECONDS;
        self.persist(&state)
    }

    /// Returns a borrowed book: the `Borrowed -> Available` transition.
    pub fn return_book(&self, id: u32) -> AppResult<()> {
        let mut state = self.state()?;
        let book = state
            .catalog
            .find_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("no book with id {}", id)))?;
        if book.is_available {
            return Err(AppError::AlreadyAvailable(format!(
                "book {} is not currently borrowed",
                id
            )));
        }

        book.is_available = true;
        book.borrowed_by.clear();
        book.due_date = 0;
        self.persist(&state)
    }

    /// Folds a new score into the book's running mean. Star values are
    /// taken as-is; the engine does not clamp them to a 0-5 range.
    pub fn rate_book(&self, id: u32, stars: i32) -> AppResult<()> {
        let mut state = self.state()?;
        let book = state
            .catalog
            .find_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("no book with id {}", id)))?;

        let total = book.rating * f64::from(book.rating_count);
        book.rating_count += 1;
        book.rating = (total + f64::from(stars)) / f64::from(book.rating_count);
        self.persist(&state)
    }

    fn state(&self) -> AppResult<MutexGuard<'_, LendingState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("lending state lock poisoned".to_string()))
    }

    /// Write-through: the catalog is only as durable as the last save, so
    /// failures surface to the caller instead of being swallowed.
    fn persist(&self, state: &LendingState) -> AppResult<()> {
        self.repository.save(state.catalog.books()).map_err(|e| {
            tracing::error!("Catalog write-through failed: {}", e);
            AppError::Persistence(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (LendingService, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repository = BookRepository::new(dir.path().join("books.txt"));
        (LendingService::new(repository).unwrap(), dir)
    }

    fn assert_consistent(service: &LendingService) {
        for book in service.list_books().unwrap() {
            assert!(book.is_consistent(), "inconsistent book: {:?}", book);
        }
    }

    #[test]
    fn added_books_start_available_and_unrated() {
        let (service, _dir) = service();
        let book = service.add_book("Dune", "Frank Herbert", "Sci-Fi", "").unwrap();

        assert!(book.is_available);
        assert_eq!(book.borrowed_by, "");
        assert_eq!(book.due_date, 0);
        assert_eq!(book.rating, 0.0);
        assert_eq!(book.rating_count, 0);
        assert_consistent(&service);
    }

    #[test]
    fn ids_are_allocated_monotonically() {
        let (service, _dir) = service();
        let a = service.add_book("A", "X", "", "").unwrap();
        let b = service.add_book("B", "Y", "", "").unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[test]
    fn borrow_sets_borrower_and_due_date() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;

        let before = Utc::now().timestamp();
        service.borrow_book(id, "alice").unwrap();
        let after = Utc::now().timestamp();

        let book = service.list_books().unwrap().remove(0);
        assert!(!book.is_available);
        assert_eq!(book.borrowed_by, "alice");
        assert!(book.due_date >= before + LOAN_DURATION_DAYS * DAY_SECONDS);
        assert!(book.due_date <= after + LOAN_DURATION_DAYS * DAY_SECONDS);
        assert_consistent(&service);
    }

    #[test]
    fn borrowing_an_unavailable_book_fails() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;
        service.borrow_book(id, "alice").unwrap();

        assert!(matches!(
            service.borrow_book(id, "bob"),
            Err(AppError::Unavailable(_))
        ));
    }

    #[test]
    fn borrowing_an_unknown_id_fails() {
        let (service, _dir) = service();
        assert!(matches!(
            service.borrow_book(999, "alice"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn borrowing_with_an_empty_username_is_rejected() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;
        assert!(matches!(
            service.borrow_book(id, ""),
            Err(AppError::Validation(_))
        ));
        assert_consistent(&service);
    }

    #[test]
    fn text_fields_may_not_contain_the_delimiter_or_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        let service = LendingService::new(BookRepository::new(path.clone())).unwrap();

        assert!(matches!(
            service.add_book("Dune|Messiah", "Frank Herbert", "", ""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.add_book("Dune", "Frank\nHerbert", "", ""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.add_book("Dune", "Frank Herbert", "Sci|Fi", ""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.add_book("Dune", "Frank Herbert", "", "https://covers.example/1.jpg|x"),
            Err(AppError::Validation(_))
        ));
        assert!(service.list_books().unwrap().is_empty());

        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;
        assert!(matches!(
            service.borrow_book(id, "ali|ce"),
            Err(AppError::Validation(_))
        ));
        service.borrow_book(id, "alice").unwrap();

        // Nothing corrupt reached the file: a fresh load sees the same
        // records, field for field.
        let books = service.list_books().unwrap();
        drop(service);
        let reloaded = LendingService::new(BookRepository::new(path)).unwrap();
        assert_eq!(reloaded.list_books().unwrap(), books);
    }

    #[test]
    fn fourth_concurrent_borrow_is_rejected() {
        let (service, _dir) = service();
        let ids: Vec<u32> = (0..4)
            .map(|i| service.add_book(&format!("Book {}", i), "X", "", "").unwrap().id)
            .collect();

        for id in &ids[..3] {
            service.borrow_book(*id, "alice").unwrap();
        }
        assert!(matches!(
            service.borrow_book(ids[3], "alice"),
            Err(AppError::BorrowLimit(_))
        ));

        // The limit is per borrower; someone else can still take the book.
        service.borrow_book(ids[3], "bob").unwrap();
        assert_consistent(&service);
    }

    #[test]
    fn returning_a_book_frees_a_loan_slot() {
        let (service, _dir) = service();
        let ids: Vec<u32> = (0..4)
            .map(|i| service.add_book(&format!("Book {}", i), "X", "", "").unwrap().id)
            .collect();

        for id in &ids[..3] {
            service.borrow_book(*id, "alice").unwrap();
        }
        service.return_book(ids[0]).unwrap();
        service.borrow_book(ids[3], "alice").unwrap();
    }

    #[test]
    fn return_resets_state_except_ratings() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;
        service.rate_book(id, 5).unwrap();
        let before = service.list_books().unwrap().remove(0);

        service.borrow_book(id, "alice").unwrap();
        service.return_book(id).unwrap();

        let book = service.list_books().unwrap().remove(0);
        assert_eq!(book, before);
        assert!(book.is_available);
        assert_eq!(book.borrowed_by, "");
        assert_eq!(book.due_date, 0);
        assert_consistent(&service);
    }

    #[test]
    fn returning_an_available_book_fails() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;
        assert!(matches!(
            service.return_book(id),
            Err(AppError::AlreadyAvailable(_))
        ));
        assert!(matches!(
            service.return_book(999),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn rating_keeps_a_running_mean() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;

        for stars in [4, 2, 5] {
            service.rate_book(id, stars).unwrap();
        }

        let book = service.list_books().unwrap().remove(0);
        assert_eq!(book.rating_count, 3);
        assert!((book.rating - 11.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rating_an_unknown_id_fails() {
        let (service, _dir) = service();
        assert!(matches!(
            service.rate_book(999, 5),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn delete_then_find_reports_not_found() {
        let (service, _dir) = service();
        let id = service.add_book("Dune", "Frank Herbert", "", "").unwrap().id;

        service.delete_book(id).unwrap();
        assert!(service.list_books().unwrap().is_empty());
        assert!(matches!(
            service.delete_book(id),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn catalog_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");

        let first = LendingService::new(BookRepository::new(path.clone())).unwrap();
        let id = first.add_book("Dune", "Frank Herbert", "Sci-Fi", "").unwrap().id;
        first.borrow_book(id, "alice").unwrap();
        first.rate_book(id, 4).unwrap();
        let books = first.list_books().unwrap();
        drop(first);

        let second = LendingService::new(BookRepository::new(path)).unwrap();
        assert_eq!(second.list_books().unwrap(), books);

        // The allocator resumes past the persisted ids.
        let next = second.add_book("Emma", "Jane Austen", "", "").unwrap();
        assert_eq!(next.id, id + 1);
    }
}
