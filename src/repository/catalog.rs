//! In-memory book catalog.

use crate::models::Book;

/// The authoritative in-memory collection of catalog entries.
///
/// Insertion order is preserved. The catalog only mutates its own
/// collection; persistence and id allocation are the caller's concern.
#[derive(Debug, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from records loaded out of storage.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Appends a record. The caller must supply a non-colliding id.
    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Snapshot of every record, in insertion order.
    pub fn all(&self) -> Vec<Book> {
        self.books.clone()
    }

    /// The records themselves, for iteration and persistence.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn find(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Removes the first record with a matching id; reports whether one
    /// was found.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.books.iter().position(|b| b.id == id) {
            Some(index) => {
                self.books.remove(index);
                true
            }
            None => false,
        }
    }

    /// Highest id currently in use, if the catalog is non-empty.
    pub fn max_id(&self) -> Option<u32> {
        self.books.iter().map(|b| b.id).max()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u32, title: &str) -> Book {
        Book::new(id, title, "Anonymous", "", "")
    }

    #[test]
    fn finds_added_books_by_id() {
        let mut catalog = Catalog::new();
        catalog.add(sample(1, "A"));
        catalog.add(sample(2, "B"));

        assert_eq!(catalog.find(2).map(|b| b.title.as_str()), Some("B"));
        assert!(catalog.find(3).is_none());
    }

    #[test]
    fn all_preserves_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.add(sample(5, "First"));
        catalog.add(sample(2, "Second"));
        catalog.add(sample(9, "Third"));

        let titles: Vec<_> = catalog.all().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, ["First", "Second", "Third"]);
    }

    #[test]
    fn remove_reports_whether_a_record_existed() {
        let mut catalog = Catalog::new();
        catalog.add(sample(1, "A"));

        assert!(catalog.remove(1));
        assert!(catalog.find(1).is_none());
        assert!(!catalog.remove(1));
        assert!(catalog.is_empty());
    }

    #[test]
    fn max_id_tracks_the_highest_in_use() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.max_id(), None);
        catalog.add(sample(7, "A"));
        catalog.add(sample(3, "B"));
        assert_eq!(catalog.max_id(), Some(7));
    }
}
