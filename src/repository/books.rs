//! File-backed storage for the book catalog.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::Book;

use super::codec;

/// Reads and rewrites the whole catalog file. Loading is not incremental:
/// a load replaces everything, a save rewrites everything.
#[derive(Debug, Clone)]
pub struct BookRepository {
    path: PathBuf,
}

impl BookRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the entire catalog.
    ///
    /// A missing file is an empty catalog (first run). Blank lines are
    /// skipped silently; malformed lines are skipped with a warning so one
    /// corrupt record does not take the whole catalog down.
    pub fn load(&self) -> io::Result<Vec<Book>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut books = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_book(line) {
                Ok(book) => books.push(book),
                Err(e) => tracing::warn!(
                    "Skipping {}:{}: {}",
                    self.path.display(),
                    number + 1,
                    e
                ),
            }
        }
        Ok(books)
    }

    /// Rewrites the catalog file with one line per book.
    ///
    /// The content goes to a temporary sibling first and is renamed into
    /// place, so a crash mid-write leaves the previous file intact.
    pub fn save(&self, books: &[Book]) -> io::Result<()> {
        let mut contents = String::new();
        for book in books {
            contents.push_str(&codec::encode_book(book));
            contents.push('\n');
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let repository = BookRepository::new(dir.path().join("books.txt"));
        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let repository = BookRepository::new(dir.path().join("books.txt"));

        let mut borrowed = Book::new(2, "Emma", "Jane Austen", "Classic", "");
        borrowed.is_available = false;
        borrowed.borrowed_by = "alice".to_string();
        borrowed.due_date = 1_700_000_000;
        let books = vec![Book::new(1, "Dune", "Frank Herbert", "", ""), borrowed];

        repository.save(&books).unwrap();
        assert_eq!(repository.load().unwrap(), books);
    }

    #[test]
    fn load_skips_blank_and_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.txt");
        fs::write(
            &path,
            "1|Dune|Frank Herbert|1|NONE|General|NONE|0|0|0\n\nnot a record\n2|Emma|Jane Austen|1\n",
        )
        .unwrap();

        let books = BookRepository::new(path).load().unwrap();
        let ids: Vec<_> = books.iter().map(|b| b.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repository = BookRepository::new(dir.path().join("books.txt"));

        repository
            .save(&[Book::new(1, "Dune", "Frank Herbert", "", "")])
            .unwrap();
        repository
            .save(&[Book::new(2, "Emma", "Jane Austen", "", "")])
            .unwrap();

        let books = repository.load().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, 2);
    }
}
