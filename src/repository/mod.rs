//! Storage layer: the in-memory catalog and the file-backed stores.

pub mod books;
pub mod catalog;
pub mod codec;
pub mod users;

pub use books::BookRepository;
pub use catalog::Catalog;
pub use users::UserRepository;

use crate::config::StorageConfig;

/// Main repository struct bundling the file-backed stores
#[derive(Debug, Clone)]
pub struct Repository {
    pub books: BookRepository,
    pub users: UserRepository,
}

impl Repository {
    /// Create a new repository over the configured storage paths
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            books: BookRepository::new(storage.books_file.clone()),
            users: UserRepository::new(storage.users_file.clone()),
        }
    }
}
