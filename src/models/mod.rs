//! Data models for Seldio

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use user::{Role, User};
