//! Business logic services

pub mod lending;
pub mod users;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
pub struct Services {
    pub lending: lending::LendingService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository; loads the persisted
    /// catalog once.
    pub fn new(repository: Repository) -> AppResult<Self> {
        Ok(Self {
            lending: lending::LendingService::new(repository.books)?,
            users: users::UsersService::new(repository.users),
        })
    }
}
