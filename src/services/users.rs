//! User directory and credential verification service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
    repository::UserRepository,
};

/// Identity installed when the backing store holds no users, so a fresh
/// deployment is never locked out.
const FALLBACK_USERNAME: &str = "seldio";
const FALLBACK_PASSWORD: &str = "1234";
const FALLBACK_ROLE: Role = Role::Admin;

/// Checks credentials against the user store.
///
/// The store is re-read on every login attempt. That is a deliberate
/// no-cache policy: the server never writes the user file, so external
/// edits must take effect on the next attempt without a restart.
pub struct UsersService {
    repository: UserRepository,
}

impl UsersService {
    pub fn new(repository: UserRepository) -> Self {
        Self { repository }
    }

    /// Verifies credentials and returns the matching user's role.
    pub fn check_login(&self, username: &str, password: &str) -> AppResult<Role> {
        let users = self.reload()?;
        for user in users.iter().filter(|u| u.username == username) {
            if verify_password(&user.password_hash, password) {
                return Ok(user.role);
            }
        }
        Err(AppError::Authentication(
            "invalid username or password".to_string(),
        ))
    }

    /// Re-reads the backing store, installing the fallback identity when
    /// it yields no records.
    fn reload(&self) -> AppResult<Vec<User>> {
        let mut users = self.repository.load()?;
        if users.is_empty() {
            tracing::warn!(
                "User store is empty, installing fallback identity {:?}",
                FALLBACK_USERNAME
            );
            users.push(User {
                username: FALLBACK_USERNAME.to_string(),
                password_hash: hash_password(FALLBACK_PASSWORD)?,
                role: FALLBACK_ROLE,
            });
        }
        Ok(users)
    }
}

/// Hash a password using Argon2, producing a PHC string suitable for a
/// user store line.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored PHC hash string. A stored
/// credential that is not a valid hash (for example a leftover plaintext
/// password) never matches.
fn verify_password(stored: &str, password: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            tracing::warn!("Stored credential is not a valid password hash");
            false
        }
    }
}
