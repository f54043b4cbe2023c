//! File-backed storage for the user directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::User;

use super::codec;

/// Reads the user directory file. The server never writes it; records are
/// added by editing the file externally (see the `hashpw` helper binary).
#[derive(Debug, Clone)]
pub struct UserRepository {
    path: PathBuf,
}

impl UserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads every user record. A missing file yields no users; the
    /// directory service installs its fallback identity in that case.
    pub fn load(&self) -> io::Result<Vec<User>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut users = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_user(line) {
                Ok(user) => users.push(user),
                Err(e) => tracing::warn!(
                    "Skipping {}:{}: {}",
                    self.path.display(),
                    number + 1,
                    e
                ),
            }
        }
        Ok(users)
    }
}
