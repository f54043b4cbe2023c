//! Generates an argon2 PHC hash for a user store entry.
//!
//! The server never writes the user file; operators add users by hand with
//! lines of the form `username password-hash role`. This helper produces
//! the hash token:
//!
//! ```text
//! hashpw <password>
//! ```

use seldio_server::services::users::hash_password;

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: hashpw <password>"))?;

    println!("{}", hash_password(&password)?);
    Ok(())
}
