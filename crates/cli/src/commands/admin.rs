//! Admin account commands.
//!
//! The admin console has one account, configured through `ADMIN_EMAIL` and
//! `ADMIN_PASSWORD_HASH`. This produces the hash.

use std::io::BufRead;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString, rand_core::OsRng};
use thiserror::Error;

/// Shortest password accepted for the admin account.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur while hashing.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Read a password from the first line of stdin and print its argon2 hash.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the password is too short, or
/// hashing fails.
pub fn hash_password() -> Result<(), AdminError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let hash = hash(line.trim_end_matches(['\r', '\n']))?;

    #[allow(clippy::print_stdout)]
    {
        println!("ADMIN_PASSWORD_HASH='{hash}'");
    }
    Ok(())
}

fn hash(password: &str) -> Result<String, AdminError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AdminError::Hash(e.to_string()))
}
