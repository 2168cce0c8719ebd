//! Admin login commands.
//!
//! # Usage
//!
//! ```bash
//! # Prompted
//! preface-cli admin hash-password
//!
//! # Piped
//! printf '%s' "$ADMIN_PASSWORD" | preface-cli admin hash-password
//! ```
//!
//! The PHC string printed on stdout goes into `ADMIN_PASSWORD_HASH`.

use std::io::{BufRead, Write};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use preface_storefront::services::auth::{self, AuthError};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Reading the password failed.
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    /// Password rejected or hashing failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Read a password from stdin and print its Argon2id hash.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, or the password is too short.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn hash_password() -> Result<(), AdminError> {
    eprint!("Admin password: ");
    std::io::stderr().flush()?;

    let password = read_password(std::io::stdin().lock())?;
    let hash = auth::hash_password(password.expose_secret())?;

    println!("{hash}");
    tracing::info!("Set ADMIN_PASSWORD_HASH to the value above");
    Ok(())
}

/// First line of `reader`, without the line ending.
fn read_password(mut reader: impl BufRead) -> Result<SecretString, std::io::Error> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(password))
}
