//! Authentication service.
//!
//! There is a single admin account configured through the environment. Its
//! password is stored only as an Argon2id PHC string.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::ExposeSecret;

use crate::config::AdminCredentials;
use crate::models::CurrentAdmin;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    credentials: &'a AdminCredentials,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(credentials: &'a AdminCredentials) -> Self {
        Self { credentials }
    }

    /// Login with username and password.
    ///
    /// The password is always verified, even for an unknown username, so a
    /// wrong username takes as long as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username or password is wrong.
    pub fn login(&self, username: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let password_ok = verify_password(password, self.credentials.password_hash.expose_secret()).is_ok();
        if !password_ok || username.trim() != self.credentials.username {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(CurrentAdmin {
            username: self.credentials.username.clone(),
            logged_in_at: Utc::now(),
        })
    }
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against an Argon2 PHC string.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
