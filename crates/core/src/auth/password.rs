//! Account passwords: the length policy and Argon2id PHC hashing.
//!
//! Every account (resident, manager, business, admin) signs in with a
//! username and password. Only the PHC string ever reaches the `users` table.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors from hashing or checking an account password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The password is shorter than [`MIN_PASSWORD_LEN`].
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    TooShort,

    /// Argon2 could not produce a hash.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Argon2 failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Checks a password meets the length requirement.
#[must_use]
pub fn is_acceptable_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Hashes a new account password.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` for a password the length policy refuses
/// and `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use domus_core::auth::hash_password;
///
/// let hash = hash_password("maple-court-4b").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// assert!(hash_password("4b").is_err());
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if !is_acceptable_password(password) {
        return Err(PasswordError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a sign-in attempt against the stored hash. A wrong password is
/// `Ok(false)`, not an error.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash is malformed and
/// `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let stored = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("lobby42", false)]
    #[case("lobby-42", true)]
    #[case("écluse-9", true)]
    fn test_length_policy_counts_characters(#[case] password: &str, #[case] accepted: bool) {
        assert_eq!(is_acceptable_password(password), accepted);
    }

    #[test]
    fn test_short_password_is_never_hashed() {
        assert!(matches!(hash_password("tenant"), Err(PasswordError::TooShort)));
    }

    #[test]
    fn test_resident_signs_in_with_own_password_only() {
        let stored = hash_password("apartment-12c").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("apartment-12c"));
        assert!(verify_password("apartment-12c", &stored).unwrap());
        assert!(!verify_password("apartment-12d", &stored).unwrap());
    }

    #[test]
    fn test_two_accounts_with_one_password_store_different_hashes() {
        let manager = hash_password("password123").unwrap();
        let business = hash_password("password123").unwrap();

        assert_ne!(manager, business);
        assert!(verify_password("password123", &manager).unwrap());
        assert!(verify_password("password123", &business).unwrap());
    }

    #[test]
    fn test_plaintext_column_value_is_rejected() {
        let result = verify_password("password123", "password123");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }
}
