use crate::models::UserRow;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;

/// Per-row processing for audience upload
///
/// Turns one input row into the hashed identifier the matching service
/// expects: the SHA-256 hex digest of the lowercased, UTF-8 encoded email.
/// Failures are explicit values, not panics or exceptions, so the row loop
/// in the connector stays a plain fold over results.

/// Why a single row could not be turned into a hashed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// No usable email field on the row.
    MissingEmail,
    /// Email present but structurally malformed.
    InvalidEmail(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowError::MissingEmail => write!(f, "Email is required for Meta Custom Audiences"),
            RowError::InvalidEmail(email) => write!(f, "Invalid email format: '{}'", email),
        }
    }
}

/// Validate email address structure
///
/// Checks for:
/// - Basic email shape (contains @ and .)
/// - Minimum length requirements
/// - Valid domain structure
pub fn is_valid_email(email: &str) -> bool {
    // Basic checks
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // RFC 5322 simplified email regex
    // Matches: local@domain.tld
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    email_regex.is_match(email)
}

/// Hashes one row into the identifier record submitted to the audience.
///
/// The email is lowercased before hashing, so `Test@Example.com` and
/// `test@example.com` produce the same record. Output is always a
/// 64-character lowercase hex string.
pub fn hash_user_row(row: &UserRow) -> Result<String, RowError> {
    let email = row
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or(RowError::MissingEmail)?;

    if !is_valid_email(email) {
        return Err(RowError::InvalidEmail(email.to_string()));
    }

    let mut hasher = Sha256::new();
    hasher.update(email.to_lowercase().as_bytes());
    Ok(hex::encode(hasher.finalize()))
}
