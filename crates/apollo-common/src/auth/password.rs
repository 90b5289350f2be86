//! Password hashing, verification and strength policy
//!
//! Hashes are Argon2id PHC strings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash
///
/// # Errors
/// Returns an error if the stored hash is not a valid PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Rules a new password must satisfy
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_upper: true,
            require_lower: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// Check a password, reporting every unmet rule at once
    ///
    /// # Errors
    /// Returns a validation error listing the unmet rules
    pub fn check(&self, password: &str) -> Result<(), AppError> {
        let mut problems = Vec::new();

        if password.chars().count() < self.min_length {
            problems.push(format!("at least {} characters", self.min_length));
        }
        if self.require_upper && !password.chars().any(char::is_uppercase) {
            problems.push("an uppercase letter".to_string());
        }
        if self.require_lower && !password.chars().any(char::is_lowercase) {
            problems.push("a lowercase letter".to_string());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            problems.push("a digit".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Password must contain {}",
                problems.join(", ")
            )))
        }
    }
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService {
    policy: PasswordPolicy,
}

impl PasswordService {
    #[must_use]
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Check the policy, then hash
    ///
    /// # Errors
    /// Returns a validation error for a weak password, or an internal error if hashing fails
    pub fn hash_new(&self, password: &str) -> Result<String, AppError> {
        self.policy.check(password)?;
        hash_password(password)
    }

    /// Verify a password and return an error if invalid
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}
