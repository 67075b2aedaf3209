// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Password hashing and verification.
//!
//! argon2id with a random per-call salt; the PHC output string embeds the
//! salt and parameters, so verification needs nothing stored beside it.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{AppError, MSG_INVALID_CREDENTIALS, Result};

/// Hash a plaintext password for storage.
///
/// Salted per call: hashing the same input twice produces different
/// outputs, and both verify.
///
/// # Errors
///
/// Library failure only (never a property of the input); surfaces as
/// internal.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hashed| hashed.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash, for the sign-in path.
///
/// # Errors
///
/// A mismatch is an unauthorized error carrying the shared
/// invalid-credentials message, so sign-in gets one uniform error path; a
/// malformed hash or library failure is internal.
pub fn verify(password: &str, hashed: &str) -> Result<()> {
    if matches(password, hashed)? {
        Ok(())
    } else {
        Err(AppError::unauthorized(MSG_INVALID_CREDENTIALS))
    }
}

/// Predicate form of [`verify`] for callers that want a boolean.
///
/// # Errors
///
/// A malformed hash or library failure is internal; a plain mismatch is
/// `Ok(false)`.
pub fn matches(password: &str, hashed: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hashed)
        .map_err(|e| AppError::internal(format!("malformed password hash: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::internal(format!(
            "password verification failed: {e}"
        ))),
    }
}
