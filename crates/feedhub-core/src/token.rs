// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stateless bearer token signing and verification.
//!
//! A token is the entire session artifact: an HS256 JWT binding the subject
//! identifier and an absolute expiry. No server-side state is created.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject (user) identifier.
    sub: i64,
    /// Absolute expiry, seconds since the epoch.
    exp: i64,
}

/// Signs and verifies bearer tokens with a server-held HMAC secret.
///
/// Cheap to clone; the derived keys are shared with the workflows that
/// issue tokens.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are secret material; never show them.
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Derive HS256 keys from the configured secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user_id` expiring at `expires_at`.
    ///
    /// # Errors
    ///
    /// Local signing failure only; surfaces as internal.
    pub fn sign(&self, user_id: i64, expires_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("token signing failed: {e}")))
    }

    /// Verify a client-supplied token and recover the subject identifier.
    ///
    /// The algorithm is pinned to HS256 and expiry is strict with no leeway:
    /// a token is expired exactly when `exp < now`, so one expiring at this
    /// very second is still accepted.
    ///
    /// # Errors
    ///
    /// Every client-token problem (bad signature, unexpected algorithm,
    /// malformed claims, past expiry) is unauthorized with a generic
    /// message; internals of the failure are never echoed back.
    pub fn verify(&self, token: &str) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| AppError::unauthorized("invalid or expired token"))
    }
}
