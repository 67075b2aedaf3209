// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Identity records and the credential store port.
//!
//! An [`Auth`] is one credential record bound to a [`User`] profile. The
//! password field holds a plaintext value only transiently, inside the
//! sign-up workflow before hashing; it is never serialized back out and
//! must never be logged.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::user::User;

/// Email/password pair attached to an identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicAuth {
    /// Sign-in email, unique across all identities.
    pub email: String,
    /// Plaintext on the way in, argon2id hash once persisted. Deserialize
    /// only; responses never carry it.
    #[serde(skip_serializing)]
    pub password: String,
}

/// One authentication credential record bound to a subject.
///
/// Email uniqueness is enforced by the store (a database constraint); the
/// sign-up workflow's own lookup is a fast-path rejection, not the
/// correctness mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Auth {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning subject identifier.
    pub user_id: i64,
    /// Profile created together with this record during sign-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Email/password pair.
    pub basic: BasicAuth,
    /// Soft enable flag.
    pub enabled: bool,
    /// Soft delete flag.
    pub deleted: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub modified_at: DateTime<Utc>,
    /// When the subject last signed in.
    pub last_signed_in_at: DateTime<Utc>,
    /// Bearer token computed by the workflow for this response.
    /// Transient; never persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            id: 0,
            user_id: 0,
            user: None,
            basic: BasicAuth::default(),
            enabled: true,
            deleted: false,
            created_at: DateTime::UNIX_EPOCH,
            modified_at: DateTime::UNIX_EPOCH,
            last_signed_in_at: DateTime::UNIX_EPOCH,
            token: None,
        }
    }
}

impl Auth {
    /// Start building an identity record.
    pub fn builder() -> AuthBuilder {
        AuthBuilder::default()
    }
}

/// Builder for [`Auth`] values handed to the workflows.
#[derive(Debug, Default)]
pub struct AuthBuilder {
    auth: Auth,
}

impl AuthBuilder {
    /// Set the sign-in email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.auth.basic.email = email.into();
        self
    }

    /// Set the plaintext password (hashed by the sign-up workflow).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth.basic.password = password.into();
        self
    }

    /// Attach a profile with the given display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.auth.user = Some(User::named(name));
        self
    }

    /// Finish building.
    pub fn build(self) -> Auth {
        self.auth
    }
}

/// Credential store port.
///
/// Backed by [`crate::store::PostgresStore`] in production and
/// [`crate::store::MemoryStore`] in tests.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Atomically create the subject profile and its credential record:
    /// both exist afterwards or neither does. Assigns identifiers and
    /// timestamps into `auth`. An email collision is an invalid-input
    /// error, never an overwrite.
    async fn create_auth_and_user(&self, auth: &mut Auth) -> Result<(), AppError>;

    /// Look up a credential record by email; `None` when absent.
    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_populates_fields() {
        let auth = Auth::builder()
            .email("gopher@go.com")
            .password("password1")
            .name("Gopher")
            .build();

        assert_eq!(auth.basic.email, "gopher@go.com");
        assert_eq!(auth.basic.password, "password1");
        assert_eq!(auth.user.expect("profile").name, "Gopher");
        assert!(auth.enabled);
        assert!(!auth.deleted);
    }

    #[test]
    fn test_password_is_never_serialized() {
        let auth = Auth::builder()
            .email("gopher@go.com")
            .password("password1")
            .name("Gopher")
            .build();

        let json = serde_json::to_string(&auth).expect("serialize");
        assert!(!json.contains("password1"));
        assert!(!json.contains("\"password\""));
        assert!(json.contains("gopher@go.com"));
    }

    #[test]
    fn test_deserializes_camel_case_request() {
        let json = r#"{"basic":{"email":"a@b.com","password":"pw"},"user":{"name":"A"}}"#;
        let auth: Auth = serde_json::from_str(json).expect("deserialize");

        assert_eq!(auth.basic.email, "a@b.com");
        assert_eq!(auth.basic.password, "pw");
        assert_eq!(auth.user.expect("profile").name, "A");
        assert_eq!(auth.id, 0);
        assert!(auth.token.is_none());
    }
}
