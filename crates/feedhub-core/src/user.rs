// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Subject profile records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The human owner of an identity, distinct from the credential record.
///
/// Created exactly once, atomically with its owning [`crate::auth::Auth`]
/// during sign-up; never created standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last modified.
    pub modified_at: DateTime<Utc>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            created_at: DateTime::UNIX_EPOCH,
            modified_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl User {
    /// Profile with the given display name and zeroed store-assigned fields.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
