// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Feed records and the feed store port.
//!
//! Feeds are process-wide shared resources: a URL maps to exactly one
//! canonical feed row, and each subject that registers it gets a
//! `user_feeds` association carrying their own display name for it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A registered content source, possibly viewed through one subject's
/// association (then `name` and `user_id` are that subject's).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Feed {
    /// Store-assigned identifier of the canonical feed row.
    pub id: i64,
    /// The registering subject's display name for this feed. Lives on the
    /// association, not the feed row.
    pub name: String,
    /// Source URL, unique across all feeds.
    pub url: String,
    /// Soft enable flag.
    pub enabled: bool,
    /// Soft delete flag.
    pub deleted: bool,
    /// When the feed row was created.
    pub created_at: DateTime<Utc>,
    /// When the feed row was last modified.
    pub modified_at: DateTime<Utc>,
    /// When the feed content was last synced.
    pub last_synced_at: DateTime<Utc>,
    /// Subject whose association this view belongs to.
    pub user_id: i64,
}

impl Default for Feed {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            url: String::new(),
            enabled: true,
            deleted: false,
            created_at: DateTime::UNIX_EPOCH,
            modified_at: DateTime::UNIX_EPOCH,
            last_synced_at: DateTime::UNIX_EPOCH,
            user_id: 0,
        }
    }
}

/// Inbound feed registration request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddFeedRequest {
    /// The subject's display name for the feed.
    pub name: String,
    /// Source URL to register.
    pub url: String,
    /// Registering subject; filled in by the boundary from the verified
    /// token, never taken from the request body.
    #[serde(skip)]
    pub user_id: i64,
}

impl From<AddFeedRequest> for Feed {
    fn from(req: AddFeedRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            user_id: req.user_id,
            ..Self::default()
        }
    }
}

/// Feed store port.
///
/// Backed by [`crate::store::PostgresStore`] in production and
/// [`crate::store::MemoryStore`] in tests.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Persist a new canonical feed row; assigns the identifier and
    /// timestamps into `feed`. A URL collision is an invalid-input error.
    async fn create_feed(&self, feed: &mut Feed) -> Result<(), AppError>;

    /// Persist the subject-feed association carried by `feed` (`user_id`,
    /// `id`, and the subject's display `name`).
    async fn create_user_feed(&self, feed: &Feed) -> Result<(), AppError>;

    /// Feeds associated with one subject, through their associations.
    async fn list_user_feeds(&self, user_id: i64) -> Result<Vec<Feed>, AppError>;

    /// One subject's view of a feed; `None` when no association exists.
    async fn find_user_feed_by_id(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> Result<Option<Feed>, AppError>;

    /// Canonical feed row by URL; `None` when the URL is unregistered.
    async fn find_by_url(&self, url: &str) -> Result<Option<Feed>, AppError>;

    /// Remove one subject's association. The canonical feed row stays; other
    /// subjects' associations are untouched.
    async fn delete_feed(&self, user_id: i64, feed_id: i64) -> Result<(), AppError>;
}
