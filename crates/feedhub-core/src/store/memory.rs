// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory store for tests and embedded use.
//!
//! Mirrors the Postgres backend's semantics exactly: the same uniqueness
//! rules, the same atomicity of the sign-up write, the same canonical-row
//! sharing for feeds. Service tests run against this backend without a
//! database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::auth::{Auth, AuthStore};
use crate::error::{AppError, MSG_USER_EXISTS};
use crate::feed::{Feed, FeedStore};
use crate::user::User;

/// A subject-feed association row.
#[derive(Debug, Clone)]
struct UserFeed {
    user_id: i64,
    feed_id: i64,
    name: String,
}

#[derive(Debug, Default)]
struct Inner {
    auths: Vec<Auth>,
    users: Vec<User>,
    feeds: Vec<Feed>,
    user_feeds: Vec<UserFeed>,
    next_auth_id: i64,
    next_user_id: i64,
    next_feed_id: i64,
}

/// In-memory implementation of [`AuthStore`] and [`FeedStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of credential records. Test support.
    pub async fn auth_count(&self) -> usize {
        self.inner.lock().await.auths.len()
    }

    /// Number of subject profiles. Test support.
    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    /// Number of canonical feed rows. Test support.
    pub async fn feed_count(&self) -> usize {
        self.inner.lock().await.feeds.len()
    }

    /// Number of subject-feed associations. Test support.
    pub async fn association_count(&self) -> usize {
        self.inner.lock().await.user_feeds.len()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn create_auth_and_user(&self, auth: &mut Auth) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        // Checked before either row is written, so a collision leaves the
        // store untouched.
        if inner
            .auths
            .iter()
            .any(|a| a.basic.email == auth.basic.email)
        {
            return Err(AppError::invalid(MSG_USER_EXISTS));
        }

        let now = Utc::now();

        inner.next_user_id += 1;
        let user_id = inner.next_user_id;
        let mut user = auth.user.clone().unwrap_or_default();
        user.id = user_id;
        user.created_at = now;
        user.modified_at = now;
        inner.users.push(user.clone());

        inner.next_auth_id += 1;
        auth.id = inner.next_auth_id;
        auth.user_id = user_id;
        auth.user = Some(user);
        auth.created_at = now;
        auth.modified_at = now;
        auth.last_signed_in_at = now;

        let mut stored = auth.clone();
        stored.token = None;
        inner.auths.push(stored);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .auths
            .iter()
            .find(|a| a.basic.email == email && !a.deleted)
            .cloned())
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn create_feed(&self, feed: &mut Feed) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        if inner.feeds.iter().any(|f| f.url == feed.url) {
            return Err(AppError::invalid("feed exists."));
        }

        let now = Utc::now();
        inner.next_feed_id += 1;
        feed.id = inner.next_feed_id;
        feed.created_at = now;
        feed.modified_at = now;
        feed.last_synced_at = now;

        // The canonical row carries no association fields.
        let mut stored = feed.clone();
        stored.name = String::new();
        stored.user_id = 0;
        inner.feeds.push(stored);
        Ok(())
    }

    async fn create_user_feed(&self, feed: &Feed) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        if inner
            .user_feeds
            .iter()
            .any(|uf| uf.user_id == feed.user_id && uf.feed_id == feed.id)
        {
            return Err(AppError::invalid("feed already associated."));
        }

        inner.user_feeds.push(UserFeed {
            user_id: feed.user_id,
            feed_id: feed.id,
            name: feed.name.clone(),
        });
        Ok(())
    }

    async fn list_user_feeds(&self, user_id: i64) -> Result<Vec<Feed>, AppError> {
        let inner = self.inner.lock().await;
        let mut feeds: Vec<Feed> = inner
            .user_feeds
            .iter()
            .filter(|uf| uf.user_id == user_id)
            .filter_map(|uf| {
                inner
                    .feeds
                    .iter()
                    .find(|f| f.id == uf.feed_id && !f.deleted)
                    .map(|f| Feed {
                        name: uf.name.clone(),
                        user_id: uf.user_id,
                        ..f.clone()
                    })
            })
            .collect();
        feeds.sort_by_key(|f| f.id);
        Ok(feeds)
    }

    async fn find_user_feed_by_id(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> Result<Option<Feed>, AppError> {
        let inner = self.inner.lock().await;
        let Some(assoc) = inner
            .user_feeds
            .iter()
            .find(|uf| uf.user_id == user_id && uf.feed_id == feed_id)
        else {
            return Ok(None);
        };

        Ok(inner
            .feeds
            .iter()
            .find(|f| f.id == feed_id && !f.deleted)
            .map(|f| Feed {
                name: assoc.name.clone(),
                user_id: assoc.user_id,
                ..f.clone()
            }))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Feed>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .feeds
            .iter()
            .find(|f| f.url == url && !f.deleted)
            .cloned())
    }

    async fn delete_feed(&self, user_id: i64, feed_id: i64) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        inner
            .user_feeds
            .retain(|uf| !(uf.user_id == user_id && uf.feed_id == feed_id));
        Ok(())
    }
}
