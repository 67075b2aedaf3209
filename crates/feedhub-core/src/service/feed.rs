// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Feed registration workflow and the simple feed operations.
//!
//! Registration runs `find_or_create` → `create_feed` → `associate` through
//! the executor. Feeds are process-wide shared resources: two subjects
//! registering the same URL must end up referencing one canonical feed row,
//! each through their own association. Removal and listing are plain store
//! pass-throughs; they get no state-machine treatment.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{AppError, MSG_URL_REQUIRED};
use crate::feed::{AddFeedRequest, Feed, FeedStore};
use crate::machine::{self, Step, StepFuture};

/// Feed registration workflow over a [`FeedStore`].
#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn FeedStore>,
}

impl std::fmt::Debug for FeedService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedService").finish_non_exhaustive()
    }
}

/// Argument bundle threaded through one registration invocation.
struct FeedArgs {
    store: Arc<dyn FeedStore>,
    feed: Feed,
}

impl FeedService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self { store }
    }

    /// Register a feed for `req.user_id`; returns the canonical feed id.
    ///
    /// If the URL is already registered (by anyone), the existing feed row
    /// is reused and only a new association is created.
    ///
    /// # Errors
    ///
    /// Invalid-input when the URL is empty; internal for store failure.
    #[instrument(skip_all, fields(user_id = req.user_id, url = %req.url))]
    pub async fn add_feed(
        &self,
        cancel: &CancellationToken,
        req: AddFeedRequest,
    ) -> Result<i64, AppError> {
        if req.url.is_empty() {
            return Err(AppError::invalid(MSG_URL_REQUIRED));
        }

        let args = FeedArgs {
            store: self.store.clone(),
            feed: Feed::from(req),
        };
        let args = machine::run(cancel, args, Some(Step(find_or_create))).await?;

        info!(feed_id = args.feed.id, "feed registered");
        Ok(args.feed.id)
    }

    /// Remove one subject's association with a feed. The canonical feed row
    /// stays in place for other subscribers.
    ///
    /// # Errors
    ///
    /// Internal for store failure.
    pub async fn remove_feed(&self, user_id: i64, feed_id: i64) -> Result<(), AppError> {
        self.store.delete_feed(user_id, feed_id).await
    }

    /// List the feeds one subject is associated with.
    ///
    /// # Errors
    ///
    /// Internal for store failure.
    pub async fn list_feeds(&self, user_id: i64) -> Result<Vec<Feed>, AppError> {
        self.store.list_user_feeds(user_id).await
    }

    /// One subject's view of a feed; `None` without an association.
    ///
    /// # Errors
    ///
    /// Internal for store failure.
    pub async fn get_feed(&self, user_id: i64, feed_id: i64) -> Result<Option<Feed>, AppError> {
        self.store.find_user_feed_by_id(user_id, feed_id).await
    }
}

// ============================================================================
// Registration steps
// ============================================================================

/// Reuse the canonical feed row if the URL is already registered.
fn find_or_create(mut args: FeedArgs) -> StepFuture<FeedArgs> {
    Box::pin(async move {
        match args.store.find_by_url(&args.feed.url).await? {
            Some(existing) => {
                debug!(feed_id = existing.id, "reusing canonical feed row");
                args.feed.id = existing.id;
                Ok((args, Some(Step(associate))))
            }
            None => Ok((args, Some(Step(create_feed)))),
        }
    })
}

fn create_feed(mut args: FeedArgs) -> StepFuture<FeedArgs> {
    Box::pin(async move {
        args.store.create_feed(&mut args.feed).await?;
        Ok((args, Some(Step(associate))))
    })
}

fn associate(args: FeedArgs) -> StepFuture<FeedArgs> {
    Box::pin(async move {
        args.store.create_user_feed(&args.feed).await?;
        Ok((args, None))
    })
}
