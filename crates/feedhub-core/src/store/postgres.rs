// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Postgres-backed store implementation.
//!
//! Uniqueness of `auths.email` and `feeds.url` is enforced here by database
//! constraints (see `migrations/`); the workflows' own lookups are only a
//! fast path, so a constraint violation from a concurrent request surfaces
//! as the same invalid-input error the fast path would have produced.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use crate::auth::{Auth, AuthStore, BasicAuth};
use crate::error::{AppError, MSG_USER_EXISTS};
use crate::feed::{Feed, FeedStore};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Postgres-backed implementation of [`AuthStore`] and [`FeedStore`].
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool. Migrations are the caller's concern.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and run migrations.
    ///
    /// # Errors
    ///
    /// Internal error when the connection or a migration fails.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| AppError::internal(format!("database connection failed: {e}")))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::internal(format!("migration failed: {e}")))?;

        Ok(Self::new(pool))
    }

    /// The underlying pool, for embedders that share it.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl AuthStore for PostgresStore {
    async fn create_auth_and_user(&self, auth: &mut Auth) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let name = auth.user.as_ref().map(|u| u.name.clone()).unwrap_or_default();
        let (user_id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (name, created_at, modified_at)
            VALUES ($1, $2, $2)
            RETURNING id
            "#,
        )
        .bind(&name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        auth.user_id = user_id;
        auth.created_at = now;
        auth.modified_at = now;
        auth.last_signed_in_at = now;
        if let Some(user) = auth.user.as_mut() {
            user.id = user_id;
            user.created_at = now;
            user.modified_at = now;
        }

        let inserted: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO auths (user_id, email, password, created_at, modified_at, last_signed_in_at)
            VALUES ($1, $2, $3, $4, $4, $4)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&auth.basic.email)
        .bind(&auth.basic.password)
        .bind(now)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok((id,)) => auth.id = id,
            // Lost the check-then-create race; the transaction rolls the
            // user row back, so neither row remains.
            Err(e) if is_unique_violation(&e) => return Err(AppError::invalid(MSG_USER_EXISTS)),
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;
        debug!(auth_id = auth.id, user_id, "identity and subject created");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Auth>, AppError> {
        let row: Option<(i64, i64, String)> = sqlx::query_as(
            r#"
            SELECT id, user_id, password
            FROM auths
            WHERE email = $1 AND deleted = FALSE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, user_id, password)| Auth {
            id,
            user_id,
            basic: BasicAuth {
                email: email.to_string(),
                password,
            },
            ..Auth::default()
        }))
    }
}

#[async_trait]
impl FeedStore for PostgresStore {
    async fn create_feed(&self, feed: &mut Feed) -> Result<(), AppError> {
        let now = Utc::now();

        let inserted: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO feeds (url, created_at, modified_at, last_synced_at)
            VALUES ($1, $2, $2, $2)
            RETURNING id
            "#,
        )
        .bind(&feed.url)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok((id,)) => {
                feed.id = id;
                feed.created_at = now;
                feed.modified_at = now;
                feed.last_synced_at = now;
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(AppError::invalid("feed exists.")),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_user_feed(&self, feed: &Feed) -> Result<(), AppError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO user_feeds (user_id, feed_id, name, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(feed.user_id)
        .bind(feed.id)
        .bind(&feed.name)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => Ok(()),
            Ok(_) => Err(AppError::internal("user feed association not created")),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::invalid("feed already associated."))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_user_feeds(&self, user_id: i64) -> Result<Vec<Feed>, AppError> {
        let rows: Vec<FeedRow> = sqlx::query_as(
            r#"
            SELECT f.id, uf.name, f.url, f.created_at, f.modified_at, f.last_synced_at, uf.user_id
            FROM feeds f
            JOIN user_feeds uf ON uf.feed_id = f.id
            WHERE uf.user_id = $1 AND f.deleted = FALSE
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(feed_from_row).collect())
    }

    async fn find_user_feed_by_id(
        &self,
        user_id: i64,
        feed_id: i64,
    ) -> Result<Option<Feed>, AppError> {
        let row: Option<FeedRow> = sqlx::query_as(
            r#"
            SELECT f.id, uf.name, f.url, f.created_at, f.modified_at, f.last_synced_at, uf.user_id
            FROM feeds f
            JOIN user_feeds uf ON uf.feed_id = f.id
            WHERE uf.user_id = $1 AND f.id = $2 AND f.deleted = FALSE
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(feed_from_row))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Feed>, AppError> {
        let row: Option<(i64, String, DateTime<Utc>, DateTime<Utc>, DateTime<Utc>)> =
            sqlx::query_as(
                r#"
                SELECT id, url, created_at, modified_at, last_synced_at
                FROM feeds
                WHERE url = $1 AND deleted = FALSE
                "#,
            )
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(
            |(id, url, created_at, modified_at, last_synced_at)| Feed {
                id,
                url,
                created_at,
                modified_at,
                last_synced_at,
                ..Feed::default()
            },
        ))
    }

    async fn delete_feed(&self, user_id: i64, feed_id: i64) -> Result<(), AppError> {
        // Removes the association only; the canonical feed row stays for
        // other subscribers. Deleting an absent association is a no-op.
        sqlx::query(
            r#"
            DELETE FROM user_feeds
            WHERE user_id = $1 AND feed_id = $2
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

type FeedRow = (
    i64,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
);

fn feed_from_row(row: FeedRow) -> Feed {
    let (id, name, url, created_at, modified_at, last_synced_at, user_id) = row;
    Feed {
        id,
        name,
        url,
        created_at,
        modified_at,
        last_synced_at,
        user_id,
        ..Feed::default()
    }
}
