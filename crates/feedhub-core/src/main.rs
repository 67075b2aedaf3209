// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Feedhub Core - Identity and Feed Registration Backend
//!
//! Core is responsible for:
//! - Sign-up / sign-in workflows (argon2id credentials, bearer tokens)
//! - Feed registration workflows (canonical feeds, per-subject associations)
//!
//! Note: HTTP routing and request decoding live in the transport layer;
//! this binary wires configuration, the database, and the services.

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};

use feedhub_core::config::Config;
use feedhub_core::service::{AuthService, FeedService};
use feedhub_core::store::PostgresStore;
use feedhub_core::token::TokenSigner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("feedhub_core=info".parse().unwrap()),
        )
        .init();

    info!("Starting Feedhub Core");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        token_ttl_hours = config.token_ttl_hours,
        "Configuration loaded"
    );

    // Connect to database
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    info!("Database connection established");

    // Verify connection
    let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await?;
    info!(result = row.0, "Database health check passed");

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    // Wire the services over the shared store
    let store = Arc::new(PostgresStore::new(pool.clone()));
    let signer = TokenSigner::new(config.jwt_secret.as_bytes());
    let _auth_service = AuthService::new(store.clone(), signer)
        .with_token_ttl_hours(config.token_ttl_hours);
    let _feed_service = FeedService::new(store);

    info!("Feedhub Core initialized successfully");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}
