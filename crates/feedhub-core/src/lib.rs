// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Feedhub Core - Identity and Feed Registration Engine
//!
//! This crate implements the server-side core of feedhub: sign-up, sign-in,
//! and feed registration, each expressed as a short workflow driven by a
//! generic state-machine executor. The HTTP boundary lives outside this
//! crate; it decodes requests, calls the services here, and translates
//! [`error::AppError`] codes into response statuses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Transport layer (not here)               │
//! │       JSON decode / token check / status translation      │
//! └──────────────────────────────────────────────────────────┘
//!                │                            │
//!                ▼                            ▼
//! ┌───────────────────────┐      ┌───────────────────────────┐
//! │ service::AuthService  │      │   service::FeedService    │
//! │ sign_up / sign_in     │      │ add / remove / list / get │
//! └───────────┬───────────┘      └─────────────┬─────────────┘
//!             │          machine::run          │
//!             └──────────────┬─────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │        AuthStore / FeedStore ports (async traits)        │
//! │     store::PostgresStore        store::MemoryStore       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Workflows
//!
//! Every multi-step operation runs through [`machine::run`], which invokes
//! one step at a time, checks the cancellation token between steps, and
//! stops at the first error. Steps own the argument bundle for the whole
//! invocation; nothing is shared across concurrent invocations.
//!
//! | Workflow | Steps |
//! |----------|-------|
//! | sign-up  | `check_available` → `create_auth_and_user` → `issue_token` |
//! | sign-in  | `lookup` → `verify_password` → `issue_token` |
//! | add-feed | `find_or_create` → `create_feed` → `associate` |
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `FEEDHUB_DATABASE_URL` | Yes | - | PostgreSQL connection string |
//! | `FEEDHUB_JWT_SECRET` | Yes | - | HMAC secret for bearer tokens |
//! | `FEEDHUB_TOKEN_TTL_HOURS` | No | `24` | Bearer token lifetime |
//!
//! # Modules
//!
//! - [`auth`]: Identity records and the credential store port
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Classified errors with status-code mapping
//! - [`feed`]: Feed records and the feed store port
//! - [`hash`]: Password hashing and verification (argon2id)
//! - [`machine`]: Generic sequential workflow executor
//! - [`service`]: Sign-up, sign-in, and feed registration workflows
//! - [`store`]: Postgres and in-memory store backends
//! - [`token`]: Stateless bearer token signing and verification
//! - [`user`]: Subject profile records

#![deny(missing_docs)]

/// Identity records and the credential store port.
pub mod auth;

/// Configuration loading from environment variables.
pub mod config;

/// Classified errors with status-code mapping.
pub mod error;

/// Feed records and the feed store port.
pub mod feed;

/// Password hashing and verification.
pub mod hash;

/// Generic sequential workflow executor.
pub mod machine;

/// Sign-up, sign-in, and feed registration workflows.
pub mod service;

/// Postgres and in-memory store backends.
pub mod store;

/// Stateless bearer token signing and verification.
pub mod token;

/// Subject profile records.
pub mod user;
