// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow-backed services exposed to the transport layer.
//!
//! Each service validates its input synchronously, then drives the rest of
//! the operation through [`crate::machine::run`]. The transport layer is
//! responsible for decoding requests, carrying the subject identifier
//! recovered from a verified token, and translating error codes into
//! response statuses.

pub mod auth;
pub mod feed;

pub use auth::AuthService;
pub use feed::FeedService;
