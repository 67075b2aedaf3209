//! Store backends for the credential and feed ports.
//!
//! This module provides the persistent Postgres backend and an in-memory
//! backend that mirrors its behavior (id assignment, timestamps, uniqueness)
//! for tests and embedders that do not want a database.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PostgresStore;
