// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Helpline support relay.
//!
//! Provides the [`SqliteStorage`] adapter backed by a single
//! tokio-rusqlite writer connection, embedded refinery migrations, and
//! typed query modules for messages, patterns, analytics, takeovers and
//! admin credentials.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
