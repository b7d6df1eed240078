// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin Session Authority for the Helpline support relay.
//!
//! An admin logs in with a six-digit code pushed to the Telegram admin
//! chat and receives a bearer token valid for a fixed lifetime. Only the
//! SHA-256 of the token is stored.

pub mod authority;
pub mod housekeeping;
pub mod token;

pub use authority::AdminSessionAuthority;
pub use housekeeping::spawn_housekeeping;
