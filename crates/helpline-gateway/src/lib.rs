// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP JSON gateway for the Helpline support relay.
//!
//! Public routes serve the chat widget: sending messages, polling for new
//! ones and rating bot replies. Routes under `/admin` (except the login
//! pair) require a bearer session issued by the code login.

pub mod admin;
pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use extract::{ValidJson, ValidQuery};
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
