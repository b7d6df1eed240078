// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each takes a `&Database` and runs through its single writer.

pub mod analytics;
pub mod credentials;
pub mod messages;
pub mod patterns;
pub mod takeovers;
