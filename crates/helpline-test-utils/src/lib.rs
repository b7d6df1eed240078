// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Helpline integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock completion provider with pre-configured replies
//! - [`MockChannel`] - Mock admin push channel with capture
//! - [`TestHarness`] - A wired `SupportAgent` on a temp database and a manual clock

pub mod harness;
pub mod mock_channel;
pub mod mock_provider;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_provider::MockProvider;
