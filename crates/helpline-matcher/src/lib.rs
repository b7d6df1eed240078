// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge Matcher for the Helpline support relay.
//!
//! - [`KnowledgeMatcher`]: pure keyword scoring with an escalation threshold
//! - [`feedback`]: usage counting, confidence nudges and admin training
//! - [`defaults`]: the bootstrap pattern set

pub mod defaults;
pub mod feedback;
pub mod matcher;

pub use defaults::{default_patterns, seed_if_empty};
pub use feedback::{record_match, record_usage, train_pattern};
pub use matcher::{KnowledgeMatcher, MatchResult, fold_case};
