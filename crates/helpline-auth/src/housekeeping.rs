// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic purge of expired codes and sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::authority::AdminSessionAuthority;

/// Spawn the purge loop. It exits when `cancel` fires.
pub fn spawn_housekeeping(
    authority: Arc<AdminSessionAuthority>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // Skip the first immediate tick.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = authority.purge_expired().await {
                        warn!(error = %e, "credential housekeeping failed (non-fatal)");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("credential housekeeping shutting down");
                    break;
                }
            }
        }
    })
}
