// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the server and background loops monitor.
//! Conversations mid-reply are drained before the process exits.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::locks::ConversationLocks;

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    error!(error = %e, "failed to install SIGTERM handler, only Ctrl+C stops the server");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits up to `timeout` for every conversation currently being answered.
///
/// Returns `true` when all of them finished in time.
pub async fn drain_conversations(locks: &ConversationLocks, timeout: Duration) -> bool {
    let busy = locks.busy();
    if busy.is_empty() {
        info!("no conversations in flight");
        return true;
    }

    info!(count = busy.len(), "waiting for in-flight replies to complete");
    let wait_all = async {
        for lock in &busy {
            drop(lock.lock().await);
        }
    };
    match tokio::time::timeout(timeout, wait_all).await {
        Ok(()) => {
            info!("all conversations drained");
            true
        }
        Err(_) => {
            warn!(timeout = ?timeout, "drain timed out, some replies interrupted");
            false
        }
    }
}
