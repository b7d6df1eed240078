// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpline serve` command implementation.
//!
//! Wires SQLite storage, the knowledge matcher, the AI escalation tier, the
//! admin session authority and the Telegram control channel into one
//! `SupportAgent`, then serves the HTTP gateway until a shutdown signal.
//! Optional pieces (Prometheus, Telegram, the completion service) degrade
//! with a warning instead of aborting startup.

use std::sync::Arc;
use std::time::Duration;

use helpline_agent::{NotifySettings, SupportAgent, shutdown};
use helpline_ai::{EscalationProcessor, OpenAiCompatProvider};
use helpline_auth::AdminSessionAuthority;
use helpline_config::model::HelplineConfig;
use helpline_core::{
    ChannelAdapter, Clock, HelplineError, PluginAdapter, ProviderAdapter, StorageAdapter,
    SystemClock,
};
use helpline_gateway::{GatewayState, HealthState, ServerConfig};
use helpline_matcher::KnowledgeMatcher;
use helpline_prometheus::PrometheusAdapter;
use helpline_storage::SqliteStorage;
use helpline_telegram::{LoggingChannel, TelegramNotifier};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How long shutdown waits for in-flight conversations.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle conversation locks are swept at this interval.
const LOCK_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Runs the `helpline serve` command.
pub async fn run_serve(config: HelplineConfig) -> Result<(), HelplineError> {
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting helpline serve");

    let prometheus = match PrometheusAdapter::new() {
        Ok(adapter) => {
            info!("prometheus metrics enabled");
            Some(adapter)
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    };

    // Storage.
    let sqlite = Arc::new(SqliteStorage::new(config.storage.clone()));
    sqlite.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = sqlite.clone();

    if config.matcher.seed_defaults {
        let seeded = helpline_matcher::seed_if_empty(storage.as_ref()).await?;
        if seeded > 0 {
            info!(count = seeded, "seeded default knowledge base");
        }
    }

    let mut adapters: Vec<Arc<dyn PluginAdapter>> = vec![sqlite.clone() as Arc<dyn PluginAdapter>];

    // Admin push channel.
    let telegram = if config.telegram.bot_token.is_some() {
        let notifier = Arc::new(TelegramNotifier::new(&config.telegram)?);
        info!(chat = notifier.admin_chat().0, "telegram control channel enabled");
        Some(notifier)
    } else {
        warn!("telegram.bot_token not set, admin pushes (login codes included) go to the log");
        None
    };
    let notifier: Arc<dyn ChannelAdapter> = match &telegram {
        Some(notifier) => {
            adapters.push(notifier.clone());
            notifier.clone() as Arc<dyn ChannelAdapter>
        }
        None => {
            let channel = Arc::new(LoggingChannel);
            adapters.push(channel.clone());
            channel as Arc<dyn ChannelAdapter>
        }
    };

    // Escalation tier.
    let provider: Option<Arc<dyn ProviderAdapter>> = match OpenAiCompatProvider::new(&config.ai) {
        Ok(provider) => {
            let provider = Arc::new(provider);
            adapters.push(provider.clone());
            Some(provider as Arc<dyn ProviderAdapter>)
        }
        Err(e) => {
            warn!(error = %e, "AI escalation disabled, unmatched questions get the fallback reply");
            None
        }
    };
    let escalation = EscalationProcessor::new(provider, &config.ai);

    if let Some(prometheus) = &prometheus {
        adapters.push(Arc::new(prometheus.clone()));
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let send_timeout = Duration::from_secs(config.telegram.send_timeout_secs);
    let auth = Arc::new(AdminSessionAuthority::new(
        storage.clone(),
        notifier.clone(),
        clock.clone(),
        config.admin.clone(),
        send_timeout,
    ));

    let agent = Arc::new(SupportAgent::new(
        storage.clone(),
        auth.clone(),
        KnowledgeMatcher::from_config(&config.matcher),
        escalation,
        notifier,
        clock,
        NotifySettings::from(&config.telegram),
    ));

    let cancel = shutdown::install_signal_handler();

    let mut background = vec![
        helpline_auth::spawn_housekeeping(
            auth,
            Duration::from_secs(config.admin.housekeeping_interval_secs),
            cancel.clone(),
        ),
        spawn_lock_pruning(agent.clone(), LOCK_PRUNE_INTERVAL, cancel.clone()),
    ];
    if let Some(telegram) = &telegram {
        background.push(helpline_telegram::spawn_listener(
            telegram.bot().clone(),
            telegram.admin_chat(),
            agent.clone(),
            cancel.clone(),
        ));
    }

    let health = HealthState {
        prometheus_render: prometheus.map(|p| {
            let render: Arc<dyn Fn() -> String + Send + Sync> = Arc::new(move || p.render());
            render
        }),
        adapters,
        ..HealthState::new()
    };
    let state = GatewayState {
        agent: agent.clone(),
        health,
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let served = helpline_gateway::start_server(&server_config, state, cancel.clone()).await;
    if let Err(e) = &served {
        error!(error = %e, "gateway stopped with an error");
    }

    // Whatever stopped the server, stop the background tasks too.
    cancel.cancel();
    if !shutdown::drain_conversations(agent.locks(), DRAIN_TIMEOUT).await {
        warn!("some conversations were still busy at shutdown");
    }
    join_all(background).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "storage close failed");
    }
    info!("helpline stopped");
    served
}

/// Periodically drop per-conversation locks nobody holds.
fn spawn_lock_pruning(
    agent: Arc<SupportAgent>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let pruned = agent.locks().prune_idle();
                    if pruned > 0 {
                        debug!(pruned, remaining = agent.locks().len(), "pruned idle conversation locks");
                    }
                }
                _ = cancel.cancelled() => break,
            }
        }
    })
}

async fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "background task ended abnormally");
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helpline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
