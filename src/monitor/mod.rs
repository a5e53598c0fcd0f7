//! Per-validator polling loop
//!
//! Each validator runs as one sequential task: fetch a snapshot, evaluate it
//! against the previous alert state, deliver the notification to every
//! channel, then persist. A validator's cycles never overlap, so its state
//! needs no lock; different validators run in parallel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time;

use crate::alerts::{AlertStateStore, DecisionEngine, ValidatorAlertNotification};
use crate::config::{ConfigError, HalfLifeConfig, ValidatorMonitor};
use crate::data::ValidatorStats;
use crate::notify::NotificationChannel;
use crate::persistence::{PersistenceCoordinator, PersistenceError};

/// Produces the per-poll snapshot for a validator (RPC/gRPC queries live
/// behind this trait)
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch(&self, validator: &ValidatorMonitor) -> ValidatorStats;
}

/// Outcome of one poll of one validator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub validator: String,
    pub notification: ValidatorAlertNotification,
    /// Channel calls that failed this cycle
    pub delivery_failures: usize,
    /// Whether every write of this cycle succeeded
    pub persisted: bool,
}

pub struct Monitor {
    config: Arc<RwLock<HalfLifeConfig>>,
    store: Arc<AlertStateStore>,
    engine: DecisionEngine,
    channels: Vec<Arc<dyn NotificationChannel>>,
    persistence: Arc<PersistenceCoordinator>,
    source: Arc<dyn StatsSource>,
}

impl Monitor {
    pub fn new(
        config: HalfLifeConfig,
        channels: Vec<Arc<dyn NotificationChannel>>,
        persistence: Arc<PersistenceCoordinator>,
        source: Arc<dyn StatsSource>,
    ) -> Self {
        let engine = DecisionEngine::new(config.thresholds.clone());
        Self {
            config: Arc::new(RwLock::new(config)),
            store: Arc::new(AlertStateStore::new()),
            engine,
            channels,
            persistence,
            source,
        }
    }

    /// Build the channels named in the configuration's notification settings
    pub fn from_config(
        config: HalfLifeConfig,
        persistence: Arc<PersistenceCoordinator>,
        source: Arc<dyn StatsSource>,
    ) -> Result<Self, ConfigError> {
        let channels = match &config.notifications {
            Some(notifications) => notifications.build_channels(&config.thresholds)?,
            None => {
                tracing::warn!("No notification service configured, alerts will only be logged");
                Vec::new()
            }
        };
        Ok(Self::new(config, channels, persistence, source))
    }

    /// Load persisted alert states into the store; returns how many
    pub fn restore_state(&self) -> Result<usize, PersistenceError> {
        let states = self.persistence.load_alert_states()?;
        let count = states.len();
        self.store.restore(states);
        tracing::info!(validators = count, "Restored alert state");
        Ok(count)
    }

    /// Current configuration, including fields written back by channels
    pub fn config(&self) -> HalfLifeConfig {
        self.config.read().clone()
    }

    pub fn store(&self) -> &AlertStateStore {
        &self.store
    }

    pub fn validator_names(&self) -> Vec<String> {
        self.config
            .read()
            .validators
            .iter()
            .map(|v| v.name.clone())
            .collect()
    }

    /// Poll, evaluate, notify and persist one validator.
    ///
    /// Returns `None` when the validator is no longer configured.
    pub async fn run_cycle(&self, name: &str) -> Option<CycleReport> {
        let validator = self.config.read().validator(name).cloned()?;
        let stats = self.source.fetch(&validator).await;

        let mut previous = self.store.get(name);
        let dropped = previous.retain_sentries(validator.sentries().iter().map(|s| s.name.as_str()));
        if dropped > 0 {
            tracing::info!(validator = %name, sentries = dropped, "Dropped alert state of removed sentries");
        }
        let (state, notification) = self.engine.evaluate(&previous, &stats);
        self.store.replace(name, state);

        if !notification.is_empty() {
            tracing::info!(
                validator = %name,
                level = %notification.alert_level,
                alerts = ?notification.alerts,
                cleared = ?notification.cleared_alerts,
                "Alert state changed"
            );
        }

        let mut delivery_failures = 0;
        let mut status_message_id = None;

        for channel in &self.channels {
            if !notification.is_empty() {
                if let Err(e) = channel.send_alert(&validator, &stats, &notification).await {
                    delivery_failures += 1;
                    tracing::error!(
                        validator = %name,
                        channel = channel.name(),
                        error = %e,
                        "Failed to send alert notification"
                    );
                }
            }

            match channel.update_status(&validator, &stats).await {
                Ok(Some(id)) => status_message_id = Some(id),
                Ok(None) => {}
                Err(e) => {
                    delivery_failures += 1;
                    tracing::warn!(
                        validator = %name,
                        channel = channel.name(),
                        error = %e,
                        "Failed to update status message"
                    );
                }
            }
        }

        let mut persisted = true;

        if let Some(id) = status_message_id {
            let changed = match self.config.write().validator_mut(name) {
                Some(vm) => {
                    vm.discord_status_message_id = Some(id);
                    true
                }
                None => false,
            };
            if changed {
                persisted &= self.save_config();
            }
        }

        if let Err(e) = self.persistence.save_alert_states(&self.store) {
            persisted = false;
            tracing::error!(validator = %name, error = %e, "Failed to save alert state");
        }

        Some(CycleReport {
            validator: name.to_string(),
            notification,
            delivery_failures,
            persisted,
        })
    }

    /// Write the configuration; the read guard is held through the write so
    /// a concurrent update cannot be overtaken by an older copy
    fn save_config(&self) -> bool {
        let config = self.config.read();
        match self.persistence.save_config(&config) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save config");
                false
            }
        }
    }

    /// Start one polling task per configured validator
    pub fn spawn(self: Arc<Self>, every: Duration) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let tasks = self
            .validator_names()
            .into_iter()
            .map(|name| {
                let monitor = Arc::clone(&self);
                let mut shutdown_rx = shutdown_rx.clone();

                tokio::spawn(async move {
                    tracing::info!(validator = %name, "Validator monitor started with interval {:?}", every);
                    let mut ticker = time::interval(every);

                    loop {
                        tokio::select! {
                            _ = ticker.tick() => {
                                if monitor.run_cycle(&name).await.is_none() {
                                    tracing::warn!(validator = %name, "Validator removed from config");
                                    break;
                                }
                            }
                            _ = shutdown_rx.changed() => break,
                        }
                    }

                    tracing::info!(validator = %name, "Validator monitor stopped");
                })
            })
            .collect();

        MonitorHandle {
            shutdown_tx,
            tasks,
        }
    }
}

/// Running validator tasks
pub struct MonitorHandle {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every task between cycles and wait for them
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Validator monitor task failed");
            }
        }
    }
}
