//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the channel
//! registry, metrics, health server and the serenity gateway client together
//! and runs them until shutdown.

use crate::config::AppConfig;
use crate::metrics::{HealthServer, HealthServerConfig, MetricsCollector};
use crate::platform::GatewayHandler;
use crate::registry::ChannelRegistry;
use crate::rooms::{RoomProvisioner, RoomReclaimer, TeamRandomizer};
use crate::types::{ChannelId, RoleId};
use anyhow::{Context as _, Result};
use serenity::all::GatewayIntents;
use serenity::Client;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Production application state
pub struct AppState {
    config: AppConfig,
    registry: Arc<ChannelRegistry>,
    metrics: Arc<MetricsCollector>,
    health_server: Arc<HealthServer>,
}

impl AppState {
    /// Initialize all service components from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(ChannelRegistry::new());
        let metrics = Arc::new(MetricsCollector::new()?);

        let health_server = Arc::new(HealthServer::new(
            HealthServerConfig {
                port: config.service.health_port,
                ..HealthServerConfig::default()
            },
            metrics.clone(),
            registry.clone(),
        ));

        Ok(Self {
            config,
            registry,
            metrics,
            health_server,
        })
    }

    /// The channel registry shared across all flows
    pub fn registry(&self) -> Arc<ChannelRegistry> {
        self.registry.clone()
    }

    /// The metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Build the gateway event handler wired to this state
    fn gateway_handler(&self) -> GatewayHandler {
        let lobby = ChannelId(self.config.platform.lobby_channel_id);
        let required_role = RoleId(self.config.platform.required_role_id);

        let provisioner = RoomProvisioner::new(self.registry.clone(), self.metrics.clone(), lobby);
        let reclaimer = Arc::new(RoomReclaimer::new(
            self.registry.clone(),
            self.metrics.clone(),
        ));
        let randomizer = TeamRandomizer::new(self.registry.clone(), self.metrics.clone());

        GatewayHandler::new(
            provisioner,
            reclaimer,
            randomizer,
            required_role,
            self.config.platform.command_prefix.clone(),
            self.config.sweep_interval(),
        )
    }

    /// Run the service until the shutdown future resolves
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        // Health endpoints run alongside the gateway client
        let health_server = self.health_server.clone();
        let health_task = tokio::spawn(async move {
            if let Err(err) = health_server.start().await {
                error!(error = %err, "Health server failed");
            }
        });

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(&self.config.platform.token, intents)
            .event_handler(self.gateway_handler())
            .await
            .context("Failed to build gateway client")?;

        let shard_manager = client.shard_manager.clone();

        info!("Connecting to gateway");
        tokio::select! {
            result = client.start() => {
                result.context("Gateway client stopped with error")?;
                warn!("Gateway client stopped on its own");
            }
            _ = shutdown => {
                info!("Shutdown requested, disconnecting gateway");
                shard_manager.shutdown_all().await;
            }
        }

        self.health_server.stop();
        if let Err(err) = health_task.await {
            warn!(error = %err, "Health server task join failed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlatformSettings, ReclamationSettings, ServiceSettings};

    fn test_config() -> AppConfig {
        AppConfig {
            service: ServiceSettings::default(),
            platform: PlatformSettings {
                token: "test-token".to_string(),
                required_role_id: 1,
                lobby_channel_id: 2,
                command_prefix: "!".to_string(),
            },
            reclamation: ReclamationSettings::default(),
        }
    }

    #[test]
    fn test_app_state_initializes_empty_registry() {
        let state = AppState::new(test_config()).unwrap();
        assert!(state.registry().is_empty());
    }
}
