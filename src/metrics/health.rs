//! Health check endpoints and Prometheus metrics server
//!
//! This module provides HTTP endpoints for health checks and Prometheus
//! metrics for the voice room service using Axum.

use crate::metrics::collector::MetricsCollector;
use crate::registry::ChannelRegistry;
use crate::utils::current_timestamp;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Health server configuration
#[derive(Debug, Clone)]
pub struct HealthServerConfig {
    /// Port to bind the health server to
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
}

impl Default for HealthServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Shared state for the health server
#[derive(Clone)]
pub struct HealthServerState {
    pub metrics: Arc<MetricsCollector>,
    pub registry: Arc<ChannelRegistry>,
    pub started_at: DateTime<Utc>,
}

/// Health server that provides HTTP endpoints for monitoring
pub struct HealthServer {
    config: HealthServerConfig,
    state: HealthServerState,
    shutdown_tx: broadcast::Sender<()>,
}

impl HealthServer {
    /// Create a new health server
    pub fn new(
        config: HealthServerConfig,
        metrics: Arc<MetricsCollector>,
        registry: Arc<ChannelRegistry>,
    ) -> Self {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

        Self {
            config,
            state: HealthServerState {
                metrics,
                registry,
                started_at: current_timestamp(),
            },
            shutdown_tx,
        }
    }

    /// Start the health server and serve until shutdown is requested
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid health server address")?;

        let app = self.create_router();
        let listener = TcpListener::bind(addr).await?;

        info!("Health server listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("Health server shutdown signal received");
            })
            .await?;

        info!("Health server stopped");
        Ok(())
    }

    /// Create the Axum router with all health endpoints
    fn create_router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/alive", get(alive_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }

    /// Stop the health server
    pub fn stop(&self) {
        if let Err(err) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to health server: {}", err);
        }
    }
}

/// Root endpoint handler - shows service information
async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "team-rooms",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/alive", "/metrics"],
    }))
}

/// Health endpoint: registry status and uptime
async fn health_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    let uptime = current_timestamp()
        .signed_duration_since(state.started_at)
        .num_seconds();

    Json(json!({
        "status": "healthy",
        "tracked_rooms": state.registry.len(),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_seconds": uptime,
    }))
}

/// Liveness probe endpoint
async fn alive_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Prometheus metrics endpoint
async fn metrics_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    match state.metrics.export() {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => {
            warn!("Failed to export metrics: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "metrics export failed".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_state() -> HealthServerState {
        HealthServerState {
            metrics: Arc::new(MetricsCollector::new().unwrap()),
            registry: Arc::new(ChannelRegistry::new()),
            started_at: current_timestamp(),
        }
    }

    #[tokio::test]
    async fn test_metrics_handler_exports_text() {
        let state = build_state();
        state.metrics.record_room_provisioned();

        let response = metrics_handler(State(state)).await.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("rooms_provisioned_total"));
    }

    #[tokio::test]
    async fn test_health_handler_reports_tracked_rooms() {
        let state = build_state();
        state.registry.register(crate::types::ChannelId(1));

        let response = health_handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["tracked_rooms"], 1);
    }
}
