//! Metrics and monitoring for the voice room service
//!
//! This module provides Prometheus metrics collection and the HTTP health
//! endpoints for the service.

pub mod collector;
pub mod health;

pub use collector::{CommandMetrics, MetricsCollector, RoomMetrics};
pub use health::{HealthServer, HealthServerConfig};
