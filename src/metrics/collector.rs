//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the voice room service using
//! Prometheus metrics: room lifecycle counters, sweep activity, and team
//! randomize command outcomes.

use anyhow::Result;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Main metrics collector for the voice room service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Room lifecycle metrics
    room_metrics: RoomMetrics,

    /// Team randomize command metrics
    command_metrics: CommandMetrics,
}

/// Room lifecycle metrics
#[derive(Clone)]
pub struct RoomMetrics {
    /// Total personal rooms provisioned from lobby joins
    pub rooms_provisioned_total: IntCounter,

    /// Total rooms reclaimed, labeled by path (reactive or sweep)
    pub rooms_reclaimed_total: IntCounterVec,

    /// Channels currently tracked by the registry
    pub tracked_rooms: IntGauge,

    /// Completed sweep cycles
    pub sweep_cycles_total: IntCounter,

    /// Channels that could not be fetched or deleted during a sweep
    pub sweep_failures_total: IntCounter,
}

/// Team randomize command metrics
#[derive(Clone)]
pub struct CommandMetrics {
    /// Total randomize commands received
    pub randomize_commands_total: IntCounter,

    /// Rejected randomize commands, labeled by reason
    pub randomize_rejections_total: IntCounterVec,

    /// Team channel pairs successfully created
    pub teams_created_total: IntCounter,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let room_metrics = RoomMetrics {
            rooms_provisioned_total: IntCounter::with_opts(Opts::new(
                "rooms_provisioned_total",
                "Total personal voice rooms provisioned from lobby joins",
            ))?,
            rooms_reclaimed_total: IntCounterVec::new(
                Opts::new(
                    "rooms_reclaimed_total",
                    "Total voice rooms deleted and unregistered, by reclamation path",
                ),
                &["path"],
            )?,
            tracked_rooms: IntGauge::with_opts(Opts::new(
                "tracked_rooms",
                "Voice rooms currently tracked in the channel registry",
            ))?,
            sweep_cycles_total: IntCounter::with_opts(Opts::new(
                "sweep_cycles_total",
                "Completed periodic reclamation sweeps",
            ))?,
            sweep_failures_total: IntCounter::with_opts(Opts::new(
                "sweep_failures_total",
                "Fetch or delete failures encountered during sweeps",
            ))?,
        };

        let command_metrics = CommandMetrics {
            randomize_commands_total: IntCounter::with_opts(Opts::new(
                "randomize_commands_total",
                "Total team randomize commands received",
            ))?,
            randomize_rejections_total: IntCounterVec::new(
                Opts::new(
                    "randomize_rejections_total",
                    "Randomize commands rejected before any channel creation, by reason",
                ),
                &["reason"],
            )?,
            teams_created_total: IntCounter::with_opts(Opts::new(
                "teams_created_total",
                "Team channel pairs created by the randomizer",
            ))?,
        };

        registry.register(Box::new(room_metrics.rooms_provisioned_total.clone()))?;
        registry.register(Box::new(room_metrics.rooms_reclaimed_total.clone()))?;
        registry.register(Box::new(room_metrics.tracked_rooms.clone()))?;
        registry.register(Box::new(room_metrics.sweep_cycles_total.clone()))?;
        registry.register(Box::new(room_metrics.sweep_failures_total.clone()))?;
        registry.register(Box::new(command_metrics.randomize_commands_total.clone()))?;
        registry.register(Box::new(
            command_metrics.randomize_rejections_total.clone(),
        ))?;
        registry.register(Box::new(command_metrics.teams_created_total.clone()))?;

        Ok(Self {
            registry,
            room_metrics,
            command_metrics,
        })
    }

    /// Record a provisioned personal room
    pub fn record_room_provisioned(&self) {
        self.room_metrics.rooms_provisioned_total.inc();
    }

    /// Record a reclaimed room; `path` is "reactive" or "sweep"
    pub fn record_room_reclaimed(&self, path: &str) {
        self.room_metrics
            .rooms_reclaimed_total
            .with_label_values(&[path])
            .inc();
    }

    /// Update the tracked-rooms gauge from the registry size
    pub fn set_tracked_rooms(&self, count: usize) {
        self.room_metrics.tracked_rooms.set(count as i64);
    }

    /// Record a completed sweep cycle
    pub fn record_sweep_cycle(&self) {
        self.room_metrics.sweep_cycles_total.inc();
    }

    /// Record a fetch/delete failure inside a sweep
    pub fn record_sweep_failure(&self) {
        self.room_metrics.sweep_failures_total.inc();
    }

    /// Record a received randomize command
    pub fn record_randomize_command(&self) {
        self.command_metrics.randomize_commands_total.inc();
    }

    /// Record a rejected randomize command
    pub fn record_randomize_rejection(&self, reason: &str) {
        self.command_metrics
            .randomize_rejections_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Record a successful team split
    pub fn record_teams_created(&self) {
        self.command_metrics.teams_created_total.inc();
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Access the underlying registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_creation_and_export() {
        let collector = MetricsCollector::new().unwrap();

        collector.record_room_provisioned();
        collector.record_room_reclaimed("reactive");
        collector.record_room_reclaimed("sweep");
        collector.record_sweep_cycle();
        collector.set_tracked_rooms(3);
        collector.record_randomize_command();
        collector.record_randomize_rejection("missing_role");
        collector.record_teams_created();

        let exported = collector.export().unwrap();
        assert!(exported.contains("rooms_provisioned_total"));
        assert!(exported.contains("rooms_reclaimed_total"));
        assert!(exported.contains("tracked_rooms 3"));
        assert!(exported.contains("randomize_rejections_total"));
    }

    #[test]
    fn test_independent_collectors_do_not_conflict() {
        // Each collector owns its registry, so parallel tests can create many
        let first = MetricsCollector::new().unwrap();
        let second = MetricsCollector::new().unwrap();

        first.record_room_provisioned();
        assert!(second.export().unwrap().contains("rooms_provisioned_total 0"));
    }
}
