//! Reclamation flows for system-owned voice rooms
//!
//! Two triggers delete an empty system-owned channel and drop it from the
//! registry: the reactive path fires when a member leaves voice entirely, and
//! the periodic sweep walks a snapshot of the whole registry. Both paths may
//! observe the same channel; deletion of an already-deleted channel succeeds
//! at the platform boundary and unregistering an absent id is a no-op, so the
//! race is harmless.

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::platform::VoicePlatform;
use crate::registry::ChannelRegistry;
use crate::types::VoiceTransition;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Summary of one sweep cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Registry entries examined
    pub examined: usize,
    /// Empty channels deleted and unregistered
    pub reclaimed: usize,
    /// Channels skipped because members are present
    pub occupied: usize,
    /// Entries dropped because the channel no longer resolves
    pub vanished: usize,
    /// Entries left in place after a fetch or delete failure
    pub failed: usize,
}

/// Deletes empty system-owned rooms and removes them from the registry
pub struct RoomReclaimer {
    registry: Arc<ChannelRegistry>,
    metrics: Arc<MetricsCollector>,
}

impl RoomReclaimer {
    pub fn new(registry: Arc<ChannelRegistry>, metrics: Arc<MetricsCollector>) -> Self {
        Self { registry, metrics }
    }

    /// Reactive path: a member left voice entirely. Deletes their previous
    /// channel if it is system-owned and now empty.
    pub async fn handle_departure(
        &self,
        platform: &dyn VoicePlatform,
        transition: &VoiceTransition,
    ) -> Result<()> {
        let Some(previous) = transition.old_channel else {
            return Ok(());
        };
        if transition.new_channel.is_some() {
            // Channel hop, not a departure from voice
            return Ok(());
        }
        if !self.registry.contains(previous) {
            return Ok(());
        }

        let Some(snapshot) = platform.fetch_voice_channel(previous).await? else {
            // Already gone; the next sweep drops the registry entry
            debug!(channel = %previous, "Departed channel no longer resolves");
            return Ok(());
        };

        if snapshot.member_count > 0 {
            // Raced with another joiner
            debug!(
                channel = %previous,
                members = snapshot.member_count,
                "Departed channel still occupied, leaving it alone"
            );
            return Ok(());
        }

        match platform.delete_channel(previous).await {
            Ok(()) => {
                self.registry.unregister(previous);
                self.metrics.record_room_reclaimed("reactive");
                self.metrics.set_tracked_rooms(self.registry.len());
                info!(channel = %previous, name = %snapshot.name, "Reclaimed empty room");
            }
            Err(err) => {
                // Entry stays registered so the sweep retries the deletion
                warn!(
                    channel = %previous,
                    error = %err,
                    "Failed to delete empty room, sweep will retry"
                );
            }
        }

        Ok(())
    }

    /// Sweep path: walk a snapshot of the registry, deleting every channel
    /// that is empty and dropping entries whose channel no longer resolves.
    pub async fn sweep(&self, platform: &dyn VoicePlatform) -> Result<SweepReport> {
        let tracked = self.registry.snapshot();
        let mut report = SweepReport::default();

        debug!(tracked = tracked.len(), "Sweeping registry for empty rooms");

        for channel in tracked {
            report.examined += 1;

            match platform.fetch_voice_channel(channel).await {
                Ok(Some(snapshot)) if snapshot.member_count == 0 => {
                    match platform.delete_channel(channel).await {
                        Ok(()) => {
                            self.registry.unregister(channel);
                            self.metrics.record_room_reclaimed("sweep");
                            report.reclaimed += 1;
                            info!(channel = %channel, name = %snapshot.name, "Sweep reclaimed empty room");
                        }
                        Err(err) => {
                            self.metrics.record_sweep_failure();
                            report.failed += 1;
                            warn!(channel = %channel, error = %err, "Sweep failed to delete room");
                        }
                    }
                }
                Ok(Some(snapshot)) => {
                    report.occupied += 1;
                    debug!(
                        channel = %channel,
                        members = snapshot.member_count,
                        "Sweep skipped occupied room"
                    );
                }
                Ok(None) => {
                    // Deleted out from under us; drop the entry so it cannot
                    // leak in the registry forever
                    self.registry.unregister(channel);
                    report.vanished += 1;
                    debug!(channel = %channel, "Sweep dropped entry for vanished channel");
                }
                Err(err) => {
                    self.metrics.record_sweep_failure();
                    report.failed += 1;
                    warn!(channel = %channel, error = %err, "Sweep failed to fetch channel");
                }
            }
        }

        self.metrics.record_sweep_cycle();
        self.metrics.set_tracked_rooms(self.registry.len());
        Ok(report)
    }
}
