//! Provisioning flow for personal voice rooms
//!
//! Reacts to a member entering the configured lobby channel: creates a voice
//! channel named after the member in the lobby's category, registers it, and
//! relocates the member into it. Creation, registration and relocation are
//! not atomic; a channel whose relocation failed stays registered and is
//! reclaimed by the sweep once it is confirmed empty.

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::platform::VoicePlatform;
use crate::registry::ChannelRegistry;
use crate::types::{ChannelId, VoiceTransition};
use crate::utils::team_channel_name;
use std::sync::Arc;
use tracing::{info, warn};

/// Creates personal rooms for members joining the lobby channel
pub struct RoomProvisioner {
    registry: Arc<ChannelRegistry>,
    metrics: Arc<MetricsCollector>,
    lobby_channel: ChannelId,
}

impl RoomProvisioner {
    /// Create a provisioner watching the given lobby channel
    pub fn new(
        registry: Arc<ChannelRegistry>,
        metrics: Arc<MetricsCollector>,
        lobby_channel: ChannelId,
    ) -> Self {
        Self {
            registry,
            metrics,
            lobby_channel,
        }
    }

    /// The lobby channel this provisioner watches
    pub fn lobby_channel(&self) -> ChannelId {
        self.lobby_channel
    }

    /// Handle a voice-state transition; provisions a room when the member
    /// entered the lobby channel. Returns the created channel id, if any.
    pub async fn handle_transition(
        &self,
        platform: &dyn VoicePlatform,
        transition: &VoiceTransition,
    ) -> Result<Option<ChannelId>> {
        if transition.new_channel != Some(self.lobby_channel) {
            return Ok(None);
        }

        info!(
            user = %transition.user,
            name = %transition.display_name,
            "Member entered lobby, provisioning personal room"
        );

        let category = platform.channel_category(self.lobby_channel).await?;
        let name = team_channel_name(&transition.display_name);
        let channel = platform.create_voice_channel(&name, category).await?;

        self.registry.register(channel);
        self.metrics.record_room_provisioned();
        self.metrics.set_tracked_rooms(self.registry.len());

        if let Err(err) = platform.move_member(transition.user, channel).await {
            // The channel stays registered; the sweep reclaims it once it is
            // confirmed empty.
            warn!(
                user = %transition.user,
                channel = %channel,
                error = %err,
                "Provisioned room but failed to relocate member"
            );
        } else {
            info!(
                user = %transition.user,
                channel = %channel,
                name = %name,
                "Created room and relocated member"
            );
        }

        Ok(Some(channel))
    }
}
