//! Team randomizer behind the `!custom` command
//!
//! Stateless one-shot flow: validates the issuer's role, voice presence and
//! an exact ten-member occupancy, shuffles the members uniformly, creates a
//! channel per five-member team in the source channel's category, and
//! relocates everyone. Preconditions are checked in order and each produces
//! its own user-visible rejection before any channel is created.

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::platform::VoicePlatform;
use crate::registry::ChannelRegistry;
use crate::types::{CommandIssuer, RandomizeOutcome, RandomizeRejection};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

/// Members per team
pub const TEAM_SIZE: usize = 5;

/// Exact occupancy required in the issuer's voice channel
pub const REQUIRED_PLAYERS: usize = 10;

/// Uniform Fisher–Yates shuffle: for each index from the last down to 1,
/// swap with a uniformly chosen index in `[0, i]`.
pub fn shuffle_members<T, R: Rng + ?Sized>(members: &mut [T], rng: &mut R) {
    for i in (1..members.len()).rev() {
        let j = rng.gen_range(0..=i);
        members.swap(i, j);
    }
}

/// Splits exactly ten voice-channel members into two random teams
pub struct TeamRandomizer {
    registry: Arc<ChannelRegistry>,
    metrics: Arc<MetricsCollector>,
}

impl TeamRandomizer {
    pub fn new(registry: Arc<ChannelRegistry>, metrics: Arc<MetricsCollector>) -> Self {
        Self { registry, metrics }
    }

    /// Run the randomize command for a resolved issuer.
    ///
    /// Returns `Ok(Rejected(..))` for precondition failures (no channels
    /// created) and `Err` when a platform call fails mid-flight; channels
    /// already created at that point remain registered and are reclaimed
    /// once empty.
    pub async fn randomize(
        &self,
        platform: &dyn VoicePlatform,
        issuer: &CommandIssuer,
    ) -> Result<RandomizeOutcome> {
        self.metrics.record_randomize_command();

        if !issuer.holds_required_role {
            return Ok(self.reject(issuer, RandomizeRejection::MissingRole));
        }

        let Some(source) = issuer.voice_channel else {
            return Ok(self.reject(issuer, RandomizeRejection::NotInVoice));
        };

        let mut members = platform.voice_channel_members(source).await?;
        if members.len() != REQUIRED_PLAYERS {
            return Ok(self.reject(
                issuer,
                RandomizeRejection::WrongMemberCount {
                    found: members.len(),
                },
            ));
        }

        shuffle_members(&mut members, &mut rand::thread_rng());

        let category = platform.channel_category(source).await?;

        // Register each channel as soon as it exists so a later failure
        // still leaves it eligible for reclamation.
        let team_one_channel = platform.create_voice_channel("Team 1", category).await?;
        self.registry.register(team_one_channel);
        let team_two_channel = platform.create_voice_channel("Team 2", category).await?;
        self.registry.register(team_two_channel);
        self.metrics.set_tracked_rooms(self.registry.len());

        for member in &members[..TEAM_SIZE] {
            platform.move_member(*member, team_one_channel).await?;
        }
        for member in &members[TEAM_SIZE..] {
            platform.move_member(*member, team_two_channel).await?;
        }

        self.metrics.record_teams_created();
        info!(
            issuer = %issuer.user,
            source = %source,
            team_one = %team_one_channel,
            team_two = %team_two_channel,
            "Randomized ten players into two teams"
        );

        Ok(RandomizeOutcome::TeamsCreated {
            team_one_channel,
            team_two_channel,
        })
    }

    fn reject(&self, issuer: &CommandIssuer, rejection: RandomizeRejection) -> RandomizeOutcome {
        self.metrics.record_randomize_rejection(rejection.as_label());
        warn!(issuer = %issuer.user, rejection = ?rejection, "Randomize command rejected");
        RandomizeOutcome::Rejected(rejection)
    }
}
