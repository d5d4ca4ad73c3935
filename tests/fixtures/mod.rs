//! Test fixtures for integration testing
//!
//! Builds a complete room system (registry, metrics, flows) over the
//! in-memory platform, plus helpers for constructing voice transitions.

use std::sync::Arc;
use team_rooms::metrics::MetricsCollector;
use team_rooms::platform::InMemoryPlatform;
use team_rooms::registry::ChannelRegistry;
use team_rooms::rooms::{RoomProvisioner, RoomReclaimer, TeamRandomizer};
use team_rooms::types::{CategoryId, ChannelId, UserId, VoiceTransition};

/// A fully wired room system over the in-memory platform
pub struct TestSystem {
    pub platform: Arc<InMemoryPlatform>,
    pub registry: Arc<ChannelRegistry>,
    pub provisioner: RoomProvisioner,
    pub reclaimer: Arc<RoomReclaimer>,
    pub randomizer: TeamRandomizer,
    pub lobby: ChannelId,
}

/// Create a complete system with a seeded lobby channel in a category
pub fn create_test_system() -> TestSystem {
    let platform = Arc::new(InMemoryPlatform::new());
    let registry = Arc::new(ChannelRegistry::new());
    let metrics = Arc::new(MetricsCollector::new().expect("metrics collector"));

    let lobby = platform.add_channel("Join to Create", Some(CategoryId(77)));

    let provisioner = RoomProvisioner::new(registry.clone(), metrics.clone(), lobby);
    let reclaimer = Arc::new(RoomReclaimer::new(registry.clone(), metrics.clone()));
    let randomizer = TeamRandomizer::new(registry.clone(), metrics);

    TestSystem {
        platform,
        registry,
        provisioner,
        reclaimer,
        randomizer,
        lobby,
    }
}

/// A member joining a voice channel from outside voice
pub fn join(user: u64, name: &str, channel: ChannelId) -> VoiceTransition {
    VoiceTransition {
        user: UserId(user),
        display_name: name.to_string(),
        old_channel: None,
        new_channel: Some(channel),
    }
}

/// A member leaving voice entirely
pub fn leave(user: u64, name: &str, from: ChannelId) -> VoiceTransition {
    VoiceTransition {
        user: UserId(user),
        display_name: name.to_string(),
        old_channel: Some(from),
        new_channel: None,
    }
}

/// Seed a voice channel with `count` members and return them
pub fn fill_channel(platform: &InMemoryPlatform, channel: ChannelId, count: usize) -> Vec<UserId> {
    let members: Vec<UserId> = (1..=count as u64).map(UserId).collect();
    for member in &members {
        platform.place_member(*member, channel);
    }
    members
}
