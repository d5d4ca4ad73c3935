//! Voice platform capability trait and in-memory implementation
//!
//! This module defines the typed interface to the platform's channel and
//! member operations, validated once at the boundary so the room flows never
//! re-inspect loosely-typed platform objects.

use crate::error::{Result, RoomServiceError};
use crate::types::{CategoryId, ChannelId, UserId, VoiceChannelSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::RwLock;

/// Capability set consumed from the voice platform
///
/// Implementations must treat deletion of an already-deleted channel as
/// success so that duplicate reclamation attempts stay harmless.
#[async_trait]
pub trait VoicePlatform: Send + Sync {
    /// Create a voice channel, optionally inside a category, and return its id
    async fn create_voice_channel(
        &self,
        name: &str,
        category: Option<CategoryId>,
    ) -> Result<ChannelId>;

    /// Resolve the category a channel lives in, if any
    async fn channel_category(&self, channel: ChannelId) -> Result<Option<CategoryId>>;

    /// Fetch a live voice channel; `None` when it no longer resolves
    async fn fetch_voice_channel(&self, channel: ChannelId)
        -> Result<Option<VoiceChannelSnapshot>>;

    /// Delete a channel; succeeds if the channel is already gone
    async fn delete_channel(&self, channel: ChannelId) -> Result<()>;

    /// Relocate a member into a voice channel
    async fn move_member(&self, user: UserId, channel: ChannelId) -> Result<()>;

    /// Members currently connected to a voice channel
    async fn voice_channel_members(&self, channel: ChannelId) -> Result<Vec<UserId>>;
}

/// Stub channel state held by [`InMemoryPlatform`]
#[derive(Debug, Clone)]
struct StubChannel {
    name: String,
    category: Option<CategoryId>,
    members: Vec<UserId>,
}

/// In-memory platform for tests and development
///
/// Tracks channels and voice occupancy in process memory, records member
/// relocations, and can inject failures into creation, deletion and moves.
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    channels: RwLock<HashMap<ChannelId, StubChannel>>,
    move_log: RwLock<Vec<(UserId, ChannelId)>>,
    next_id: AtomicU64,
    /// Remaining successful creations before failing; negative means unlimited
    creation_budget: AtomicI64,
    fail_deletions: AtomicBool,
    fail_moves: AtomicBool,
}

impl InMemoryPlatform {
    /// Create an empty platform with no failure injection
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            move_log: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1000),
            creation_budget: AtomicI64::new(-1),
            fail_deletions: AtomicBool::new(false),
            fail_moves: AtomicBool::new(false),
        }
    }

    /// Seed a pre-existing channel (e.g. the lobby) and return its id
    pub fn add_channel(&self, name: &str, category: Option<CategoryId>) -> ChannelId {
        let id = ChannelId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.write_channels().insert(
            id,
            StubChannel {
                name: name.to_string(),
                category,
                members: Vec::new(),
            },
        );
        id
    }

    /// Place a member into a channel without going through `move_member`
    pub fn place_member(&self, user: UserId, channel: ChannelId) {
        let mut channels = self.write_channels();
        for stub in channels.values_mut() {
            stub.members.retain(|m| *m != user);
        }
        if let Some(stub) = channels.get_mut(&channel) {
            stub.members.push(user);
        }
    }

    /// Disconnect a member from voice entirely
    pub fn disconnect_member(&self, user: UserId) {
        for stub in self.write_channels().values_mut() {
            stub.members.retain(|m| *m != user);
        }
    }

    /// Remove a channel out-of-band, simulating external deletion
    pub fn drop_channel(&self, channel: ChannelId) {
        self.write_channels().remove(&channel);
    }

    /// Whether the channel currently exists
    pub fn channel_exists(&self, channel: ChannelId) -> bool {
        self.read_channels().contains_key(&channel)
    }

    /// Name of a channel, if it exists
    pub fn channel_name(&self, channel: ChannelId) -> Option<String> {
        self.read_channels().get(&channel).map(|c| c.name.clone())
    }

    /// Number of channels currently live on the platform
    pub fn channel_count(&self) -> usize {
        self.read_channels().len()
    }

    /// All recorded `move_member` calls in order
    pub fn recorded_moves(&self) -> Vec<(UserId, ChannelId)> {
        self.move_log
            .read()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    /// Allow exactly `budget` more channel creations before failing
    pub fn set_creation_budget(&self, budget: i64) {
        self.creation_budget.store(budget, Ordering::SeqCst);
    }

    /// Make every subsequent deletion fail
    pub fn set_fail_deletions(&self, fail: bool) {
        self.fail_deletions.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent member move fail
    pub fn set_fail_moves(&self, fail: bool) {
        self.fail_moves.store(fail, Ordering::SeqCst);
    }

    fn read_channels(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ChannelId, StubChannel>> {
        self.channels.read().expect("platform channel map poisoned")
    }

    fn write_channels(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ChannelId, StubChannel>> {
        self.channels
            .write()
            .expect("platform channel map poisoned")
    }
}

#[async_trait]
impl VoicePlatform for InMemoryPlatform {
    async fn create_voice_channel(
        &self,
        name: &str,
        category: Option<CategoryId>,
    ) -> Result<ChannelId> {
        let budget = self.creation_budget.load(Ordering::SeqCst);
        if budget >= 0 {
            if budget == 0 {
                return Err(RoomServiceError::platform(
                    "create_voice_channel",
                    "injected creation failure",
                )
                .into());
            }
            self.creation_budget.fetch_sub(1, Ordering::SeqCst);
        }

        Ok(self.add_channel(name, category))
    }

    async fn channel_category(&self, channel: ChannelId) -> Result<Option<CategoryId>> {
        match self.read_channels().get(&channel) {
            Some(stub) => Ok(stub.category),
            None => Err(RoomServiceError::ChannelNotFound {
                channel_id: channel.to_string(),
            }
            .into()),
        }
    }

    async fn fetch_voice_channel(
        &self,
        channel: ChannelId,
    ) -> Result<Option<VoiceChannelSnapshot>> {
        Ok(self.read_channels().get(&channel).map(|stub| {
            VoiceChannelSnapshot {
                id: channel,
                name: stub.name.clone(),
                member_count: stub.members.len(),
            }
        }))
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<()> {
        if self.fail_deletions.load(Ordering::SeqCst) {
            return Err(
                RoomServiceError::platform("delete_channel", "injected deletion failure").into(),
            );
        }

        // Deleting a channel that is already gone is not an error
        self.write_channels().remove(&channel);
        Ok(())
    }

    async fn move_member(&self, user: UserId, channel: ChannelId) -> Result<()> {
        if self.fail_moves.load(Ordering::SeqCst) {
            return Err(RoomServiceError::platform("move_member", "injected move failure").into());
        }

        if !self.channel_exists(channel) {
            return Err(RoomServiceError::ChannelNotFound {
                channel_id: channel.to_string(),
            }
            .into());
        }

        self.place_member(user, channel);
        self.move_log
            .write()
            .expect("platform move log poisoned")
            .push((user, channel));
        Ok(())
    }

    async fn voice_channel_members(&self, channel: ChannelId) -> Result<Vec<UserId>> {
        match self.read_channels().get(&channel) {
            Some(stub) => Ok(stub.members.clone()),
            None => Err(RoomServiceError::ChannelNotFound {
                channel_id: channel.to_string(),
            }
            .into()),
        }
    }
}
