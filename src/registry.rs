//! Registry of channels created and owned by this service
//!
//! A channel id is a member exactly while the channel was created by the
//! provisioner or the team randomizer and has not yet been reclaimed. The
//! registry is memory-only and starts empty on every process start; channels
//! left behind by a restart are orphaned and no longer tracked.

use crate::types::ChannelId;
use std::collections::HashSet;
use std::sync::Mutex;

/// Process-wide set of system-owned channel ids pending reclamation
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: Mutex<HashSet<ChannelId>>,
}

impl ChannelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel id; returns false if it was already tracked
    pub fn register(&self, id: ChannelId) -> bool {
        self.lock().insert(id)
    }

    /// Remove a channel id; a no-op returning false when absent
    pub fn unregister(&self, id: ChannelId) -> bool {
        self.lock().remove(&id)
    }

    /// Whether the channel is currently system-owned
    pub fn contains(&self, id: ChannelId) -> bool {
        self.lock().contains(&id)
    }

    /// Copy of the current contents, safe to iterate while handlers
    /// interleave registrations and removals
    pub fn snapshot(&self) -> Vec<ChannelId> {
        self.lock().iter().copied().collect()
    }

    /// Number of tracked channels
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no channels are tracked
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<ChannelId>> {
        // Held only for non-async set operations; cannot deadlock or poison
        // across an await point.
        self.channels
            .lock()
            .expect("channel registry mutex poisoned")
    }
}
