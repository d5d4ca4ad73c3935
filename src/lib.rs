//! Team Rooms - Voice channel lifecycle service for Discord guilds
//!
//! This crate provisions personal voice channels when members join a lobby
//! channel, reclaims them once empty, and splits ten voice members into two
//! random teams on command.

pub mod config;
pub mod error;
pub mod metrics;
pub mod platform;
pub mod registry;
pub mod rooms;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Result, RoomServiceError};
pub use types::*;

// Re-export key components
pub use platform::{InMemoryPlatform, VoicePlatform};
pub use registry::ChannelRegistry;
pub use rooms::{RoomProvisioner, RoomReclaimer, TeamRandomizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
