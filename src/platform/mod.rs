//! Platform boundary for the voice room service
//!
//! This module defines the typed capability set consumed from the chat/voice
//! platform, the serenity-backed production implementation, and the gateway
//! event handler that dispatches platform events into the room flows.

pub mod discord;
pub mod gateway;
pub mod provider;

// Re-export commonly used types
pub use discord::DiscordPlatform;
pub use gateway::GatewayHandler;
pub use provider::{InMemoryPlatform, VoicePlatform};
