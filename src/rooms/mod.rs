//! Voice room lifecycle flows
//!
//! This module contains the provisioning flow that reacts to lobby joins, the
//! two reclamation paths (reactive and periodic sweep), and the stateless
//! team randomizer behind the `!custom` command.

pub mod provisioner;
pub mod randomizer;
pub mod reclaimer;

// Re-export commonly used types
pub use provisioner::RoomProvisioner;
pub use randomizer::{shuffle_members, TeamRandomizer, REQUIRED_PLAYERS, TEAM_SIZE};
pub use reclaimer::{RoomReclaimer, SweepReport};
