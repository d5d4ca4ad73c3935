//! Common types used throughout the voice room service

use serde::{Deserialize, Serialize};

/// Snowflake identifier for a voice or text channel, issued by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Snowflake identifier for a channel category (the platform's channel grouping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u64);

/// Snowflake identifier for a guild member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Snowflake identifier for a guild role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u64);

macro_rules! impl_snowflake {
    ($name:ident) => {
        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

impl_snowflake!(ChannelId);
impl_snowflake!(CategoryId);
impl_snowflake!(UserId);
impl_snowflake!(RoleId);

/// A single voice-state change for one member, consumed once and not stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceTransition {
    /// The member whose voice state changed
    pub user: UserId,
    /// Display name of the member, used to title provisioned channels
    pub display_name: String,
    /// Channel the member was in before the change, if any
    pub old_channel: Option<ChannelId>,
    /// Channel the member is in after the change, if any
    pub new_channel: Option<ChannelId>,
}

impl VoiceTransition {
    /// True when the member left voice entirely
    pub fn is_departure(&self) -> bool {
        self.old_channel.is_some() && self.new_channel.is_none()
    }
}

/// Resolved context for the member issuing a text command
#[derive(Debug, Clone)]
pub struct CommandIssuer {
    pub user: UserId,
    /// Whether the issuer holds the configured role for team randomization
    pub holds_required_role: bool,
    /// The voice channel the issuer currently occupies, if any
    pub voice_channel: Option<ChannelId>,
}

/// Point-in-time view of a live voice channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelSnapshot {
    pub id: ChannelId,
    pub name: String,
    /// Number of members currently connected to the channel
    pub member_count: usize,
}

/// Why a randomize command was rejected without creating any channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomizeRejection {
    /// Issuer does not hold the required role
    MissingRole,
    /// Issuer is not connected to a voice channel
    NotInVoice,
    /// The issuer's voice channel does not hold exactly the required count
    WrongMemberCount { found: usize },
}

impl RandomizeRejection {
    /// Metrics label for the rejection reason
    pub fn as_label(&self) -> &'static str {
        match self {
            RandomizeRejection::MissingRole => "missing_role",
            RandomizeRejection::NotInVoice => "not_in_voice",
            RandomizeRejection::WrongMemberCount { .. } => "wrong_member_count",
        }
    }
}

/// Result of a team randomize command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomizeOutcome {
    /// Two team channels were created and both teams relocated
    TeamsCreated {
        team_one_channel: ChannelId,
        team_two_channel: ChannelId,
    },
    /// A precondition failed; no channels were created
    Rejected(RandomizeRejection),
}

impl RandomizeOutcome {
    /// The user-visible reply for this outcome
    pub fn reply_text(&self) -> &'static str {
        match self {
            RandomizeOutcome::TeamsCreated { .. } => "Players have been randomized into two teams!",
            RandomizeOutcome::Rejected(RandomizeRejection::MissingRole) => {
                "You do not have the required role to use this command."
            }
            RandomizeOutcome::Rejected(RandomizeRejection::NotInVoice) => {
                "You need to be in a voice channel to randomize players."
            }
            RandomizeOutcome::Rejected(RandomizeRejection::WrongMemberCount { .. }) => {
                "There must be exactly 10 players in the voice channel."
            }
        }
    }
}

/// Reply sent when channel creation or relocation fails mid-command
pub const GENERIC_FAILURE_REPLY: &str = "An error occurred while creating teams.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_departure_detection() {
        let departure = VoiceTransition {
            user: UserId(1),
            display_name: "alice".to_string(),
            old_channel: Some(ChannelId(10)),
            new_channel: None,
        };
        assert!(departure.is_departure());

        let channel_hop = VoiceTransition {
            new_channel: Some(ChannelId(11)),
            ..departure.clone()
        };
        assert!(!channel_hop.is_departure());

        let join = VoiceTransition {
            old_channel: None,
            new_channel: Some(ChannelId(10)),
            ..departure
        };
        assert!(!join.is_departure());
    }

    #[test]
    fn test_rejection_replies_are_distinct() {
        let outcomes = [
            RandomizeOutcome::Rejected(RandomizeRejection::MissingRole),
            RandomizeOutcome::Rejected(RandomizeRejection::NotInVoice),
            RandomizeOutcome::Rejected(RandomizeRejection::WrongMemberCount { found: 9 }),
            RandomizeOutcome::TeamsCreated {
                team_one_channel: ChannelId(1),
                team_two_channel: ChannelId(2),
            },
        ];

        for (i, a) in outcomes.iter().enumerate() {
            for b in outcomes.iter().skip(i + 1) {
                assert_ne!(a.reply_text(), b.reply_text());
            }
        }
    }

    #[test]
    fn test_snowflake_display() {
        assert_eq!(ChannelId(42).to_string(), "42");
        assert_eq!(UserId::from(7).to_string(), "7");
    }
}
