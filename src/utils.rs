//! Utility functions for the voice room service

use chrono::{DateTime, Utc};

/// Platform limit on channel name length
pub const MAX_CHANNEL_NAME_LENGTH: usize = 100;

/// Build the name for a provisioned personal room
pub fn team_channel_name(display_name: &str) -> String {
    truncate_channel_name(&format!("{}'s team", display_name))
}

/// Clamp a channel name to the platform's length limit on a char boundary
pub fn truncate_channel_name(name: &str) -> String {
    name.chars().take(MAX_CHANNEL_NAME_LENGTH).collect()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_channel_name() {
        assert_eq!(team_channel_name("alice"), "alice's team");
    }

    #[test]
    fn test_long_names_are_truncated() {
        let long = "x".repeat(200);
        let name = team_channel_name(&long);
        assert_eq!(name.chars().count(), MAX_CHANNEL_NAME_LENGTH);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let name = "é".repeat(150);
        let truncated = truncate_channel_name(&name);
        assert_eq!(truncated.chars().count(), MAX_CHANNEL_NAME_LENGTH);
    }
}
