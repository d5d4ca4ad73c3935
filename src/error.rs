//! Error types for the voice room service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific room management scenarios
#[derive(Debug, thiserror::Error)]
pub enum RoomServiceError {
    #[error("Gateway connection failed: {message}")]
    GatewayConnectionFailed { message: String },

    #[error("Platform operation failed: {operation}: {message}")]
    PlatformOperationFailed { operation: String, message: String },

    #[error("Channel not found: {channel_id}")]
    ChannelNotFound { channel_id: String },

    #[error("No guild bound for operation: {operation}")]
    MissingGuildContext { operation: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl RoomServiceError {
    /// Shorthand for wrapping a failed platform call
    pub fn platform(operation: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::PlatformOperationFailed {
            operation: operation.into(),
            message: source.to_string(),
        }
    }
}
