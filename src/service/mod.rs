//! Service layer for the team-rooms service
//!
//! This module contains the main application state and coordination of the
//! gateway client, sweep task and health server.

pub mod app;

pub use app::AppState;
