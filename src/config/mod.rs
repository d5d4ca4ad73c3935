//! Configuration management for the voice room service

pub mod app;

pub use app::{AppConfig, PlatformSettings, ReclamationSettings, ServiceSettings};
