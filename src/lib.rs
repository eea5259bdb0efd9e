//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Rodio-backed playback transport.
pub mod audio;
/// Persisted application configuration.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Logging setup.
pub mod logging;
/// Playback session state machine.
pub mod session;
