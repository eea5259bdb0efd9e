//! Shared egui UI modules.
/// Bridges the playback session to the egui renderer.
pub mod controller;
/// State types consumed by the renderer.
pub mod state;
/// egui renderer for the player surface.
pub mod ui;
