//! Shared state types for the egui UI.

use egui::Color32;

use crate::session::{TransportState, VolumeParam};

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Status badge + text shown in the footer.
    pub status: StatusBarState,
    /// Enabled flags for the transport buttons.
    pub controls: TransportControls,
    /// Position slider model.
    pub position: PositionSliderState,
    /// Volume slider value (0.0-1.0), bound to the VOL parameter.
    pub volume: f32,
    /// Display name of the loaded file, if any.
    pub loaded_file: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            controls: controls_for(TransportState::Stopped, false),
            position: PositionSliderState::default(),
            volume: VolumeParam::DEFAULT,
            loaded_file: None,
        }
    }
}

/// Enabled/disabled flags for the four transport buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportControls {
    /// Open-file button.
    pub open: bool,
    /// Play button.
    pub play: bool,
    /// Pause button.
    pub pause: bool,
    /// Stop button.
    pub stop: bool,
}

/// Button-enablement policy.
///
/// Open is always available. Play requires a loaded file that is not already
/// playing (a pending start counts as playing). Pause is playback-only. Stop
/// stays live through a pending stop, and while paused so the direct
/// paused-to-stopped rewind remains reachable.
pub fn controls_for(state: TransportState, file_loaded: bool) -> TransportControls {
    let playing = state == TransportState::Playing;
    TransportControls {
        open: true,
        play: file_loaded && !playing && state != TransportState::Starting,
        pause: playing,
        stop: playing
            || state == TransportState::Stopping
            || state == TransportState::Paused,
    }
}

/// Position slider model: range `[0, duration]`, value in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionSliderState {
    /// Upper bound in seconds, set when a file loads.
    pub duration: f64,
    /// Displayed position in seconds.
    pub value: f64,
    /// True while the user is dragging; poll updates must not fight the drag.
    pub dragging: bool,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
}

impl StatusBarState {
    /// Default status shown before any file is opened.
    pub fn idle() -> Self {
        let (badge_label, badge_color) = status_badge(StatusTone::Idle);
        Self {
            text: "Open an audio file to get started".into(),
            badge_label,
            badge_color,
        }
    }
}

/// Severity of a status message, mapped to a badge color.
#[derive(Clone, Copy, Debug)]
pub enum StatusTone {
    /// Nothing happening.
    Idle,
    /// Informational.
    Info,
    /// Non-fatal problem.
    Warning,
    /// Operation failed.
    Error,
}

pub(crate) fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(42, 42, 42)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_loaded_leaves_only_open_enabled() {
        let controls = controls_for(TransportState::Stopped, false);
        assert!(controls.open);
        assert!(!controls.play);
        assert!(!controls.pause);
        assert!(!controls.stop);
    }

    #[test]
    fn loaded_but_stopped_enables_play_only() {
        let controls = controls_for(TransportState::Stopped, true);
        assert!(controls.open);
        assert!(controls.play);
        assert!(!controls.pause);
        assert!(!controls.stop);
    }

    #[test]
    fn playing_enables_stop_and_pause_but_not_play() {
        let controls = controls_for(TransportState::Playing, true);
        assert!(controls.open);
        assert!(!controls.play);
        assert!(controls.pause);
        assert!(controls.stop);
    }

    #[test]
    fn pending_stop_keeps_stop_enabled() {
        let controls = controls_for(TransportState::Stopping, true);
        assert!(controls.stop);
        assert!(!controls.pause);
    }

    #[test]
    fn paused_allows_play_and_direct_stop() {
        let controls = controls_for(TransportState::Paused, true);
        assert!(controls.play);
        assert!(!controls.pause);
        assert!(controls.stop);
    }

    #[test]
    fn pending_start_counts_as_playing_for_play_button() {
        let controls = controls_for(TransportState::Starting, true);
        assert!(!controls.play);
    }
}
