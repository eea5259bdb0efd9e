//! Bridges the playback session to the egui renderer.
//!
//! Every UI event arrives as a [`PlayerMessage`] and flows through one
//! dispatch function; the renderer never touches the session directly.

use std::path::Path;
use std::time::Duration;

use rfd::FileDialog;
use tracing::warn;

use crate::audio::{RodioTransport, Transport};
use crate::config::{self, AppConfig};
use crate::egui_app::state::{StatusTone, UiState, controls_for, status_badge};
use crate::session::{PlayerSession, TransportState};

/// Interval between position polls while playing.
pub const POSITION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Extensions offered by the open-file dialog.
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Typed UI events consumed by [`PlayerController::dispatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerMessage {
    /// Open button: pick a file and load it.
    OpenRequested,
    /// Play button.
    PlayRequested,
    /// Pause button.
    PauseRequested,
    /// Stop button.
    StopRequested,
    /// Position slider dragged to an absolute position in seconds.
    PositionDragged(f64),
    /// Volume slider moved to a normalized value.
    VolumeChanged(f32),
    /// Position poll while playing, at most once per second.
    TimerTick,
}

/// Maintains player state and bridges the session to the egui UI.
pub struct PlayerController<T: Transport = RodioTransport> {
    /// UI model read by the renderer.
    pub ui: UiState,
    session: PlayerSession<T>,
    config: AppConfig,
}

impl PlayerController<RodioTransport> {
    /// Create a controller backed by the rodio transport.
    pub fn new() -> Self {
        Self::with_transport(RodioTransport::new())
    }
}

impl Default for PlayerController<RodioTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> PlayerController<T> {
    /// Create a controller around an explicit transport.
    pub fn with_transport(transport: T) -> Self {
        let mut controller = Self {
            ui: UiState::default(),
            session: PlayerSession::new(transport),
            config: AppConfig::default(),
        };
        controller.refresh_controls();
        controller
    }

    /// Load persisted config and apply it to the session and UI.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        self.config = config::load_or_default()?;
        self.session.set_volume(self.config.volume);
        self.ui.volume = self.session.volume();
        Ok(())
    }

    /// Single entry point for all UI events.
    pub fn dispatch(&mut self, message: PlayerMessage) {
        match message {
            PlayerMessage::OpenRequested => self.open_via_dialog(),
            PlayerMessage::PlayRequested => {
                if let Err(err) = self.session.request_play() {
                    self.set_status(format!("Playback failed: {err}"), StatusTone::Error);
                }
            }
            PlayerMessage::PauseRequested => {
                if let Err(err) = self.session.request_pause() {
                    self.set_status(format!("Pause failed: {err}"), StatusTone::Error);
                }
            }
            PlayerMessage::StopRequested => {
                if let Err(err) = self.session.request_stop() {
                    self.set_status(format!("Stop failed: {err}"), StatusTone::Error);
                }
                self.ui.position.value = 0.0;
            }
            PlayerMessage::PositionDragged(seconds) => {
                self.ui.position.value = seconds;
                if let Err(err) = self.session.set_position(seconds) {
                    self.set_status(format!("Seek failed: {err}"), StatusTone::Error);
                }
            }
            PlayerMessage::VolumeChanged(value) => self.set_volume(value),
            PlayerMessage::TimerTick => self.refresh_position(),
        }
        self.refresh_controls();
    }

    /// Poll the transport for settle edges and mirror state into the UI.
    ///
    /// Call once per frame from the renderer.
    pub fn tick(&mut self) {
        if let Err(err) = self.session.poll() {
            self.set_status(format!("Playback failed: {err}"), StatusTone::Error);
        }
        self.refresh_controls();
    }

    /// True while the transport is confirmed playing.
    pub fn is_playing(&self) -> bool {
        self.session.state() == TransportState::Playing
    }

    /// Read access to the session for the renderer and tests.
    pub fn session(&self) -> &PlayerSession<T> {
        &self.session
    }

    fn open_via_dialog(&mut self) {
        let mut dialog = FileDialog::new().add_filter("Audio", AUDIO_EXTENSIONS);
        if let Some(dir) = self.config.last_open_dir.as_ref() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        self.load_file(&path);
    }

    /// Load `path` into the session, then refresh slider range and status.
    pub fn load_file(&mut self, path: &Path) {
        match self.session.load_file(path) {
            Ok(()) => {
                self.ui.position.duration = self.session.duration_seconds();
                self.ui.position.value = 0.0;
                self.ui.loaded_file = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                self.config.last_open_dir = path.parent().map(Path::to_path_buf);
                if let Err(err) = self.persist_config("Failed to save config") {
                    self.set_status(err, StatusTone::Warning);
                } else {
                    self.set_status(
                        format!("Loaded {}", path.display()),
                        StatusTone::Info,
                    );
                }
            }
            Err(err) => {
                self.ui.position = Default::default();
                self.ui.loaded_file = None;
                self.set_status(format!("Could not open file: {err}"), StatusTone::Error);
            }
        }
        self.refresh_controls();
    }

    fn set_volume(&mut self, value: f32) {
        self.session.set_volume(value);
        self.ui.volume = self.session.volume();
        self.config.volume = self.session.volume();
        let _ = self.persist_config("Failed to save volume");
    }

    fn refresh_position(&mut self) {
        if !self.ui.position.dragging {
            self.ui.position.value = self.session.position();
        }
    }

    fn refresh_controls(&mut self) {
        self.ui.controls = controls_for(self.session.state(), self.session.file_loaded());
    }

    fn persist_config(&mut self, error_prefix: &str) -> Result<(), String> {
        config::save(&self.config).map_err(|err| {
            let message = format!("{error_prefix}: {err}");
            warn!("{message}");
            message
        })
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
    }
}
