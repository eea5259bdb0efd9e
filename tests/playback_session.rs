//! End-to-end playback flow through the public session and controller APIs.

mod support;

use support::{minuet_env::MinuetEnvGuard, wav::write_test_wav};

use std::path::Path;

use minuet::app_dirs::APP_DIR_NAME;
use minuet::audio::{RodioTransport, Transport, TransportError};
use minuet::config;
use minuet::egui_app::controller::{PlayerController, PlayerMessage};
use minuet::session::{PlayerSession, TransportState};
use tempfile::tempdir;

/// In-memory transport that records the commands it receives.
#[derive(Default)]
struct RecordingTransport {
    log: Vec<String>,
    playing: bool,
    length: f64,
    position: f64,
    fail_load: bool,
}

impl RecordingTransport {
    fn with_length(length: f64) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }
}

impl Transport for RecordingTransport {
    fn load(&mut self, _path: &Path) -> Result<(), TransportError> {
        self.log.push("load".into());
        if self.fail_load {
            return Err(TransportError::Decode(
                rodio::decoder::DecoderError::UnrecognizedFormat,
            ));
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), TransportError> {
        self.log.push("start".into());
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.log.push("stop".into());
        self.playing = false;
    }

    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError> {
        self.log.push(format!("seek {seconds}"));
        self.position = seconds;
        Ok(())
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn length_seconds(&self) -> f64 {
        self.length
    }

    fn set_gain(&mut self, gain: f32) {
        self.log.push(format!("gain {gain}"));
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[test]
fn play_pause_resume_stop_cycle_settles_through_polling() {
    let mut session = PlayerSession::new(RecordingTransport::with_length(30.0));
    session.load_file(Path::new("song.wav")).expect("load");
    assert_eq!(session.state(), TransportState::Stopped);
    assert_eq!(session.duration_seconds(), 30.0);

    session.request_play().expect("play");
    assert_eq!(session.state(), TransportState::Starting);
    session.poll().expect("poll");
    assert_eq!(session.state(), TransportState::Playing);

    session.set_position(12.5).expect("seek");
    session.request_pause().expect("pause");
    assert_eq!(session.state(), TransportState::Pausing);
    session.poll().expect("poll");
    assert_eq!(session.state(), TransportState::Paused);
    assert_eq!(session.position(), 12.5);

    session.request_play().expect("resume");
    session.poll().expect("poll");
    assert_eq!(session.state(), TransportState::Playing);

    session.request_stop().expect("stop");
    assert_eq!(session.state(), TransportState::Stopping);
    session.poll().expect("poll");
    assert_eq!(session.state(), TransportState::Stopped);
    assert_eq!(session.position(), 0.0);
}

#[test]
fn rodio_transport_reports_wav_duration_without_playback() {
    let temp = tempdir().expect("create tempdir");
    let path = temp.path().join("two_seconds.wav");
    // 16 samples at 8 Hz mono.
    write_test_wav(&path, &[0.1; 16]);

    let mut transport = RodioTransport::new();
    transport.load(&path).expect("load wav");
    assert!((transport.length_seconds() - 2.0).abs() < 0.05);
    assert!(!transport.is_playing());
}

#[test]
fn controller_persists_volume_under_config_home() {
    let temp = tempdir().expect("create tempdir");
    let config_home = temp.path().join("config");
    std::fs::create_dir_all(&config_home).expect("create config dir");
    let _env = MinuetEnvGuard::set_config_home(config_home.clone());

    let mut controller = PlayerController::with_transport(RecordingTransport::with_length(9.0));
    controller.dispatch(PlayerMessage::VolumeChanged(0.8));
    assert_eq!(controller.ui.volume, 0.8);

    let saved = config::load_from_path(
        &config_home.join(APP_DIR_NAME).join(config::CONFIG_FILE_NAME),
    )
    .expect("read saved config");
    assert_eq!(saved.volume, 0.8);
}

#[test]
fn failed_load_leaves_controller_without_a_file() {
    let temp = tempdir().expect("create tempdir");
    let _env = MinuetEnvGuard::set_config_home(temp.path().to_path_buf());

    let mut transport = RecordingTransport::with_length(9.0);
    transport.fail_load = true;
    let mut controller = PlayerController::with_transport(transport);
    controller.load_file(Path::new("broken.mp3"));

    assert_eq!(controller.ui.loaded_file, None);
    assert!(!controller.ui.controls.play);
    assert_eq!(controller.ui.status.badge_label, "Error");
}
