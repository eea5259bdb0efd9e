//! Playback session: the control-thread state machine over the transport.
//!
//! Requests to start or stop streaming are not assumed to complete when
//! issued. The session records the pending state (`Starting`, `Stopping`,
//! `Pausing`) and settles it only once the transport reports a matching
//! status, observed through [`PlayerSession::poll`] on the control thread.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::audio::{Transport, TransportError};

/// Lifecycle of the playback transport as seen by the control thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    /// Not streaming; position rewound to zero.
    Stopped,
    /// Start requested, awaiting confirmation.
    Starting,
    /// Confirmed streaming.
    Playing,
    /// Stop requested, awaiting confirmation; will rewind once settled.
    Stopping,
    /// Stop requested, awaiting confirmation; position will be retained.
    Pausing,
    /// Not streaming; position retained.
    Paused,
}

impl TransportState {
    /// True for states still awaiting confirmation from the transport.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Starting | Self::Stopping | Self::Pausing)
    }
}

/// Normalized volume parameter applied to the transport as gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeParam {
    value: f32,
}

impl VolumeParam {
    /// Parameter identifier used in logs.
    pub const NAME: &'static str = "VOL";
    /// Default level.
    pub const DEFAULT: f32 = 0.5;

    /// Clamp `value` into [0.0, 1.0] and store it.
    pub fn set(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    /// Current normalized value.
    pub fn value(self) -> f32 {
        self.value
    }
}

impl Default for VolumeParam {
    fn default() -> Self {
        Self {
            value: Self::DEFAULT,
        }
    }
}

/// Owns the transport, the state machine, and the loaded-file bookkeeping.
///
/// All fields live on this one context object; the UI reads through accessors
/// and mutates only via the operations below, on the control thread.
pub struct PlayerSession<T> {
    transport: T,
    state: TransportState,
    file_loaded: bool,
    loaded_path: Option<PathBuf>,
    duration_seconds: f64,
    volume: VolumeParam,
    transport_was_playing: bool,
}

impl<T: Transport> PlayerSession<T> {
    /// Create a session around `transport` with the default volume applied.
    pub fn new(mut transport: T) -> Self {
        let volume = VolumeParam::default();
        transport.set_gain(volume.value());
        Self {
            transport,
            state: TransportState::Stopped,
            file_loaded: false,
            loaded_path: None,
            duration_seconds: 0.0,
            volume,
            transport_was_playing: false,
        }
    }

    /// Current state. Pending values mean a request is awaiting confirmation.
    pub fn state(&self) -> TransportState {
        self.state
    }

    /// True once a source has been loaded successfully.
    pub fn file_loaded(&self) -> bool {
        self.file_loaded
    }

    /// Path of the loaded source, if any.
    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded_path.as_deref()
    }

    /// Duration of the loaded source in seconds, `0.0` when nothing is loaded.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Current value of the volume parameter.
    pub fn volume(&self) -> f32 {
        self.volume.value()
    }

    /// Stop playback, release the prior source, and load `path`.
    ///
    /// On success the position is rewound to zero and the new duration
    /// published. On failure the prior source is already cleared and
    /// `file_loaded` reports false; the error is for user feedback only.
    pub fn load_file(&mut self, path: &Path) -> Result<(), TransportError> {
        self.transport.stop();
        self.file_loaded = false;
        self.loaded_path = None;
        self.duration_seconds = 0.0;
        self.state = TransportState::Stopped;
        self.transport_was_playing = false;

        self.transport.load(path)?;
        self.transport.set_position(0.0)?;
        self.file_loaded = true;
        self.loaded_path = Some(path.to_path_buf());
        self.duration_seconds = self.transport.length_seconds();
        info!(
            path = %path.display(),
            duration_seconds = self.duration_seconds,
            "audio file loaded"
        );
        Ok(())
    }

    /// Commit `requested` and issue at most one transport command for it.
    ///
    /// Requesting the current state is a no-op. `Playing` and `Paused` are
    /// settled states reached via [`Self::poll`] and issue no command.
    pub fn change_state(&mut self, requested: TransportState) -> Result<(), TransportError> {
        if self.state == requested {
            return Ok(());
        }
        debug!(from = ?self.state, to = ?requested, "transport state change");
        self.state = requested;
        match requested {
            TransportState::Stopped => self.transport.set_position(0.0)?,
            TransportState::Starting => self.transport.start()?,
            TransportState::Stopping | TransportState::Pausing => self.transport.stop(),
            TransportState::Playing | TransportState::Paused => {}
        }
        Ok(())
    }

    /// User pressed play: request startup; settles to `Playing` once confirmed.
    pub fn request_play(&mut self) -> Result<(), TransportError> {
        self.change_state(TransportState::Starting)
    }

    /// User pressed stop.
    ///
    /// A playing transport is asked to stop and settles later; anything else
    /// is already silent and rewinds immediately.
    pub fn request_stop(&mut self) -> Result<(), TransportError> {
        if self.state == TransportState::Playing {
            self.change_state(TransportState::Stopping)
        } else {
            self.change_state(TransportState::Stopped)
        }
    }

    /// User pressed pause: request a stop that retains the position.
    pub fn request_pause(&mut self) -> Result<(), TransportError> {
        self.change_state(TransportState::Pausing)
    }

    /// Observe the transport and settle pending states on status edges.
    ///
    /// Call once per control-thread tick. Only a change in the transport's
    /// playing status triggers the settle step, mirroring a change
    /// notification delivered on the control thread.
    pub fn poll(&mut self) -> Result<(), TransportError> {
        let playing = self.transport.is_playing();
        if playing == self.transport_was_playing {
            return Ok(());
        }
        self.transport_was_playing = playing;
        self.settle(playing)
    }

    fn settle(&mut self, transport_playing: bool) -> Result<(), TransportError> {
        if transport_playing {
            self.change_state(TransportState::Playing)
        } else if self.state == TransportState::Stopping {
            self.change_state(TransportState::Stopped)
        } else if self.state == TransportState::Pausing {
            self.change_state(TransportState::Paused)
        } else {
            Ok(())
        }
    }

    /// Seek pass-through; bounds are whatever the transport enforces.
    pub fn set_position(&mut self, seconds: f64) -> Result<(), TransportError> {
        self.transport.set_position(seconds)
    }

    /// Position pass-through.
    pub fn position(&self) -> f64 {
        self.transport.position()
    }

    /// Set the VOL parameter (clamped) and apply it as transport gain.
    pub fn set_volume(&mut self, value: f32) {
        self.volume.set(value);
        debug!(
            param = VolumeParam::NAME,
            value = self.volume.value(),
            "volume parameter changed"
        );
        self.transport.set_gain(self.volume.value());
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
