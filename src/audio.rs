//! Rodio-backed playback transport.
//!
//! This module plays the role of the host playback engine: it owns the output
//! stream and sink, decodes the loaded file, and answers position and status
//! queries. Lifecycle sequencing (stopped/starting/playing/...) lives in
//! [`crate::session`] and only reaches this module as individual commands.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by the playback transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The file could not be read from disk.
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
    /// The file contents are not decodable audio.
    #[error("Unsupported or corrupt audio data: {0}")]
    Decode(rodio::decoder::DecoderError),
    /// The output device could not be opened.
    #[error("Audio output failed: {0}")]
    Output(rodio::StreamError),
    /// A seek request was rejected by the decoder.
    #[error("Audio seek failed: {0}")]
    Seek(rodio::source::SeekError),
}

/// Command surface of the playback engine, as driven by a playback session.
///
/// `start` and `stop` affect streaming only; positional conventions such as
/// "stopped rewinds to zero" belong to the session, never to the transport.
pub trait Transport {
    /// Swap in a new source decoded from `path`, releasing the old one first.
    ///
    /// On failure no source remains loaded; the prior one is already gone.
    fn load(&mut self, path: &Path) -> Result<(), TransportError>;
    /// Begin or resume streaming from the current position.
    fn start(&mut self) -> Result<(), TransportError>;
    /// Halt streaming. The current position is retained.
    fn stop(&mut self);
    /// Seek to an absolute position in seconds.
    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError>;
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    /// Duration of the loaded source in seconds, `0.0` when nothing is loaded.
    fn length_seconds(&self) -> f64;
    /// Gain pass-through, expected range 0.0-1.0. No validation is applied.
    fn set_gain(&mut self, gain: f32);
    /// True while the engine is actively streaming samples.
    fn is_playing(&self) -> bool;
}

/// Production transport over a rodio output stream and sink.
///
/// The stream is opened lazily on the first `start`, so construction and file
/// loading work on machines without an audio device (and in tests).
pub struct RodioTransport {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    current_audio: Option<Arc<[u8]>>,
    duration: f64,
    pending_position: f64,
    gain: f32,
}

impl RodioTransport {
    /// Create a transport with no source loaded and no output stream open.
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            current_audio: None,
            duration: 0.0,
            pending_position: 0.0,
            gain: 1.0,
        }
    }

    fn release_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn open_stream(&mut self) -> Result<&OutputStream, TransportError> {
        if self.stream.is_none() {
            let stream = OutputStreamBuilder::open_default_stream().map_err(TransportError::Output)?;
            self.stream = Some(stream);
        }
        match &self.stream {
            Some(stream) => Ok(stream),
            // Unreachable: assigned above, but avoid unwrap in non-test code.
            None => Err(TransportError::Output(rodio::StreamError::NoDevice)),
        }
    }
}

impl Default for RodioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for RodioTransport {
    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        self.release_sink();
        self.current_audio = None;
        self.duration = 0.0;
        self.pending_position = 0.0;

        let bytes: Arc<[u8]> = fs::read(path)
            .map_err(|source| TransportError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?
            .into();
        let duration = decoded_duration(&bytes)?;
        debug!(path = %path.display(), duration, "decoded audio source");
        self.current_audio = Some(bytes);
        self.duration = duration;
        Ok(())
    }

    fn start(&mut self) -> Result<(), TransportError> {
        if let Some(sink) = &self.sink
            && !sink.empty()
        {
            sink.play();
            return Ok(());
        }
        let Some(bytes) = self.current_audio.clone() else {
            return Ok(());
        };
        let source = Decoder::new(Cursor::new(bytes)).map_err(TransportError::Decode)?;
        let gain = self.gain;
        let position = self.pending_position;
        let stream = self.open_stream()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(gain);
        sink.append(source);
        if position > 0.0 {
            sink.try_seek(Duration::from_secs_f64(position))
                .map_err(TransportError::Seek)?;
        }
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = &self.sink {
            self.pending_position = sink.get_pos().as_secs_f64();
            sink.pause();
        }
    }

    fn set_position(&mut self, seconds: f64) -> Result<(), TransportError> {
        self.pending_position = seconds.max(0.0);
        // A drained sink cannot seek; drop it so the next start rebuilds.
        if self.sink.as_ref().is_some_and(|sink| sink.empty()) {
            self.sink = None;
        }
        if let Some(sink) = &self.sink {
            sink.try_seek(Duration::from_secs_f64(self.pending_position))
                .map_err(TransportError::Seek)?;
        }
        Ok(())
    }

    fn position(&self) -> f64 {
        match &self.sink {
            Some(sink) => current_position(sink.empty(), sink.get_pos().as_secs_f64(), self.duration),
            None => self.pending_position,
        }
    }

    fn length_seconds(&self) -> f64 {
        self.duration
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = &self.sink {
            sink.set_volume(gain);
        }
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }
}

/// A drained sink has played through; report the end of the source rather
/// than the stale seek point it started from.
fn current_position(sink_empty: bool, sink_position: f64, duration: f64) -> f64 {
    if sink_empty { duration } else { sink_position }
}

/// Probe `bytes` with the decoder and report the source duration in seconds.
///
/// Compressed formats may not report a duration up front; fall back to the
/// WAV header when they do not, and to `0.0` as a last resort.
fn decoded_duration(bytes: &Arc<[u8]>) -> Result<f64, TransportError> {
    let decoder = Decoder::new(Cursor::new(bytes.clone())).map_err(TransportError::Decode)?;
    let duration = decoder
        .total_duration()
        .map(|duration| duration.as_secs_f64())
        .or_else(|| wav_header_duration(bytes))
        .unwrap_or(0.0);
    Ok(duration)
}

fn wav_header_duration(bytes: &Arc<[u8]>) -> Option<f64> {
    let reader = hound::WavReader::new(Cursor::new(bytes.clone())).ok()?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return None;
    }
    Some(reader.duration() as f64 / spec.sample_rate as f64)
}
