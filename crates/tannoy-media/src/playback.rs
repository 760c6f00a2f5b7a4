//! Local playback through the default output device.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::AudioBuffer;

#[derive(Debug, thiserror::Error)]
#[error("audio output unavailable: {0}")]
pub struct PlaybackError(String);

/// Plays decoded announcements.
///
/// The output stream is opened on the first `play` and kept for every
/// later announcement.
#[derive(Default)]
pub struct Player {
    stream: Option<OutputStream>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    fn output(&mut self) -> Result<&OutputStream, PlaybackError> {
        if self.stream.is_none() {
            let stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| PlaybackError(e.to_string()))?;
            info!("Opened default audio output");
            self.stream = Some(stream);
        }
        self.stream
            .as_ref()
            .ok_or_else(|| PlaybackError("output stream missing".into()))
    }

    /// Play the buffer to completion. Blocks the calling thread.
    pub fn play(&mut self, buffer: &AudioBuffer) -> Result<(), PlaybackError> {
        if buffer.is_empty() {
            debug!("Skipping playback of empty buffer");
            return Ok(());
        }

        let stream = self.output()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.append(SamplesBuffer::new(
            buffer.channel_count(),
            buffer.sample_rate(),
            buffer.interleaved(),
        ));

        debug!(duration_ms = buffer.duration().as_millis() as u64, "Playing announcement");
        sink.sleep_until_end();
        Ok(())
    }
}
