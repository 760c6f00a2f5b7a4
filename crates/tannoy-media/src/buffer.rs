//! Playable audio buffers built from raw PCM.

use std::time::Duration;

use tannoy_core::config::{Config, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE};

use crate::DecodeError;
use crate::pcm::{decode_base64, pcm16le_to_f32};

/// Layout of a raw signed 16-bit little-endian PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for PcmFormat {
    /// 24 kHz mono, as produced by the speech model.
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
        }
    }
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sample_rate(), config.channels())
    }
}

/// De-interleaved, normalized audio tagged with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Build a buffer from raw PCM bytes.
    ///
    /// Each channel gets `total_samples / channels` frames; a trailing
    /// partial frame (including an odd final byte) is dropped rather than
    /// padded or rejected.
    pub fn from_pcm16le(bytes: &[u8], format: PcmFormat) -> Result<Self, DecodeError> {
        if format.channels == 0 {
            return Err(DecodeError::InvalidFormat("channel count must be at least 1".into()));
        }
        if format.sample_rate == 0 {
            return Err(DecodeError::InvalidFormat("sample rate must be greater than zero".into()));
        }

        let samples = pcm16le_to_f32(bytes);
        let channel_count = format.channels as usize;
        let frames = samples.len() / channel_count;

        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Ok(Self {
            sample_rate: format.sample_rate,
            channels,
        })
    }

    /// Decode a base64 PCM payload straight into a buffer.
    pub fn from_base64(data: &str, format: PcmFormat) -> Result<Self, DecodeError> {
        let bytes = decode_base64(data)?;
        Self::from_pcm16le(&bytes, format)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Samples re-interleaved frame by frame, as output devices expect.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channels.len());
        for i in 0..self.frames() {
            out.extend(self.channels.iter().map(|c| c[i]));
        }
        out
    }
}
