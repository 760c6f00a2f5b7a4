//! Raw 16-bit PCM decoding.

use base64::Engine;

use crate::DecodeError;

/// Full-scale magnitude of a signed 16-bit sample.
const I16_SCALE: f32 = 32768.0;

/// Decode standard (padded) base64 into raw bytes.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(base64::engine::general_purpose::STANDARD.decode(data)?)
}

/// Reinterpret little-endian signed 16-bit PCM as normalized floats.
///
/// A trailing odd byte cannot form a sample and is dropped.
pub fn pcm16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / I16_SCALE)
        .collect()
}
