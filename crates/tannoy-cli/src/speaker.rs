//! Audio output for the CLI.

use tannoy_media::AudioBuffer;

/// Plays announcements when built with the `playback` feature; otherwise
/// reports what would have been played.
#[derive(Default)]
pub struct Speaker {
    #[cfg(feature = "playback")]
    player: tannoy_media::Player,
}

impl Speaker {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "playback")]
    pub fn play(&mut self, buffer: &AudioBuffer) -> anyhow::Result<()> {
        let player = &mut self.player;
        tokio::task::block_in_place(|| player.play(buffer))?;
        Ok(())
    }

    #[cfg(not(feature = "playback"))]
    pub fn play(&mut self, buffer: &AudioBuffer) -> anyhow::Result<()> {
        println!(
            "Decoded {:.2}s of audio ({} Hz, {} channel(s)); build with --features playback to hear it",
            buffer.duration().as_secs_f64(),
            buffer.sample_rate(),
            buffer.channel_count(),
        );
        Ok(())
    }
}
