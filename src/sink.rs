// src/sink.rs
// Where triggered tones go

use crate::tone::Tone;
use anyhow::Result;

/// Starts a tone without waiting for it to finish.
pub trait ToneSink: Send + Sync {
    fn trigger(&self, tone: Tone) -> Result<()>;
}

/// Sink for builds or machines without an audio device: every trigger is
/// logged and otherwise dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn trigger(&self, tone: Tone) -> Result<()> {
        log::debug!("tone {:?}", tone);
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use device::{RodioSink, open_default};

#[cfg(feature = "audio")]
mod device {
    use super::ToneSink;
    use crate::tone::{Tone, ToneBank};
    use anyhow::{Context, Result};
    use rodio::{OutputStream, OutputStreamHandle, Source};
    use std::sync::Arc;
    use std::time::Duration;

    /// Plays one preloaded clip. Holds a handle to the shared buffer, so
    /// triggering never copies samples.
    pub(super) struct ClipSource {
        samples: Arc<[i16]>,
        pos: usize,
        sample_rate: u32,
    }

    impl ClipSource {
        pub(super) fn new(samples: Arc<[i16]>, sample_rate: u32) -> Self {
            Self {
                samples,
                pos: 0,
                sample_rate,
            }
        }
    }

    impl Iterator for ClipSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            let sample = *self.samples.get(self.pos)?;
            self.pos += 1;
            Some(sample as f32 / 32768.0)
        }
    }

    impl Source for ClipSource {
        fn current_frame_len(&self) -> Option<usize> {
            Some(self.samples.len() - self.pos)
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(Duration::from_secs_f64(
                self.samples.len() as f64 / self.sample_rate as f64,
            ))
        }
    }

    /// Mixes triggered clips into the default output device.
    pub struct RodioSink {
        handle: OutputStreamHandle,
        bank: ToneBank,
    }

    impl ToneSink for RodioSink {
        fn trigger(&self, tone: Tone) -> Result<()> {
            let source =
                ClipSource::new(Arc::clone(self.bank.clip(tone)), self.bank.sample_rate());
            self.handle
                .play_raw(source)
                .with_context(|| format!("Failed to play {:?} tone", tone))
        }
    }

    /// Opens the default output device. The returned stream must stay alive
    /// for as long as the sink is used.
    pub fn open_default(bank: ToneBank) -> Result<(OutputStream, RodioSink)> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open audio output")?;
        Ok((stream, RodioSink { handle, bank }))
    }
}

#[cfg(all(test, feature = "audio"))]
mod tests {
    use super::device::ClipSource;
    use rodio::Source;
    use std::sync::Arc;

    #[test]
    fn test_clip_source_plays_buffer_once() {
        let samples: Arc<[i16]> = vec![0, 16384, -32768, 32767].into();
        let mut source = ClipSource::new(Arc::clone(&samples), 44100);
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 44100);

        let mut played = Vec::new();
        for remaining in (1..=samples.len()).rev() {
            assert_eq!(source.current_frame_len(), Some(remaining));
            played.extend(source.next());
        }
        assert_eq!(source.current_frame_len(), Some(0));
        assert_eq!(source.next(), None);

        assert_eq!(played.len(), samples.len());
        assert_eq!(played[..3], [0.0, 0.5, -1.0]);
        assert_eq!(played[3], 32767.0 / 32768.0);
    }
}
