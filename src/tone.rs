// src/tone.rs
// Dot/dash tone synthesis and the WAV assets they are stored in

use crate::config::Config;
use anyhow::{Context, Result, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Dot,
    Dash,
}

/// Parameters of one sine clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSpec {
    pub duration: Duration,
    pub frequency: f32,
    pub sample_rate: u32,
    pub amplitude: i16,
}

impl ToneSpec {
    pub fn for_tone(tone: Tone, config: &Config) -> Self {
        let duration = match tone {
            Tone::Dot => config.timing.dot,
            Tone::Dash => config.timing.dash,
        };
        Self {
            duration,
            frequency: config.frequency,
            sample_rate: config.sample_rate,
            amplitude: config.amplitude,
        }
    }

    pub fn sample_count(&self) -> usize {
        (self.duration.as_secs_f64() * self.sample_rate as f64).round() as usize
    }

    /// Renders the clip. The same spec always yields the same samples.
    pub fn synthesize(&self) -> Vec<i16> {
        let amplitude = self.amplitude as f64;
        let step = 2.0 * PI * self.frequency as f64 / self.sample_rate as f64;
        (0..self.sample_count())
            .map(|i| (amplitude * (step * i as f64).sin()) as i16)
            .collect()
    }

    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    pub fn write_wav_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = WavWriter::create(path, self.wav_spec())
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for sample in self.synthesize() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }
}

/// Writes `dot.wav` and `dash.wav` into `config.asset_dir`.
pub fn generate_assets(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.asset_dir)
        .with_context(|| format!("Failed to create {}", config.asset_dir.display()))?;

    for (tone, path) in [
        (Tone::Dot, config.dot_path()),
        (Tone::Dash, config.dash_path()),
    ] {
        let spec = ToneSpec::for_tone(tone, config);
        spec.write_wav_file(&path)?;
        log::info!(
            "Wrote {:?} tone: {} ({} samples, {} Hz)",
            tone,
            path.display(),
            spec.sample_count(),
            spec.frequency
        );
    }
    Ok(())
}

/// Reads a mono 16-bit PCM clip, returning its samples and sample rate.
pub fn read_clip<P: AsRef<Path>>(path: P) -> Result<(Vec<i16>, u32)> {
    let path = path.as_ref();
    let reader =
        WavReader::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let spec = reader.spec();
    log::debug!("{}: {:?}", path.display(), spec);

    if spec.channels != 1 || spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int
    {
        bail!(
            "Unsupported tone clip {}: {:?}. Only mono 16-bit Int is supported.",
            path.display(),
            spec
        );
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read samples from {}", path.display()))?;
    Ok((samples, spec.sample_rate))
}

/// Both clips held in memory. Cloning shares the buffers.
#[derive(Debug, Clone)]
pub struct ToneBank {
    dot: Arc<[i16]>,
    dash: Arc<[i16]>,
    sample_rate: u32,
}

impl ToneBank {
    pub fn new(dot: Vec<i16>, dash: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            dot: dot.into(),
            dash: dash.into(),
            sample_rate,
        }
    }

    /// Renders both clips from `config` without touching disk.
    pub fn synthesize(config: &Config) -> Self {
        Self::new(
            ToneSpec::for_tone(Tone::Dot, config).synthesize(),
            ToneSpec::for_tone(Tone::Dash, config).synthesize(),
            config.sample_rate,
        )
    }

    /// Loads both clips from `config.asset_dir`.
    pub fn load(config: &Config) -> Result<Self> {
        let (dot, dot_rate) = read_clip(config.dot_path())?;
        let (dash, dash_rate) = read_clip(config.dash_path())?;
        if dot_rate != dash_rate {
            bail!(
                "Tone clips disagree on sample rate: dot {} Hz, dash {} Hz",
                dot_rate,
                dash_rate
            );
        }
        log::info!(
            "Loaded tone clips from {} ({} + {} samples at {} Hz)",
            config.asset_dir.display(),
            dot.len(),
            dash.len(),
            dot_rate
        );
        Ok(Self::new(dot, dash, dot_rate))
    }

    /// Loads the clips, or synthesizes them when either file is missing.
    /// A file that exists but cannot be read is still an error.
    pub fn load_or_synthesize(config: &Config) -> Result<Self> {
        if config.dot_path().exists() && config.dash_path().exists() {
            return Self::load(config);
        }
        log::warn!(
            "Tone clips not found in {}; synthesizing them (run `gen-tones` to create the files)",
            config.asset_dir.display()
        );
        Ok(Self::synthesize(config))
    }

    pub fn clip(&self, tone: Tone) -> &Arc<[i16]> {
        match tone {
            Tone::Dot => &self.dot,
            Tone::Dash => &self.dash,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dotdash-tone-{}-{}", name, std::process::id()));
        fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn test_sample_counts() {
        let config = Config::default();
        assert_eq!(ToneSpec::for_tone(Tone::Dot, &config).sample_count(), 8820);
        assert_eq!(ToneSpec::for_tone(Tone::Dash, &config).sample_count(), 26460);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let spec = ToneSpec::for_tone(Tone::Dot, &Config::default());
        let first = spec.synthesize();
        assert_eq!(first, spec.synthesize());
        assert_eq!(first[0], 0);
        // 800 Hz at 44.1 kHz: sample 1 is 32767 * sin(2π * 800 / 44100).
        let expected = (32767.0 * (2.0 * PI * 800.0 / 44100.0).sin()) as i16;
        assert_eq!(first[1], expected);
        assert!(first.iter().all(|s| *s > i16::MIN));
    }

    #[test]
    fn test_assets_round_trip_through_wav() {
        let config = Config {
            asset_dir: scratch_dir("assets"),
            ..Config::default()
        };
        generate_assets(&config).unwrap();

        let bank = ToneBank::load(&config).unwrap();
        let fresh = ToneBank::synthesize(&config);
        assert_eq!(bank.sample_rate(), 44100);
        assert_eq!(bank.clip(Tone::Dot), fresh.clip(Tone::Dot));
        assert_eq!(bank.clip(Tone::Dash), fresh.clip(Tone::Dash));

        fs::remove_dir_all(&config.asset_dir).ok();
    }

    #[test]
    fn test_missing_assets_are_synthesized() {
        let config = Config {
            asset_dir: scratch_dir("missing"),
            ..Config::default()
        };
        assert!(ToneBank::load(&config).is_err());
        let bank = ToneBank::load_or_synthesize(&config).unwrap();
        assert_eq!(bank.clip(Tone::Dash).len(), 26460);
    }

    #[test]
    fn test_rejects_stereo_clip() {
        let dir = scratch_dir("stereo");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        assert!(read_clip(&path).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
