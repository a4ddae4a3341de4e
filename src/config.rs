// src/config.rs
// Timing and tone parameters

use std::path::PathBuf;
use std::time::Duration;

/// Length of a dot, and of the gap between two characters.
pub const DOT_DURATION: Duration = Duration::from_millis(200);
/// Length of a dash, and of the gap between two words.
pub const DASH_DURATION: Duration = Duration::from_millis(600);
pub const FREQUENCY: f32 = 800.0;
pub const SAMPLE_RATE: u32 = 44100;
/// Peak of a 16-bit signed sample.
pub const AMPLITUDE: i16 = i16::MAX;

pub const DOT_FILE: &str = "dot.wav";
pub const DASH_FILE: &str = "dash.wav";

/// How long each scheduled step lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub dot: Duration,
    pub dash: Duration,
    pub letter_gap: Duration,
    pub word_gap: Duration,
}

impl Timing {
    /// Dash and word gap are three dots, the letter gap is one.
    pub fn from_dot(dot: Duration) -> Self {
        Self {
            dot,
            dash: dot * 3,
            letter_gap: dot,
            word_gap: dot * 3,
        }
    }

    /// Longest time a stop request can wait for the worker to notice it.
    pub fn longest_step(&self) -> Duration {
        self.dot.max(self.dash).max(self.letter_gap).max(self.word_gap)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            dot: DOT_DURATION,
            dash: DASH_DURATION,
            letter_gap: DOT_DURATION,
            word_gap: DASH_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub timing: Timing,
    pub frequency: f32,
    pub sample_rate: u32,
    pub amplitude: i16,
    /// Directory holding `dot.wav` and `dash.wav`.
    pub asset_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            frequency: FREQUENCY,
            sample_rate: SAMPLE_RATE,
            amplitude: AMPLITUDE,
            asset_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn dot_path(&self) -> PathBuf {
        self.asset_dir.join(DOT_FILE)
    }

    pub fn dash_path(&self) -> PathBuf {
        self.asset_dir.join(DASH_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing, Timing::from_dot(Duration::from_millis(200)));
        assert_eq!(timing.longest_step(), Duration::from_millis(600));
    }

    #[test]
    fn test_asset_paths() {
        let config = Config {
            asset_dir: PathBuf::from("assets"),
            ..Config::default()
        };
        assert_eq!(config.dot_path(), PathBuf::from("assets/dot.wav"));
        assert_eq!(config.dash_path(), PathBuf::from("assets/dash.wav"));
    }
}
