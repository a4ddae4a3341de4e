// src/lib.rs
// Library interface for dotdash

pub mod codec;
pub mod config;
pub mod playback;
pub mod shell;
pub mod sink;
pub mod table;
pub mod tone;

pub use codec::{Codec, MorseString, decode, encode};
pub use config::{Config, Timing};
pub use playback::{CancelToken, PlaybackHandle, PlaybackReport, Player};
pub use shell::{Session, ShellError};
pub use sink::{LogSink, ToneSink};
pub use table::SymbolTable;
pub use tone::{Tone, ToneBank, ToneSpec, generate_assets};
