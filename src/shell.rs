// src/shell.rs
// Display-free command interface: one method per user action

use crate::codec::Codec;
use crate::playback::{PlaybackHandle, PlaybackReport, Player};
use anyhow::Result;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Encode,
    Decode,
    Play,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hint = match self {
            Action::Encode => "text to convert to Morse code",
            Action::Decode => "Morse code to convert to text",
            Action::Play => "text to play as Morse code",
        };
        f.write_str(hint)
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Please enter {0}.")]
    EmptyInput(Action),
    #[error("Failed to copy to the clipboard")]
    Clipboard(#[source] io::Error),
    #[error("Failed to start playback")]
    Playback(#[source] io::Error),
}

pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> io::Result<()>;
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> io::Result<()> {
        self.contents.clear();
        self.contents.push_str(text);
        Ok(())
    }
}

/// State behind one interactive session: the input field, the result view
/// and at most one active playback.
pub struct Session<C: Clipboard = MemoryClipboard> {
    codec: Codec<'static>,
    player: Player,
    clipboard: C,
    input: String,
    result: String,
    playback: Option<PlaybackHandle>,
}

impl Session<MemoryClipboard> {
    pub fn new(player: Player) -> Self {
        Self::with_clipboard(player, MemoryClipboard::default())
    }
}

impl<C: Clipboard> Session<C> {
    pub fn with_clipboard(player: Player, clipboard: C) -> Self {
        Self {
            codec: Codec::default(),
            player,
            clipboard,
            input: String::new(),
            result: String::new(),
            playback: None,
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    fn require_input(&self, action: Action) -> Result<&str, ShellError> {
        if self.input.is_empty() {
            return Err(ShellError::EmptyInput(action));
        }
        Ok(&self.input)
    }

    pub fn encode(&mut self) -> Result<&str, ShellError> {
        let morse = self.codec.encode(self.require_input(Action::Encode)?);
        self.result = morse.into_string();
        Ok(&self.result)
    }

    pub fn decode(&mut self) -> Result<&str, ShellError> {
        self.result = self.codec.decode(self.require_input(Action::Decode)?);
        Ok(&self.result)
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.result.clear();
    }

    pub fn copy_result(&mut self) -> Result<(), ShellError> {
        self.clipboard
            .set_text(&self.result)
            .map_err(ShellError::Clipboard)?;
        log::info!("Result copied to clipboard");
        Ok(())
    }

    /// Encodes the input and plays it. A playback started earlier by this
    /// session is stopped first.
    pub fn play(&mut self) -> Result<(), ShellError> {
        let morse = self.codec.encode(self.require_input(Action::Play)?);
        self.stop();
        let handle = self.player.play(&morse).map_err(ShellError::Playback)?;
        self.playback = Some(handle);
        Ok(())
    }

    /// Stops the active playback. Returns whether one was still running.
    pub fn stop(&mut self) -> bool {
        match self.playback.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.stop();
                running
            }
            None => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Blocks until the active playback ends.
    pub fn wait_playback(&mut self) -> Option<Result<PlaybackReport>> {
        self.playback.take().map(PlaybackHandle::wait)
    }

    pub fn table(&self) -> Vec<(char, &'static str)> {
        self.codec.table().entries()
    }
}

impl<C: Clipboard> Drop for Session<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
