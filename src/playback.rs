// src/playback.rs
// Timed, cancelable playback of a Morse string

use crate::codec::{MorseString, Token};
use crate::config::Timing;
use crate::sink::ToneSink;
use crate::tone::Tone;
use anyhow::{Result, anyhow};
use std::io;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Trigger `tone`, then hold for `hold` before the next step.
    Tone { tone: Tone, hold: Duration },
    Silence(Duration),
}

impl Step {
    pub fn duration(&self) -> Duration {
        match *self {
            Step::Tone { hold, .. } => hold,
            Step::Silence(d) => d,
        }
    }
}

/// Turns a Morse string into the steps the worker runs.
///
/// Works on tokens rather than raw characters, so a word boundary becomes a
/// single word gap instead of three letter gaps. Characters inside a group
/// other than `.` and `-` (such as the `?` placeholder) are silent.
pub fn schedule(morse: &MorseString, timing: &Timing) -> Vec<Step> {
    let mut steps = Vec::new();
    for token in morse.tokens() {
        match token {
            Token::Group(group) => {
                for symbol in group.chars() {
                    match symbol {
                        '.' => steps.push(Step::Tone {
                            tone: Tone::Dot,
                            hold: timing.dot,
                        }),
                        '-' => steps.push(Step::Tone {
                            tone: Tone::Dash,
                            hold: timing.dash,
                        }),
                        _ => {}
                    }
                }
            }
            Token::LetterGap => steps.push(Step::Silence(timing.letter_gap)),
            Token::WordGap => steps.push(Step::Silence(timing.word_gap)),
        }
    }
    steps
}

/// Stop request for one playback task. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, signal) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps for `timeout` unless cancelled first. Returns whether the token
    /// is cancelled.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (flag, signal) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = signal
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackReport {
    /// Tones triggered before the task ended.
    pub tones: usize,
    pub cancelled: bool,
}

/// Caller's side of a running playback.
#[derive(Debug)]
pub struct PlaybackHandle {
    token: CancelToken,
    worker: JoinHandle<PlaybackReport>,
}

impl PlaybackHandle {
    /// Asks this playback, and only this one, to stop.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Blocks until the worker exits.
    pub fn wait(self) -> Result<PlaybackReport> {
        self.worker
            .join()
            .map_err(|_| anyhow!("Playback worker panicked"))
    }
}

/// Starts playbacks on background threads.
#[derive(Clone)]
pub struct Player {
    sink: Arc<dyn ToneSink>,
    timing: Timing,
}

impl Player {
    pub fn new(sink: Arc<dyn ToneSink>, timing: Timing) -> Self {
        Self { sink, timing }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Plays `morse` on a new worker thread with its own cancel token.
    pub fn play(&self, morse: &MorseString) -> io::Result<PlaybackHandle> {
        let steps = schedule(morse, &self.timing);
        let token = CancelToken::new();
        let sink = Arc::clone(&self.sink);
        let worker_token = token.clone();

        log::info!("Starting playback of {} steps: {}", steps.len(), morse);
        let worker = thread::Builder::new()
            .name("morse-playback".into())
            .spawn(move || run(&steps, sink.as_ref(), &worker_token))?;

        Ok(PlaybackHandle { token, worker })
    }
}

fn run(steps: &[Step], sink: &dyn ToneSink, token: &CancelToken) -> PlaybackReport {
    let mut report = PlaybackReport::default();

    for step in steps {
        if token.is_cancelled() {
            report.cancelled = true;
            break;
        }
        if let Step::Tone { tone, .. } = step {
            match sink.trigger(*tone) {
                Ok(()) => report.tones += 1,
                Err(e) => log::warn!("Skipping {:?} tone: {:#}", tone, e),
            }
        }
        if token.wait(step.duration()) {
            report.cancelled = true;
            break;
        }
    }

    if report.cancelled {
        log::info!("Playback stopped after {} tones", report.tones);
    } else {
        log::info!("Playback finished: {} tones", report.tones);
    }
    report
}
