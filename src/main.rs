use anyhow::Result;
use clap::{Parser, Subcommand};
use dotdash::config::{self, Config, Timing};
use dotdash::{LogSink, Player, Session, ShellError, tone};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding dot.wav and dash.wav
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    assets: PathBuf,

    /// Tone frequency in Hz
    #[arg(long, global = true, value_name = "HZ", default_value_t = config::FREQUENCY)]
    frequency: f32,

    /// Dot length in milliseconds; dashes and word gaps last three dots
    #[arg(long, global = true, value_name = "MS", default_value_t = 200)]
    dot_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text to Morse code
    Encode {
        #[arg(value_name = "TEXT", required = true)]
        text: Vec<String>,
    },
    /// Convert Morse code to text (quote it to keep word gaps)
    Decode {
        #[arg(value_name = "MORSE")]
        morse: String,
    },
    /// Show the Morse code table
    Table,
    /// Write the dot and dash tone clips
    GenTones {
        /// Output directory; defaults to --assets
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Play text as Morse code and wait until it finishes
    Play {
        #[arg(value_name = "TEXT", required = true)]
        text: Vec<String>,
    },
    /// Interactive session reading commands from stdin
    Shell,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            timing: Timing::from_dot(Duration::from_millis(self.dot_ms)),
            frequency: self.frequency,
            asset_dir: self.assets.clone(),
            ..Config::default()
        }
    }
}

/// Player plus whatever keeps its output device open.
struct Audio {
    player: Player,
    #[cfg(feature = "audio")]
    _stream: Option<rodio::OutputStream>,
}

#[cfg(feature = "audio")]
fn open_audio(config: &Config) -> Result<Audio> {
    let bank = dotdash::ToneBank::load_or_synthesize(config)?;
    match dotdash::sink::open_default(bank) {
        Ok((stream, sink)) => Ok(Audio {
            player: Player::new(Arc::new(sink), config.timing),
            _stream: Some(stream),
        }),
        Err(e) => {
            log::warn!("{:#}; tones will only be logged", e);
            Ok(Audio {
                player: Player::new(Arc::new(LogSink), config.timing),
                _stream: None,
            })
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_audio(config: &Config) -> Result<Audio> {
    log::warn!("Built without the `audio` feature; tones will only be logged");
    Ok(Audio {
        player: Player::new(Arc::new(LogSink), config.timing),
    })
}

fn main() -> Result<()> {
    // Set up logging. Use `RUST_LOG=info` or `RUST_LOG=debug` to see output.
    env_logger::init();
    let cli = Cli::parse();
    let mut config = cli.config();
    log::debug!("{:?}", config);

    match cli.command {
        Command::Encode { text } => {
            let mut session = Session::new(Player::new(Arc::new(LogSink), config.timing));
            session.set_input(text.join(" "));
            report(session.encode().map(|morse| println!("{}", morse)));
        }
        Command::Decode { morse } => {
            let mut session = Session::new(Player::new(Arc::new(LogSink), config.timing));
            session.set_input(morse);
            report(session.decode().map(|text| println!("{}", text)));
        }
        Command::Table => {
            for (ch, pattern) in dotdash::SymbolTable::standard().entries() {
                println!("{}: {}", ch, pattern);
            }
        }
        Command::GenTones { out } => {
            if let Some(dir) = out {
                config.asset_dir = dir;
            }
            tone::generate_assets(&config)?;
        }
        Command::Play { text } => {
            let audio = open_audio(&config)?;
            let mut session = Session::new(audio.player.clone());
            session.set_input(text.join(" "));
            if report(session.play()) {
                if let Some(outcome) = session.wait_playback() {
                    let played = outcome?;
                    log::info!("{:?}", played);
                }
            }
        }
        Command::Shell => {
            let audio = open_audio(&config)?;
            let mut session = Session::new(audio.player.clone());
            run_shell(&mut session)?;
        }
    }

    Ok(())
}

/// Prints a rejected action the way the interactive shell does. Returns
/// whether the action went through.
fn report(outcome: Result<(), ShellError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Input Error: {}", e);
            false
        }
    }
}

const SHELL_HELP: &str = "\
Commands:
  input <text>  set the input field
  encode        convert the input to Morse code
  decode        convert the input from Morse code
  clear         clear the input and the result
  copy          copy the result to the clipboard
  play          play the input as Morse code
  stop          stop playing
  table         show the Morse code table
  show          show the input and the result
  help          show this help
  quit          leave the shell";

fn run_shell(session: &mut Session) -> Result<()> {
    println!("{}", SHELL_HELP);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let (command, arg) = line
            .trim_start()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));

        let outcome = match command {
            "input" => {
                session.set_input(arg);
                Ok(())
            }
            "encode" => session.encode().map(|morse| println!("{}", morse)),
            "decode" => session.decode().map(|text| println!("{}", text)),
            "clear" => {
                session.clear();
                Ok(())
            }
            "copy" => session
                .copy_result()
                .map(|()| println!("Result copied to clipboard")),
            "play" => session.play(),
            "stop" => {
                if !session.stop() {
                    println!("Nothing is playing");
                }
                Ok(())
            }
            "table" => {
                for (ch, pattern) in session.table() {
                    println!("{}: {}", ch, pattern);
                }
                Ok(())
            }
            "show" => {
                println!("input:  {}", session.input());
                println!("result: {}", session.result());
                Ok(())
            }
            "help" => {
                println!("{}", SHELL_HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            "" => Ok(()),
            other => {
                println!("Unknown command: {} (try `help`)", other);
                Ok(())
            }
        };
        report(outcome);

        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    session.stop();
    Ok(())
}
