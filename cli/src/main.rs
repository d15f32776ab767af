use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use headtotoe_core::{BundledLevels, LevelNumber, LevelSource, SessionHost};
use headtotoe_protocol::{ClientMessage, ServerMessage, decode_client, encode_server};
use web_time::Instant;

use crate::command::Input;
use crate::levels::{DirLevelSource, Levels};

mod command;
mod config;
mod levels;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Match pairs of tiles before the countdown runs out", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level to start on
    #[arg(short, long, default_value_t = 1)]
    level: LevelNumber,

    /// Directory with level1.json, level2.json, ... instead of the bundled levels
    #[arg(long)]
    levels_dir: Option<PathBuf>,

    /// TOML file overriding delays and hint colors
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speak JSON lines on stdin/stdout instead of text commands
    #[arg(long)]
    json: bool,

    /// Let wall-clock time pass between inputs
    #[arg(long)]
    realtime: bool,
}

type Host = SessionHost<Levels>;

enum Flow {
    Continue,
    Quit,
}

/// Measures wall-clock time between inputs.
struct Pacer {
    last: Instant,
}

impl Pacer {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed
    }
}

fn apply(host: &mut Host, message: ClientMessage) -> (Flow, Option<ServerMessage>) {
    match message {
        ClientMessage::SelectTile { tile } => {
            let outcome = host.select_tile(tile);
            log::debug!("Select {} -> {:?}", tile, outcome);
        }
        ClientMessage::Hint => {
            let outcome = host.request_hint();
            log::debug!("Hint -> {:?}", outcome);
        }
        ClientMessage::SelectLevel { level } => {
            if let Err(err) = host.load_level(level) {
                return (
                    Flow::Continue,
                    Some(ServerMessage::LevelRejected {
                        level,
                        reason: err.to_string(),
                    }),
                );
            }
        }
        ClientMessage::Restart => {
            if let Err(err) = host.restart() {
                let level = host.session().map_or(0, |session| session.level());
                return (
                    Flow::Continue,
                    Some(ServerMessage::LevelRejected {
                        level,
                        reason: err.to_string(),
                    }),
                );
            }
        }
        ClientMessage::Advance { millis, generation } => {
            let elapsed = Duration::from_millis(millis);
            let outcome = match generation {
                Some(generation) => host.advance_stamped(generation, elapsed),
                None => host.advance(elapsed),
            };
            log::debug!("Advance {}ms -> {:?}", millis, outcome);
        }
        ClientMessage::Quit => return (Flow::Quit, None),
    }
    (Flow::Continue, None)
}

fn send(out: &mut impl Write, message: &ServerMessage) -> anyhow::Result<()> {
    writeln!(out, "{}", encode_server(message)?)?;
    out.flush()?;
    Ok(())
}

fn run_json(host: &mut Host, realtime: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut pacer = Pacer::new();

    if let Some(view) = host.view() {
        send(&mut stdout, &ServerMessage::Frame(render::frame(&view)))?;
    }

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if realtime {
            host.advance(pacer.lap());
        }

        let message = match decode_client(&line) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("Could not decode {:?}: {}", line, err);
                send(
                    &mut stdout,
                    &ServerMessage::Invalid {
                        reason: err.to_string(),
                    },
                )?;
                continue;
            }
        };

        let (flow, reply) = apply(host, message);
        if let Some(reply) = reply {
            send(&mut stdout, &reply)?;
        }
        if matches!(flow, Flow::Quit) {
            break;
        }
        if let Some(view) = host.view() {
            send(&mut stdout, &ServerMessage::Frame(render::frame(&view)))?;
        }
    }
    Ok(())
}

fn run_text(host: &mut Host, realtime: bool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut pacer = Pacer::new();

    writeln!(stdout, "{}\n", command::HELP)?;
    if let Some(view) = host.view() {
        write!(stdout, "{}", render::board(&view))?;
    }

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if realtime {
            host.advance(pacer.lap());
        }

        match command::parse(&line) {
            Ok(Input::Help) => {
                writeln!(stdout, "{}", command::HELP)?;
                continue;
            }
            Ok(Input::Show) => {}
            Ok(Input::Message(message)) => {
                let (flow, reply) = apply(host, message);
                if let Some(ServerMessage::LevelRejected { reason, .. }) = reply {
                    writeln!(stdout, "{reason}")?;
                }
                if matches!(flow, Flow::Quit) {
                    break;
                }
            }
            Err(err) => {
                writeln!(stdout, "{err}")?;
                continue;
            }
        }

        if let Some(view) = host.view() {
            write!(stdout, "{}", render::board(&view))?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let timings = config::load_timings(args.config.as_deref())?;
    let levels = match args.levels_dir {
        Some(dir) => Levels::Dir(DirLevelSource::new(dir)),
        None => Levels::Bundled(BundledLevels),
    };
    log::debug!("{} levels available", levels.level_count());

    let mut host = SessionHost::new(levels, timings, seed);
    if let Err(err) = host.load_level(args.level) {
        anyhow::bail!("Could not start level {}: {}", args.level, err);
    }

    if args.json {
        run_json(&mut host, args.realtime)
    } else {
        run_text(&mut host, args.realtime)
    }
}
