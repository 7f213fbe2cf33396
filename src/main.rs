// SPDX-License-Identifier: MIT
//
// vtprobe — an interactive harness for exercising terminal control sequences.
//
// This is the binary that wires the two crates together:
//
//   vtprobe-term    → termios input mode, stdin/resize sources, key tokenizer,
//                     control-sequence channel, event loop
//   vtprobe-session → modes, repeat counts, keymap, command line, layout
//
// The Session implements vtprobe-term's App trait. Each key flows through:
//
//   stdin → Tokenizer → Session::handle_key → Control → BufWriter<Stdout>
//
// and the event loop flushes once per key. Stdout is the terminal under test,
// so logging goes to a file (`--log-file`) or nowhere.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use vtprobe_session::{Session, SessionConfig};
use vtprobe_term::control::Control;
use vtprobe_term::event_loop::{EventLoop, Exit};

/// Drive a terminal through cursor, scroll-region, screen and title
/// sequences from the keyboard.
#[derive(Parser, Debug)]
#[command(name = "vtprobe", version, about)]
struct Args {
    /// Non-scrolling rows above the scroll region.
    #[arg(long, default_value_t = SessionConfig::default().top_margin)]
    top_margin: u16,

    /// Non-scrolling rows below the scroll region; the last one is the prompt.
    #[arg(long, default_value_t = SessionConfig::default().bottom_margin)]
    bottom_margin: u16,

    /// Row the cursor starts on (clamped into the scroll region).
    #[arg(long, default_value_t = SessionConfig::default().start_row)]
    start_row: u16,

    /// Write logs to this file. Without it nothing is logged.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `vtprobe_session=trace`. Defaults to
    /// `RUST_LOG`, then `info`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

impl Args {
    const fn session_config(&self) -> SessionConfig {
        SessionConfig {
            top_margin: self.top_margin,
            bottom_margin: self.bottom_margin,
            start_row: self.start_row,
        }
    }
}

/// Install a file-backed subscriber if `--log-file` was given.
///
/// The returned guard must live until exit so buffered lines are written.
fn configure_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    let Some(path) = &args.log_file else {
        return Ok(None);
    };

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log filter `{level}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = path
        .file_name()
        .with_context(|| format!("log file `{}` has no file name", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("cannot install the log subscriber")?;

    Ok(Some(guard))
}

fn run(args: &Args) -> Result<()> {
    let config = args.session_config();
    config.validate().context("invalid layout")?;

    let _log_guard = configure_logging(args)?;

    let mut event_loop = EventLoop::new().context("cannot start the terminal session")?;
    let control = Control::new(BufWriter::new(io::stdout()));
    let mut session = Session::new(control, config, event_loop.size());

    let exit = event_loop
        .run(&mut session)
        .context("terminal session failed")?;

    match exit {
        Exit::Quit => tracing::info!(reason = "quit", "exit"),
        Exit::InputClosed => tracing::info!(reason = "input closed", "exit"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("vtprobe: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_session_config() {
        let args = Args::parse_from(["vtprobe"]);
        assert_eq!(args.session_config(), SessionConfig::default());
        assert!(args.log_file.is_none());
    }

    #[test]
    fn margin_flags() {
        let args = Args::parse_from([
            "vtprobe",
            "--top-margin",
            "1",
            "--bottom-margin",
            "4",
            "--start-row",
            "5",
        ]);
        assert_eq!(
            args.session_config(),
            SessionConfig {
                top_margin: 1,
                bottom_margin: 4,
                start_row: 5,
            }
        );
    }

    #[test]
    fn no_log_file_installs_nothing() {
        let args = Args::parse_from(["vtprobe", "--log-level", "debug"]);
        assert!(configure_logging(&args).unwrap().is_none());
    }

    #[test]
    fn zero_bottom_margin_is_rejected_before_terminal_setup() {
        let args = Args::parse_from(["vtprobe", "--bottom-margin", "0"]);
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid layout: bottom margin"));
    }
}
