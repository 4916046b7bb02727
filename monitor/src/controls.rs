//! User controls: line commands on stdin plus process signals.

use std::io::BufRead;
use std::num::IntErrorKind;
use std::str::FromStr;

use tokio::signal;
use tokio::sync::mpsc;

use crate::session::Cadence;

pub const HELP: &str = "commands: start | stop | interval <1-10> | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    /// Already clamped to the selectable range.
    SetCadence(Cadence),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),

    #[error("`{0}` expects a whole number of seconds")]
    BadSeconds(String),
}

/// One line of user input, parsed.
pub type Control = Result<Command, ParseCommandError>;

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseCommandError::Empty);
        };

        match verb.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "stop" => Ok(Command::Stop),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "interval" | "cadence" => {
                let seconds = words
                    .next()
                    .and_then(parse_seconds)
                    .ok_or_else(|| ParseCommandError::BadSeconds(verb.to_owned()))?;
                // The selector only offers 1..=10.
                Ok(Command::SetCadence(Cadence::clamped(seconds)))
            }
            other => Err(ParseCommandError::Unknown(other.to_owned())),
        }
    }
}

/// Whole seconds from a user-typed number. Negative values become zero and
/// values too large for the integer type saturate, so the cadence clamp
/// still applies to them.
fn parse_seconds(word: &str) -> Option<u64> {
    match word.parse::<i64>() {
        Ok(n) => Some(n.max(0) as u64),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(u64::MAX),
            IntErrorKind::NegOverflow => Some(0),
            _ => None,
        },
    }
}

/// Reads stdin on a plain thread and forwards each non-blank line.
///
/// A blocking stdin read cannot be cancelled, so it must not live on the
/// runtime; the detached thread dies with the process. End of input only
/// ends the reader, the monitor keeps running until `quit` or a signal.
pub fn spawn_stdin_reader(tx: mpsc::Sender<Control>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                tracing::warn!("stdin read failed, controls disabled");
                return;
            };
            if line.trim().is_empty() {
                continue;
            }
            if tx.blocking_send(line.parse()).is_err() {
                return;
            }
        }
        tracing::debug!("stdin closed");
    });
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!("could not listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::warn!("could not listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
