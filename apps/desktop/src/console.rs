//! Line commands typed by the player and the text rendering of the view.

use std::{fmt::Write as _, str::FromStr};

use client_core::{VideoHeightCap, ViewState, Viewport};
use shared::domain::{Move, UnknownMove};
use thiserror::Error;

pub const HELP: &str = "commands: lock | reset | play <rock|paper|scissors> | resize <width> <height> | refresh | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Lock,
    Reset,
    Play(Move),
    Resize(Viewport),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Move(#[from] UnknownMove),
}

impl FromStr for ConsoleCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(ParseCommandError::Usage(HELP));
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("lock", []) => ConsoleCommand::Lock,
            ("reset", []) => ConsoleCommand::Reset,
            ("refresh", []) => ConsoleCommand::Refresh,
            ("help", []) => ConsoleCommand::Help,
            ("quit" | "exit", []) => ConsoleCommand::Quit,
            ("play", [player_move]) => ConsoleCommand::Play(player_move.parse()?),
            ("play", _) => return Err(ParseCommandError::Usage("play <rock|paper|scissors>")),
            ("resize", [width, height]) => {
                match (width.parse::<u32>(), height.parse::<u32>()) {
                    (Ok(width), Ok(height)) => ConsoleCommand::Resize(Viewport::new(width, height)),
                    _ => return Err(ParseCommandError::Usage("resize <width> <height>")),
                }
            }
            ("resize", _) => return Err(ParseCommandError::Usage("resize <width> <height>")),
            ("lock" | "reset" | "refresh" | "help" | "quit" | "exit", _) => {
                return Err(ParseCommandError::Usage(HELP))
            }
            _ => return Err(ParseCommandError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

/// Renders the parts of the view a player can see. Sync timestamps are left
/// out so that identical snapshots render identically.
pub fn render_view(view: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Rock Paper Scissors ==");
    let _ = writeln!(
        out,
        "Player {} : {} Computer",
        view.player_score, view.computer_score
    );
    let _ = writeln!(
        out,
        "Result: {} [{} {}]",
        view.result_text,
        view.result_style.color.hex(),
        view.result_style.size.css()
    );
    let _ = writeln!(
        out,
        "Moves: you {} / computer {}",
        view.player_move_label, view.computer_move_label
    );
    if !view.countdown_text.is_empty() {
        let _ = writeln!(out, "{}", view.countdown_text);
    }
    let _ = writeln!(
        out,
        "[{}] {}",
        view.lock_button.label,
        if view.lock_button.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    match view.video_max_height {
        VideoHeightCap::Max(height) => {
            let _ = write!(out, "Video: max-height {height}px");
        }
        VideoHeightCap::None => {
            let _ = write!(out, "Video: uncapped");
        }
    }
    if view.last_synced_at.is_none() {
        let _ = write!(out, "\n(waiting for the game server)");
    }
    out
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
