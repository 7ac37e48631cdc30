use std::fmt;

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    LockMove,
    ResetGame,
    ManualPlay,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::LockMove => "lock_move",
            CommandKind::ResetGame => "reset_game",
            CommandKind::ManualPlay => "manual_play",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{command} request failed: {source}")]
    Request {
        command: CommandKind,
        source: anyhow::Error,
    },
    #[error("{command} rejected by server: {source}")]
    Rejected {
        command: CommandKind,
        source: ApiException,
    },
}

impl CommandError {
    pub fn command(&self) -> CommandKind {
        match self {
            CommandError::Request { command, .. } | CommandError::Rejected { command, .. } => {
                *command
            }
        }
    }
}
