use serde::{Deserialize, Serialize};

use crate::{
    domain::{Move, Winner},
    error::{ApiException, ErrorCode},
};

pub const ACK_STATUS_SUCCESS: &str = "success";
pub const ACK_STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player: u32,
    pub computer: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_move: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_move: Option<String>,
}

/// Full game state returned by `GET /game_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub scores: Scores,
    #[serde(default)]
    pub results: RoundResults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_move: Option<String>,
    pub can_lock: bool,
    pub game_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
}

impl GameStatus {
    /// The detected gesture, if it belongs to the move vocabulary.
    pub fn detected_move(&self) -> Option<Move> {
        self.current_move.as_deref()?.parse().ok()
    }

    /// The move a lock request would commit, if locking is currently allowed.
    pub fn lockable_move(&self) -> Option<Move> {
        if !self.can_lock {
            return None;
        }
        self.detected_move()
    }

    /// The winner tag, ignoring an empty tag.
    pub fn reported_winner(&self) -> Option<&Winner> {
        self.winner
            .as_ref()
            .filter(|winner| !winner.as_str().is_empty())
    }
}

/// Acknowledgement returned by the command endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandAck {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ACK_STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ACK_STATUS_ERROR.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ACK_STATUS_SUCCESS
    }

    /// Returns the server message on success, or the refusal as an exception.
    pub fn into_result(self) -> Result<Option<String>, ApiException> {
        if self.is_success() {
            return Ok(self.message);
        }
        if self.status == ACK_STATUS_ERROR {
            return Err(ApiException::new(
                ErrorCode::Rejected,
                self.message
                    .unwrap_or_else(|| "request rejected".to_string()),
            ));
        }
        Err(ApiException::new(
            ErrorCode::UnexpectedStatus,
            format!("unexpected acknowledgement status `{}`", self.status),
        ))
    }
}

/// Body of `POST /manual_play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPlayRequest {
    #[serde(rename = "move")]
    pub player_move: Move,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
