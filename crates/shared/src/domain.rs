use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three gestures the server knows how to detect and play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not one of rock, paper, scissors")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    // Matching is exact: the detector reports lowercase names and anything
    // else (including "unknown" and the empty string) is outside the vocabulary.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Move::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownMove(value.to_string()))
    }
}

/// Winner tag reported once a game is decided.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Winner {
    Player,
    Computer,
    Other(String),
}

impl Winner {
    pub fn as_str(&self) -> &str {
        match self {
            Winner::Player => "player",
            Winner::Computer => "computer",
            Winner::Other(tag) => tag,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Winner::Player)
    }
}

impl From<String> for Winner {
    fn from(value: String) -> Self {
        match value.as_str() {
            "player" => Winner::Player,
            "computer" => Winner::Computer,
            _ => Winner::Other(value),
        }
    }
}

impl From<Winner> for String {
    fn from(value: Winner) -> Self {
        match value {
            Winner::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
