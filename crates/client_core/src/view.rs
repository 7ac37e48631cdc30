//! View model mirrored from server snapshots, plus the pure updates applied to it.

use chrono::{DateTime, Utc};
use shared::{
    domain::{Move, Winner},
    protocol::GameStatus,
};

use crate::layout::VideoHeightCap;

pub const INITIAL_RESULT_TEXT: &str = "Show your hand gesture to play!";
pub const MOVE_PLACEHOLDER: &str = "-";
pub const DEFAULT_LOCK_LABEL: &str = "Lock Move";
pub const MOVE_LOCKED_TEXT: &str = "Move locked! Playing round...";
pub const VIDEO_ERROR_TEXT: &str = "Error loading video feed. Please refresh the page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultColor {
    Neutral,
    PlayerWon,
    ComputerWon,
    Error,
}

impl ResultColor {
    pub fn hex(self) -> &'static str {
        match self {
            ResultColor::Neutral => "#3498db",
            ResultColor::PlayerWon => "#27ae60",
            ResultColor::ComputerWon | ResultColor::Error => "#e74c3c",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSize {
    Normal,
    Large,
}

impl ResultSize {
    pub fn css(self) -> &'static str {
        match self {
            ResultSize::Normal => "1.2rem",
            ResultSize::Large => "1.5rem",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultStyle {
    pub color: ResultColor,
    pub size: ResultSize,
}

impl ResultStyle {
    pub const DEFAULT: ResultStyle = ResultStyle {
        color: ResultColor::Neutral,
        size: ResultSize::Normal,
    };

    pub fn decided(winner: &Winner) -> Self {
        let color = if winner.is_player() {
            ResultColor::PlayerWon
        } else {
            ResultColor::ComputerWon
        };
        Self {
            color,
            size: ResultSize::Large,
        }
    }

    /// Styling for a snapshot: decided once the game is over and has a winner.
    pub fn for_game(game_active: bool, winner: Option<&Winner>) -> Self {
        match winner {
            Some(winner) if !game_active => Self::decided(winner),
            _ => Self::DEFAULT,
        }
    }
}

impl Default for ResultStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockButton {
    pub enabled: bool,
    pub label: String,
}

impl LockButton {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            label: DEFAULT_LOCK_LABEL.to_string(),
        }
    }

    pub fn for_move(player_move: Move) -> Self {
        Self {
            enabled: true,
            label: format!("Lock {player_move}"),
        }
    }

    pub fn for_status(status: &GameStatus) -> Self {
        status
            .lockable_move()
            .map(Self::for_move)
            .unwrap_or_else(Self::disabled)
    }
}

impl Default for LockButton {
    fn default() -> Self {
        Self::disabled()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub player_score: String,
    pub computer_score: String,
    pub result_text: String,
    pub result_style: ResultStyle,
    pub countdown_text: String,
    pub player_move_label: String,
    pub computer_move_label: String,
    pub lock_button: LockButton,
    pub video_max_height: VideoHeightCap,
    pub game_active: bool,
    pub winner: Option<Winner>,
    pub current_detected_move: String,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            player_score: "0".to_string(),
            computer_score: "0".to_string(),
            result_text: INITIAL_RESULT_TEXT.to_string(),
            result_style: ResultStyle::DEFAULT,
            countdown_text: String::new(),
            player_move_label: MOVE_PLACEHOLDER.to_string(),
            computer_move_label: MOVE_PLACEHOLDER.to_string(),
            lock_button: LockButton::disabled(),
            video_max_height: VideoHeightCap::None,
            game_active: true,
            winner: None,
            current_detected_move: String::new(),
            last_synced_at: None,
        }
    }
}

fn overwrite_if_present(target: &mut String, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        target.clear();
        target.push_str(value);
    }
}

impl ViewState {
    /// Mirrors a status snapshot. Result text and move labels keep their
    /// previous value when the snapshot leaves them empty.
    pub fn apply_snapshot(&mut self, status: &GameStatus, synced_at: DateTime<Utc>) {
        self.player_score = status.scores.player.to_string();
        self.computer_score = status.scores.computer.to_string();

        overwrite_if_present(&mut self.result_text, status.results.result.as_deref());
        overwrite_if_present(
            &mut self.player_move_label,
            status.results.player_move.as_deref(),
        );
        overwrite_if_present(
            &mut self.computer_move_label,
            status.results.computer_move.as_deref(),
        );

        self.current_detected_move = status.current_move.clone().unwrap_or_default();
        self.game_active = status.game_active;
        self.winner = status.reported_winner().cloned();

        self.lock_button = LockButton::for_status(status);
        self.result_style = ResultStyle::for_game(self.game_active, self.winner.as_ref());
        self.last_synced_at = Some(synced_at);
    }

    pub fn apply_move_locked(&mut self) {
        self.lock_button.enabled = false;
        self.countdown_text = MOVE_LOCKED_TEXT.to_string();
    }

    /// Restores every game field to its initial value. Layout and sync time
    /// are not game state and are kept.
    pub fn apply_reset(&mut self) {
        *self = Self {
            video_max_height: self.video_max_height,
            last_synced_at: self.last_synced_at,
            ..Self::default()
        };
    }

    pub fn apply_video_error(&mut self) {
        self.result_text = VIDEO_ERROR_TEXT.to_string();
        self.result_style.color = ResultColor::Error;
    }

    pub fn apply_layout(&mut self, cap: VideoHeightCap) {
        self.video_max_height = cap;
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
