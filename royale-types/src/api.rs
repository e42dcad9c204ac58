use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{Game, Guess, Hint, User};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateGameRequest {
    pub song_title: String,
    pub artist: String,
    pub opponent_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitGuessRequest {
    pub guess_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RespondGuessRequest {
    pub correct: bool,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RequestHintRequest {
    pub hint_request: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RespondHintRequest {
    pub hint_response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateNotesRequest {
    pub notes: String,
}

/// One row in the dashboard listing, with enough context to render a card
/// without a second fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameSummary {
    pub game: Game,
    pub creator_name: String,
    pub guesser_name: Option<String>,
    pub guess_count: u64,
    pub hint_count: u64,
    /// A guess or hint is sitting unanswered on this game.
    pub pending_action: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameList {
    pub created: Vec<GameSummary>,
    pub guessing: Vec<GameSummary>,
    /// Badge count: games where the viewer owes a response as creator.
    pub awaiting_my_response: u64,
    /// Badge count: games where the viewer awaits a verdict as guesser.
    pub awaiting_opponent: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameDetail {
    pub game: Game,
    pub creator_name: String,
    pub guesser_name: Option<String>,
    pub guesses: Vec<Guess>,
    pub hints: Vec<Hint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PintProgress {
    pub total_winnings_cents: i64,
    pub pint_goal_cents: i64,
    /// Percentage toward the goal, capped at 100, one decimal place.
    pub progress: f64,
    pub remaining_cents: i64,
    pub goal_reached: bool,
}

/// One solved game in a ranked stats list. The song is always revealed here
/// since only solved games qualify.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStatsEntry {
    pub game_id: Uuid,
    pub song_title: String,
    pub artist: String,
    pub current_prize_cents: i64,
    pub guess_count: u64,
    pub hint_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserStats {
    pub user_id: Uuid,
    pub display_name: String,
    pub total_winnings_cents: i64,
    /// Solved games the user took part in, either role.
    pub games_played: u64,
    /// Solved games won as the guesser.
    pub games_won: u64,
    /// Percentage, one decimal place. Zero when no games played.
    pub win_rate: f64,
    /// Mean guesses per solved game involving the user.
    pub average_guesses: f64,
    /// Top five solved games by combined guess and hint count.
    pub hardest_games: Vec<GameStatsEntry>,
    /// Top five solved games by total actions taken to finish.
    pub longest_games: Vec<GameStatsEntry>,
}
