use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active, // Guessing in progress
    Solved, // Terminal, prize paid out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum GuessStatus {
    Pending,   // Waiting on the creator's verdict
    Correct,   // Solved the game
    Incorrect, // Game continues
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum HintStatus {
    Pending,  // Waiting on the creator's answer
    Answered, // Terminal
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Game {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub guesser_id: Option<Uuid>,
    /// `None` when redacted from the guesser's view of an active game.
    pub song_title: Option<String>,
    pub artist: Option<String>,
    pub starting_prize_cents: i64,
    pub current_prize_cents: i64,
    pub status: GameStatus,
    pub notes: String,
    pub created_at: String, // ISO 8601 string
    pub solved_at: Option<String>,
}

impl Game {
    /// Hide the song identity from the bound guesser while the game is still
    /// in play. The creator (and anyone viewing a solved game) sees everything.
    pub fn redacted_for(mut self, viewer_id: Uuid) -> Self {
        if self.status == GameStatus::Active && self.guesser_id == Some(viewer_id) {
            self.song_title = None;
            self.artist = None;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub guess_text: String,
    pub prize_before_cents: i64,
    pub prize_after_cents: i64,
    pub status: GuessStatus,
    pub feedback: Option<String>,
    pub created_at: String,
    pub responded_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Hint {
    pub id: Uuid,
    pub game_id: Uuid,
    pub hint_request: String,
    pub hint_response: Option<String>,
    pub prize_before_cents: i64,
    pub prize_after_cents: i64,
    pub status: HintStatus,
    pub created_at: String,
    pub responded_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(status: GameStatus, guesser: Option<Uuid>) -> Game {
        Game {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            guesser_id: guesser,
            song_title: Some("Dreams".to_string()),
            artist: Some("Fleetwood Mac".to_string()),
            starting_prize_cents: 5000,
            current_prize_cents: 5000,
            status,
            notes: String::new(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            solved_at: None,
        }
    }

    #[test]
    fn redaction_hides_song_from_active_guesser() {
        let guesser = Uuid::new_v4();
        let redacted = game(GameStatus::Active, Some(guesser)).redacted_for(guesser);
        assert!(redacted.song_title.is_none());
        assert!(redacted.artist.is_none());
    }

    #[test]
    fn redaction_keeps_song_for_creator() {
        let guesser = Uuid::new_v4();
        let g = game(GameStatus::Active, Some(guesser));
        let creator = g.creator_id;
        let viewed = g.redacted_for(creator);
        assert!(viewed.song_title.is_some());
    }

    #[test]
    fn redaction_reveals_song_once_solved() {
        let guesser = Uuid::new_v4();
        let viewed = game(GameStatus::Solved, Some(guesser)).redacted_for(guesser);
        assert_eq!(viewed.song_title.as_deref(), Some("Dreams"));
        assert_eq!(viewed.artist.as_deref(), Some("Fleetwood Mac"));
    }
}
