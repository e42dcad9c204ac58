use std::collections::{HashMap, HashSet};

use sea_orm::{
    ActiveValue, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{games, guesses, hints, prelude::*, users};
use crate::repositories::user_repository::db_err;
use royale_core as rules;
use royale_types::{
    CreateGameRequest, Game, GameDetail, GameError, GameList, GameStatsEntry, GameSummary, Guess,
    Hint, UserStats,
};

/// All mutating game operations run as one transaction doing the
/// read-check-write sequence, so two concurrent actions can never both read
/// the same prize or pending state. The persisted row is the only source of
/// truth for the prize pool; nothing is cached between requests.
pub struct GameRepository {
    db: DatabaseConnection,
}

fn txn_err(err: TransactionError<GameError>) -> GameError {
    match err {
        TransactionError::Connection(e) => db_err(e),
        TransactionError::Transaction(e) => e,
    }
}

fn model_to_game(model: games::Model) -> Game {
    Game {
        id: model.id,
        creator_id: model.creator_id,
        guesser_id: model.guesser_id,
        song_title: Some(model.song_title),
        artist: Some(model.artist),
        starting_prize_cents: model.starting_prize_cents,
        current_prize_cents: model.current_prize_cents,
        status: model.status.into(),
        notes: model.notes,
        created_at: model.created_at.to_rfc3339(),
        solved_at: model.solved_at.map(|t| t.to_rfc3339()),
    }
}

fn model_to_guess(model: guesses::Model, user_name: Option<String>) -> Guess {
    Guess {
        id: model.id,
        game_id: model.game_id,
        user_id: model.user_id,
        user_name,
        guess_text: model.guess_text,
        prize_before_cents: model.prize_before_cents,
        prize_after_cents: model.prize_after_cents,
        status: model.status.into(),
        feedback: model.feedback,
        created_at: model.created_at.to_rfc3339(),
        responded_at: model.responded_at.map(|t| t.to_rfc3339()),
    }
}

fn model_to_hint(model: hints::Model) -> Hint {
    Hint {
        id: model.id,
        game_id: model.game_id,
        hint_request: model.hint_request,
        hint_response: model.hint_response,
        prize_before_cents: model.prize_before_cents,
        prize_after_cents: model.prize_after_cents,
        status: model.status.into(),
        created_at: model.created_at.to_rfc3339(),
        responded_at: model.responded_at.map(|t| t.to_rfc3339()),
    }
}

async fn load_game<C: ConnectionTrait>(conn: &C, game_id: Uuid) -> Result<games::Model, GameError> {
    Games::find_by_id(game_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| GameError::not_found("Game not found"))
}

/// Pending guesses plus pending hints on a game. The turn-serialization rule
/// allows at most one at any instant.
async fn pending_action_count<C: ConnectionTrait>(
    conn: &C,
    game_id: Uuid,
) -> Result<u64, GameError> {
    let pending_guesses = Guesses::find()
        .filter(guesses::Column::GameId.eq(game_id))
        .filter(guesses::Column::Status.eq(guesses::GuessStatus::Pending))
        .count(conn)
        .await
        .map_err(db_err)?;

    let pending_hints = Hints::find()
        .filter(hints::Column::GameId.eq(game_id))
        .filter(hints::Column::Status.eq(hints::HintStatus::Pending))
        .count(conn)
        .await
        .map_err(db_err)?;

    Ok(pending_guesses + pending_hints)
}

/// Terminal transition: stamp the game solved and credit whatever is left of
/// the pool to the bound guesser, in the same transaction as the caller.
async fn mark_solved<C: ConnectionTrait>(
    conn: &C,
    game: games::Model,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<games::Model, GameError> {
    let prize = game.current_prize_cents;
    let guesser_id = game.guesser_id;

    let mut game_update: games::ActiveModel = game.into();
    game_update.status = ActiveValue::Set(games::GameStatus::Solved);
    game_update.solved_at = ActiveValue::Set(Some(now.into()));
    let solved = Games::update(game_update).exec(conn).await.map_err(db_err)?;

    if let Some(guesser_id) = guesser_id {
        let user = Users::find_by_id(guesser_id)
            .one(conn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GameError::internal("Guesser account missing"))?;
        let new_total = user.total_winnings_cents + prize;
        let mut user_update: users::ActiveModel = user.into();
        user_update.total_winnings_cents = ActiveValue::Set(new_total);
        Users::update(user_update).exec(conn).await.map_err(db_err)?;

        tracing::info!(
            game_id = %solved.id,
            guesser_id = %guesser_id,
            prize_cents = prize,
            "game solved, prize credited"
        );
    }

    Ok(solved)
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_game(
        &self,
        creator_id: Uuid,
        request: &CreateGameRequest,
    ) -> Result<Game, GameError> {
        if request.song_title.trim().is_empty() || request.artist.trim().is_empty() {
            return Err(GameError::validation("Song title and artist are required"));
        }

        // Resolve the opponent before anything is persisted; a failed lookup
        // must leave no game row behind.
        let guesser_id = match request.opponent_email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => {
                let opponent = Users::find()
                    .filter(users::Column::Email.eq(email))
                    .one(&self.db)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| {
                        GameError::not_found(
                            "Opponent email not found. They need to register first!",
                        )
                    })?;
                if opponent.id == creator_id {
                    return Err(GameError::validation(
                        "You cannot create a game with yourself!",
                    ));
                }
                Some(opponent.id)
            }
            _ => None,
        };

        let game_model = games::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            creator_id: ActiveValue::Set(creator_id),
            guesser_id: ActiveValue::Set(guesser_id),
            song_title: ActiveValue::Set(request.song_title.trim().to_string()),
            artist: ActiveValue::Set(request.artist.trim().to_string()),
            starting_prize_cents: ActiveValue::Set(rules::GAME_STARTING_PRIZE_CENTS),
            current_prize_cents: ActiveValue::Set(rules::GAME_STARTING_PRIZE_CENTS),
            status: ActiveValue::Set(games::GameStatus::Active),
            notes: ActiveValue::Set(String::new()),
            created_at: ActiveValue::Set(chrono::Utc::now().into()),
            solved_at: ActiveValue::Set(None),
        };

        let saved = Games::insert(game_model)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        let created = load_game(&self.db, saved.last_insert_id).await?;

        Ok(model_to_game(created))
    }

    /// Record a guess in one transaction: bind the guesser seat if this is
    /// the first actor to take it, charge the pool (first guess free, halves
    /// thereafter), and append the audit row.
    pub async fn submit_guess(
        &self,
        game_id: Uuid,
        actor_id: Uuid,
        guess_text: &str,
    ) -> Result<Game, GameError> {
        let text = guess_text.trim().to_string();
        if text.is_empty() {
            return Err(GameError::validation("Guess text is required"));
        }

        let updated = self
            .db
            .transaction::<_, games::Model, GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_active(&game.status.clone().into())?;
                    let binding = rules::resolve_guesser(game.creator_id, game.guesser_id, actor_id)?;
                    rules::ensure_no_pending(pending_action_count(txn, game_id).await?)?;

                    let prior_guesses = Guesses::find()
                        .filter(guesses::Column::GameId.eq(game_id))
                        .count(txn)
                        .await
                        .map_err(db_err)?;

                    let prize_before = game.current_prize_cents;
                    let prize_after = rules::prize_after_guess(prior_guesses, prize_before);

                    let guess_model = guesses::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        game_id: ActiveValue::Set(game_id),
                        user_id: ActiveValue::Set(actor_id),
                        guess_text: ActiveValue::Set(text),
                        prize_before_cents: ActiveValue::Set(prize_before),
                        prize_after_cents: ActiveValue::Set(prize_after),
                        status: ActiveValue::Set(guesses::GuessStatus::Pending),
                        feedback: ActiveValue::Set(None),
                        created_at: ActiveValue::Set(chrono::Utc::now().into()),
                        responded_at: ActiveValue::Set(None),
                    };
                    Guesses::insert(guess_model).exec(txn).await.map_err(db_err)?;

                    let mut game_update: games::ActiveModel = game.into();
                    game_update.current_prize_cents = ActiveValue::Set(prize_after);
                    if binding == rules::GuesserBinding::NewlyBound {
                        game_update.guesser_id = ActiveValue::Set(Some(actor_id));
                    }
                    Games::update(game_update).exec(txn).await.map_err(db_err)
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(model_to_game(updated).redacted_for(actor_id))
    }

    /// Creator's verdict on a pending guess. Correct ends the game and pays
    /// out; incorrect hands the turn back to the guesser.
    pub async fn respond_guess(
        &self,
        game_id: Uuid,
        guess_id: Uuid,
        actor_id: Uuid,
        correct: bool,
        feedback: Option<String>,
    ) -> Result<Game, GameError> {
        let updated = self
            .db
            .transaction::<_, games::Model, GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_creator(game.creator_id, actor_id)?;
                    rules::ensure_active(&game.status.clone().into())?;

                    let guess = Guesses::find_by_id(guess_id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .filter(|g| g.game_id == game_id)
                        .ok_or_else(|| GameError::not_found("Guess not found"))?;
                    rules::ensure_guess_pending(&guess.status.clone().into())?;

                    let now = chrono::Utc::now();
                    let mut guess_update: guesses::ActiveModel = guess.into();
                    guess_update.status = ActiveValue::Set(rules::guess_verdict(correct).into());
                    guess_update.feedback = ActiveValue::Set(feedback);
                    guess_update.responded_at = ActiveValue::Set(Some(now.into()));
                    Guesses::update(guess_update).exec(txn).await.map_err(db_err)?;

                    if correct {
                        mark_solved(txn, game, now).await
                    } else {
                        Ok(game)
                    }
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(model_to_game(updated))
    }

    /// Hints are never free: the pool halves the moment the request lands,
    /// before the creator has answered anything.
    pub async fn request_hint(
        &self,
        game_id: Uuid,
        actor_id: Uuid,
        hint_request: &str,
    ) -> Result<Game, GameError> {
        let text = hint_request.trim().to_string();
        if text.is_empty() {
            return Err(GameError::validation("Hint request text is required"));
        }

        let updated = self
            .db
            .transaction::<_, games::Model, GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_active(&game.status.clone().into())?;
                    rules::ensure_bound_guesser(game.guesser_id, actor_id)?;
                    rules::ensure_no_pending(pending_action_count(txn, game_id).await?)?;

                    let prize_before = game.current_prize_cents;
                    let prize_after = rules::prize_after_hint(prize_before);

                    let hint_model = hints::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        game_id: ActiveValue::Set(game_id),
                        hint_request: ActiveValue::Set(text),
                        hint_response: ActiveValue::Set(None),
                        prize_before_cents: ActiveValue::Set(prize_before),
                        prize_after_cents: ActiveValue::Set(prize_after),
                        status: ActiveValue::Set(hints::HintStatus::Pending),
                        created_at: ActiveValue::Set(chrono::Utc::now().into()),
                        responded_at: ActiveValue::Set(None),
                    };
                    Hints::insert(hint_model).exec(txn).await.map_err(db_err)?;

                    let mut game_update: games::ActiveModel = game.into();
                    game_update.current_prize_cents = ActiveValue::Set(prize_after);
                    Games::update(game_update).exec(txn).await.map_err(db_err)
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(model_to_game(updated).redacted_for(actor_id))
    }

    /// The creator answers a pending hint. The prize was already charged at
    /// request time and does not move again here.
    pub async fn respond_hint(
        &self,
        game_id: Uuid,
        hint_id: Uuid,
        actor_id: Uuid,
        hint_response: &str,
    ) -> Result<Game, GameError> {
        let text = hint_response.trim().to_string();
        if text.is_empty() {
            return Err(GameError::validation("Hint response text is required"));
        }

        let updated = self
            .db
            .transaction::<_, games::Model, GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_creator(game.creator_id, actor_id)?;
                    rules::ensure_active(&game.status.clone().into())?;

                    let hint = Hints::find_by_id(hint_id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .filter(|h| h.game_id == game_id)
                        .ok_or_else(|| GameError::not_found("Hint not found"))?;
                    rules::ensure_hint_pending(&hint.status.clone().into())?;

                    let mut hint_update: hints::ActiveModel = hint.into();
                    hint_update.hint_response = ActiveValue::Set(Some(text));
                    hint_update.status = ActiveValue::Set(hints::HintStatus::Answered);
                    hint_update.responded_at = ActiveValue::Set(Some(chrono::Utc::now().into()));
                    Hints::update(hint_update).exec(txn).await.map_err(db_err)?;

                    Ok(game)
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(model_to_game(updated))
    }

    /// Creator-initiated terminal path: no guess involved, the remaining pool
    /// still goes to the guesser if one is bound.
    pub async fn solve(&self, game_id: Uuid, actor_id: Uuid) -> Result<Game, GameError> {
        let updated = self
            .db
            .transaction::<_, games::Model, GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_creator(game.creator_id, actor_id)?;
                    rules::ensure_active(&game.status.clone().into())?;
                    mark_solved(txn, game, chrono::Utc::now()).await
                })
            })
            .await
            .map_err(txn_err)?;

        Ok(model_to_game(updated))
    }

    /// Free-text overwrite by either participant; no prize or status change.
    pub async fn update_notes(
        &self,
        game_id: Uuid,
        actor_id: Uuid,
        notes: &str,
    ) -> Result<Game, GameError> {
        let game = load_game(&self.db, game_id).await?;
        rules::ensure_participant(game.creator_id, game.guesser_id, actor_id)?;

        let mut game_update: games::ActiveModel = game.into();
        game_update.notes = ActiveValue::Set(notes.to_string());
        let updated = Games::update(game_update)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model_to_game(updated).redacted_for(actor_id))
    }

    /// Irreversible: removes the game and its full guess/hint audit trail.
    /// Winnings already credited stay credited.
    pub async fn delete_game(&self, game_id: Uuid, actor_id: Uuid) -> Result<(), GameError> {
        self.db
            .transaction::<_, (), GameError>(move |txn| {
                Box::pin(async move {
                    let game = load_game(txn, game_id).await?;
                    rules::ensure_creator(game.creator_id, actor_id)?;

                    Guesses::delete_many()
                        .filter(guesses::Column::GameId.eq(game_id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    Hints::delete_many()
                        .filter(hints::Column::GameId.eq(game_id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    Games::delete_by_id(game_id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;

                    Ok(())
                })
            })
            .await
            .map_err(txn_err)
    }

    /// Dashboard listing: the viewer's games split by role, newest first,
    /// with counterparty names, action counts, and notification badges.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<GameList, GameError> {
        let games = Games::find()
            .filter(
                Condition::any()
                    .add(games::Column::CreatorId.eq(user_id))
                    .add(games::Column::GuesserId.eq(user_id)),
            )
            .order_by_desc(games::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let names = self.display_names(&games).await?;

        let mut created = Vec::new();
        let mut guessing = Vec::new();
        let mut awaiting_my_response = 0;
        let mut awaiting_opponent = 0;

        for game in games {
            let guess_count = Guesses::find()
                .filter(guesses::Column::GameId.eq(game.id))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            let hint_count = Hints::find()
                .filter(hints::Column::GameId.eq(game.id))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            let pending_action = pending_action_count(&self.db, game.id).await? > 0;

            let is_creator = game.creator_id == user_id;
            if pending_action {
                if is_creator {
                    awaiting_my_response += 1;
                } else {
                    awaiting_opponent += 1;
                }
            }

            let summary = GameSummary {
                creator_name: names.get(&game.creator_id).cloned().unwrap_or_default(),
                guesser_name: game.guesser_id.and_then(|id| names.get(&id).cloned()),
                guess_count,
                hint_count,
                pending_action,
                game: model_to_game(game).redacted_for(user_id),
            };

            if is_creator {
                created.push(summary);
            } else {
                guessing.push(summary);
            }
        }

        Ok(GameList {
            created,
            guessing,
            awaiting_my_response,
            awaiting_opponent,
        })
    }

    /// Full game view with the ordered guess and hint trail. Participants
    /// only; the guesser sees the song identity redacted until the solve.
    pub async fn detail(&self, game_id: Uuid, viewer_id: Uuid) -> Result<GameDetail, GameError> {
        let game = load_game(&self.db, game_id).await?;
        rules::ensure_participant(game.creator_id, game.guesser_id, viewer_id)?;

        let names = self.display_names(std::slice::from_ref(&game)).await?;

        let guess_models = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .order_by_asc(guesses::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let hint_models = Hints::find()
            .filter(hints::Column::GameId.eq(game_id))
            .order_by_asc(hints::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let guesser_name = game.guesser_id.and_then(|id| names.get(&id).cloned());
        let guesses = guess_models
            .into_iter()
            .map(|model| {
                let user_name = names.get(&model.user_id).cloned();
                model_to_guess(model, user_name)
            })
            .collect();

        Ok(GameDetail {
            creator_name: names.get(&game.creator_id).cloned().unwrap_or_default(),
            guesser_name,
            guesses,
            hints: hint_models.into_iter().map(model_to_hint).collect(),
            game: model_to_game(game).redacted_for(viewer_id),
        })
    }

    /// Per-user record over solved games, either role.
    pub async fn stats_for_user(&self, user_id: Uuid) -> Result<UserStats, GameError> {
        let user = Users::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| GameError::not_found("User not found"))?;

        let solved = Games::find()
            .filter(games::Column::Status.eq(games::GameStatus::Solved))
            .filter(
                Condition::any()
                    .add(games::Column::CreatorId.eq(user_id))
                    .add(games::Column::GuesserId.eq(user_id)),
            )
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let games_played = solved.len() as u64;
        let games_won = solved
            .iter()
            .filter(|g| g.guesser_id == Some(user_id))
            .count() as u64;

        let mut total_guesses = 0;
        let mut entries = Vec::with_capacity(solved.len());
        for game in &solved {
            let guess_count = Guesses::find()
                .filter(guesses::Column::GameId.eq(game.id))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            let hint_count = Hints::find()
                .filter(hints::Column::GameId.eq(game.id))
                .count(&self.db)
                .await
                .map_err(db_err)?;
            total_guesses += guess_count;

            entries.push(GameStatsEntry {
                game_id: game.id,
                song_title: game.song_title.clone(),
                artist: game.artist.clone(),
                current_prize_cents: game.current_prize_cents,
                guess_count,
                hint_count,
            });
        }

        // Both rankings order by total actions, most demanding games first.
        entries.sort_by(|a, b| {
            (b.guess_count + b.hint_count).cmp(&(a.guess_count + a.hint_count))
        });
        entries.truncate(5);
        let hardest_games = entries.clone();
        let longest_games = entries;

        let round1 = |v: f64| (v * 10.0).round() / 10.0;
        let win_rate = if games_played > 0 {
            round1(games_won as f64 / games_played as f64 * 100.0)
        } else {
            0.0
        };
        let average_guesses = if games_played > 0 {
            round1(total_guesses as f64 / games_played as f64)
        } else {
            0.0
        };

        Ok(UserStats {
            user_id: user.id,
            display_name: user.display_name,
            total_winnings_cents: user.total_winnings_cents,
            games_played,
            games_won,
            win_rate,
            average_guesses,
            hardest_games,
            longest_games,
        })
    }

    async fn display_names(
        &self,
        games: &[games::Model],
    ) -> Result<HashMap<Uuid, String>, GameError> {
        let mut ids: HashSet<Uuid> = HashSet::new();
        for game in games {
            ids.insert(game.creator_id);
            if let Some(guesser_id) = game.guesser_id {
                ids.insert(guesser_id);
            }
        }

        let users = Users::find()
            .filter(users::Column::Id.is_in(ids.into_iter().collect::<Vec<_>>()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(users.into_iter().map(|u| (u.id, u.display_name)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::UserRepository;
    use migration::{Migrator, MigratorTrait};
    use royale_types::{GameStatus, GuessStatus, HintStatus};

    struct TestSetup {
        games: GameRepository,
        users: UserRepository,
        creator: Uuid,
        guesser: Uuid,
    }

    async fn setup() -> TestSetup {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let users = UserRepository::new(db.clone());
        let creator = users
            .create_user("creator@example.com", "hash", "Creator")
            .await
            .unwrap();
        let guesser = users
            .create_user("guesser@example.com", "hash", "Guesser")
            .await
            .unwrap();
        TestSetup {
            games: GameRepository::new(db),
            users,
            creator: creator.id,
            guesser: guesser.id,
        }
    }

    fn create_request(opponent_email: Option<&str>) -> CreateGameRequest {
        CreateGameRequest {
            song_title: "Dreams".to_string(),
            artist: "Fleetwood Mac".to_string(),
            opponent_email: opponent_email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_game_with_opponent() {
        let t = setup().await;

        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        assert_eq!(game.creator_id, t.creator);
        assert_eq!(game.guesser_id, Some(t.guesser));
        assert_eq!(game.starting_prize_cents, 5_000);
        assert_eq!(game.current_prize_cents, 5_000);
        assert_eq!(game.status, GameStatus::Active);
    }

    #[tokio::test]
    async fn test_create_game_unknown_opponent_persists_nothing() {
        let t = setup().await;

        let result = t
            .games
            .create_game(t.creator, &create_request(Some("stranger@example.com")))
            .await;
        assert!(matches!(result, Err(GameError::NotFound(_))));

        let listed = t.games.list_for_user(t.creator).await.unwrap();
        assert!(listed.created.is_empty());
    }

    #[tokio::test]
    async fn test_create_game_with_self_rejected() {
        let t = setup().await;

        let result = t
            .games
            .create_game(t.creator, &create_request(Some("creator@example.com")))
            .await;
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_game_requires_song_and_artist() {
        let t = setup().await;

        let request = CreateGameRequest {
            song_title: "  ".to_string(),
            artist: "Someone".to_string(),
            opponent_email: None,
        };
        let result = t.games.create_game(t.creator, &request).await;
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[tokio::test]
    async fn test_first_guess_is_free_and_binds_guesser() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(None))
            .await
            .unwrap();

        let after = t
            .games
            .submit_guess(game.id, t.guesser, "Go Your Own Way")
            .await
            .unwrap();

        assert_eq!(after.current_prize_cents, 5_000);
        assert_eq!(after.guesser_id, Some(t.guesser));
    }

    #[tokio::test]
    async fn test_creator_cannot_guess_own_game() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(None))
            .await
            .unwrap();

        let result = t.games.submit_guess(game.id, t.creator, "Dreams").await;
        assert!(matches!(result, Err(GameError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_pending_guess_blocks_further_actions() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        t.games
            .submit_guess(game.id, t.guesser, "First try")
            .await
            .unwrap();

        let second = t.games.submit_guess(game.id, t.guesser, "Second try").await;
        assert!(matches!(second, Err(GameError::Conflict(_))));

        let hint = t.games.request_hint(game.id, t.guesser, "What decade?").await;
        assert!(matches!(hint, Err(GameError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_full_game_scenario() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        // First guess is free.
        let after_first = t
            .games
            .submit_guess(game.id, t.guesser, "Landslide")
            .await
            .unwrap();
        assert_eq!(after_first.current_prize_cents, 5_000);

        let detail = t.games.detail(game.id, t.creator).await.unwrap();
        let first_guess_id = detail.guesses[0].id;

        // Creator marks it incorrect; game stays active.
        let after_verdict = t
            .games
            .respond_guess(game.id, first_guess_id, t.creator, false, Some("Not even close".to_string()))
            .await
            .unwrap();
        assert_eq!(after_verdict.status, GameStatus::Active);

        // Hint halves: 5000 -> 2500.
        let after_hint = t
            .games
            .request_hint(game.id, t.guesser, "What decade is it from?")
            .await
            .unwrap();
        assert_eq!(after_hint.current_prize_cents, 2_500);

        let detail = t.games.detail(game.id, t.creator).await.unwrap();
        let hint_id = detail.hints[0].id;
        t.games
            .respond_hint(game.id, hint_id, t.creator, "The seventies")
            .await
            .unwrap();

        // Second guess halves: 2500 -> 1250.
        let after_second = t
            .games
            .submit_guess(game.id, t.guesser, "Dreams")
            .await
            .unwrap();
        assert_eq!(after_second.current_prize_cents, 1_250);

        let detail = t.games.detail(game.id, t.creator).await.unwrap();
        let second_guess_id = detail.guesses[1].id;

        // Correct verdict solves the game and pays out.
        let solved = t
            .games
            .respond_guess(game.id, second_guess_id, t.creator, true, None)
            .await
            .unwrap();
        assert_eq!(solved.status, GameStatus::Solved);
        assert!(solved.solved_at.is_some());

        let guesser = t.users.find_by_id(t.guesser).await.unwrap().unwrap();
        assert_eq!(guesser.total_winnings_cents, 1_250);
        assert_eq!(t.users.total_winnings().await.unwrap(), 1_250);

        // Audit trail is complete and terminal.
        let detail = t.games.detail(game.id, t.guesser).await.unwrap();
        assert_eq!(detail.guesses.len(), 2);
        assert_eq!(detail.guesses[0].status, GuessStatus::Incorrect);
        assert_eq!(detail.guesses[0].feedback.as_deref(), Some("Not even close"));
        assert_eq!(detail.guesses[1].status, GuessStatus::Correct);
        assert_eq!(detail.hints[0].status, HintStatus::Answered);
        // Solved game reveals the song to the guesser.
        assert_eq!(detail.game.song_title.as_deref(), Some("Dreams"));
    }

    #[tokio::test]
    async fn test_solved_game_rejects_play_actions() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games.solve(game.id, t.creator).await.unwrap();

        let guess = t.games.submit_guess(game.id, t.guesser, "Too late").await;
        assert!(matches!(guess, Err(GameError::Conflict(_))));

        let hint = t.games.request_hint(game.id, t.guesser, "Too late").await;
        assert!(matches!(hint, Err(GameError::Conflict(_))));

        let again = t.games.solve(game.id, t.creator).await;
        assert!(matches!(again, Err(GameError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_direct_solve_credits_bound_guesser() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let solved = t.games.solve(game.id, t.creator).await.unwrap();
        assert_eq!(solved.status, GameStatus::Solved);

        let guesser = t.users.find_by_id(t.guesser).await.unwrap().unwrap();
        assert_eq!(guesser.total_winnings_cents, 5_000);
    }

    #[tokio::test]
    async fn test_direct_solve_without_guesser_credits_nobody() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(None))
            .await
            .unwrap();

        t.games.solve(game.id, t.creator).await.unwrap();
        assert_eq!(t.users.total_winnings().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_only_creator_can_solve() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let result = t.games.solve(game.id, t.guesser).await;
        assert!(matches!(result, Err(GameError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_hint_requires_bound_guesser() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(None))
            .await
            .unwrap();

        // No guesser bound yet; hints do not bind lazily.
        let result = t.games.request_hint(game.id, t.guesser, "Any clue?").await;
        assert!(matches!(result, Err(GameError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_respond_hint_leaves_prize_alone() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let after_hint = t
            .games
            .request_hint(game.id, t.guesser, "Band or solo artist?")
            .await
            .unwrap();
        assert_eq!(after_hint.current_prize_cents, 2_500);

        let detail = t.games.detail(game.id, t.creator).await.unwrap();
        let after_response = t
            .games
            .respond_hint(game.id, detail.hints[0].id, t.creator, "A band")
            .await
            .unwrap();
        assert_eq!(after_response.current_prize_cents, 2_500);

        let answered_twice = t
            .games
            .respond_hint(game.id, detail.hints[0].id, t.creator, "Still a band")
            .await;
        assert!(matches!(answered_twice, Err(GameError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_notes_editable_by_both_participants_only() {
        let t = setup().await;
        let outsider = t
            .users
            .create_user("outsider@example.com", "hash", "Outsider")
            .await
            .unwrap();
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let updated = t
            .games
            .update_notes(game.id, t.guesser, "left a voicemail clue")
            .await
            .unwrap();
        assert_eq!(updated.notes, "left a voicemail clue");

        let denied = t.games.update_notes(game.id, outsider.id, "hacked").await;
        assert!(matches!(denied, Err(GameError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_delete_game_cascades_children() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games
            .submit_guess(game.id, t.guesser, "A guess")
            .await
            .unwrap();

        let denied = t.games.delete_game(game.id, t.guesser).await;
        assert!(matches!(denied, Err(GameError::Authorization(_))));

        t.games.delete_game(game.id, t.creator).await.unwrap();

        let gone = t.games.detail(game.id, t.creator).await;
        assert!(matches!(gone, Err(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_detail_redacts_song_from_active_guesser() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let guesser_view = t.games.detail(game.id, t.guesser).await.unwrap();
        assert!(guesser_view.game.song_title.is_none());
        assert!(guesser_view.game.artist.is_none());

        let creator_view = t.games.detail(game.id, t.creator).await.unwrap();
        assert_eq!(creator_view.game.song_title.as_deref(), Some("Dreams"));
    }

    #[tokio::test]
    async fn test_detail_hidden_from_outsiders() {
        let t = setup().await;
        let outsider = t
            .users
            .create_user("outsider@example.com", "hash", "Outsider")
            .await
            .unwrap();
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let result = t.games.detail(game.id, outsider.id).await;
        assert!(matches!(result, Err(GameError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_list_splits_roles_and_counts_badges() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games
            .submit_guess(game.id, t.guesser, "A guess")
            .await
            .unwrap();

        let creator_list = t.games.list_for_user(t.creator).await.unwrap();
        assert_eq!(creator_list.created.len(), 1);
        assert!(creator_list.guessing.is_empty());
        assert_eq!(creator_list.awaiting_my_response, 1);
        assert_eq!(creator_list.created[0].guess_count, 1);
        assert_eq!(creator_list.created[0].guesser_name.as_deref(), Some("Guesser"));

        let guesser_list = t.games.list_for_user(t.guesser).await.unwrap();
        assert_eq!(guesser_list.guessing.len(), 1);
        assert!(guesser_list.created.is_empty());
        assert_eq!(guesser_list.awaiting_opponent, 1);
        // The guesser's listing never leaks the song.
        assert!(guesser_list.guessing[0].game.song_title.is_none());
    }

    #[tokio::test]
    async fn test_stats_for_user() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games
            .submit_guess(game.id, t.guesser, "Dreams")
            .await
            .unwrap();
        let detail = t.games.detail(game.id, t.creator).await.unwrap();
        t.games
            .respond_guess(game.id, detail.guesses[0].id, t.creator, true, None)
            .await
            .unwrap();

        let stats = t.games.stats_for_user(t.guesser).await.unwrap();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.win_rate, 100.0);
        assert_eq!(stats.average_guesses, 1.0);
        assert_eq!(stats.total_winnings_cents, 5_000);

        let creator_stats = t.games.stats_for_user(t.creator).await.unwrap();
        assert_eq!(creator_stats.games_played, 1);
        assert_eq!(creator_stats.games_won, 0);
        assert_eq!(creator_stats.win_rate, 0.0);

        let missing = t.games.stats_for_user(Uuid::new_v4()).await;
        assert!(matches!(missing, Err(GameError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stats_rank_solved_games_by_action_count() {
        let t = setup().await;

        // Solved in one guess: a single action.
        let quick = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games
            .submit_guess(quick.id, t.guesser, "Dreams")
            .await
            .unwrap();
        let detail = t.games.detail(quick.id, t.creator).await.unwrap();
        t.games
            .respond_guess(quick.id, detail.guesses[0].id, t.creator, true, None)
            .await
            .unwrap();

        // Two guesses and a hint: three actions, ranks first.
        let grind = t
            .games
            .create_game(
                t.creator,
                &CreateGameRequest {
                    song_title: "Hotel California".to_string(),
                    artist: "Eagles".to_string(),
                    opponent_email: Some("guesser@example.com".to_string()),
                },
            )
            .await
            .unwrap();
        t.games
            .submit_guess(grind.id, t.guesser, "Take It Easy")
            .await
            .unwrap();
        let detail = t.games.detail(grind.id, t.creator).await.unwrap();
        t.games
            .respond_guess(grind.id, detail.guesses[0].id, t.creator, false, None)
            .await
            .unwrap();
        t.games
            .request_hint(grind.id, t.guesser, "Which coast?")
            .await
            .unwrap();
        let detail = t.games.detail(grind.id, t.creator).await.unwrap();
        t.games
            .respond_hint(grind.id, detail.hints[0].id, t.creator, "West")
            .await
            .unwrap();
        t.games
            .submit_guess(grind.id, t.guesser, "Hotel California")
            .await
            .unwrap();
        let detail = t.games.detail(grind.id, t.creator).await.unwrap();
        t.games
            .respond_guess(grind.id, detail.guesses[1].id, t.creator, true, None)
            .await
            .unwrap();

        // Still active, so it never appears in the rankings.
        let open = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();
        t.games
            .submit_guess(open.id, t.guesser, "Rhiannon")
            .await
            .unwrap();

        let stats = t.games.stats_for_user(t.guesser).await.unwrap();
        assert_eq!(stats.hardest_games.len(), 2);
        assert_eq!(stats.hardest_games[0].game_id, grind.id);
        assert_eq!(stats.hardest_games[0].song_title, "Hotel California");
        assert_eq!(stats.hardest_games[0].guess_count, 2);
        assert_eq!(stats.hardest_games[0].hint_count, 1);
        // Free first guess, hint to 2500, second guess to 1250.
        assert_eq!(stats.hardest_games[0].current_prize_cents, 1_250);
        assert_eq!(stats.hardest_games[1].game_id, quick.id);
        assert_eq!(stats.longest_games.len(), 2);
        assert_eq!(stats.longest_games[0].game_id, grind.id);
    }

    #[tokio::test]
    async fn test_prize_never_exceeds_starting_value() {
        let t = setup().await;
        let game = t
            .games
            .create_game(t.creator, &create_request(Some("guesser@example.com")))
            .await
            .unwrap();

        let mut previous = game.starting_prize_cents;
        for round in 0..4 {
            let after_guess = t
                .games
                .submit_guess(game.id, t.guesser, &format!("guess {}", round))
                .await
                .unwrap();
            assert!(after_guess.current_prize_cents <= previous);
            previous = after_guess.current_prize_cents;

            let detail = t.games.detail(game.id, t.creator).await.unwrap();
            let last_guess = detail.guesses.last().unwrap();
            t.games
                .respond_guess(game.id, last_guess.id, t.creator, false, None)
                .await
                .unwrap();
        }

        // 5000 (free), 2500, 1250, 625
        assert_eq!(previous, 625);
    }
}
