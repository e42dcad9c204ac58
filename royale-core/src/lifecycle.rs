use uuid::Uuid;

use royale_types::{GameError, GameStatus, GuessStatus, HintStatus};

/// Outcome of resolving which guesser a submitted guess belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuesserBinding {
    /// The actor was already the bound guesser.
    AlreadyBound,
    /// No guesser was bound yet; the actor takes the seat permanently.
    NewlyBound,
}

/// Only active games accept play actions. Solved is terminal.
pub fn ensure_active(status: &GameStatus) -> Result<(), GameError> {
    match status {
        GameStatus::Active => Ok(()),
        GameStatus::Solved => Err(GameError::conflict("Game is not active")),
    }
}

pub fn ensure_creator(creator_id: Uuid, actor_id: Uuid) -> Result<(), GameError> {
    if creator_id == actor_id {
        Ok(())
    } else {
        Err(GameError::authorization(
            "Only the creator can perform this action",
        ))
    }
}

/// Creator or bound guesser; anyone else is an outsider.
pub fn ensure_participant(
    creator_id: Uuid,
    guesser_id: Option<Uuid>,
    actor_id: Uuid,
) -> Result<(), GameError> {
    if creator_id == actor_id || guesser_id == Some(actor_id) {
        Ok(())
    } else {
        Err(GameError::authorization("Not authorized to view this game"))
    }
}

/// Decide whether `actor_id` may guess on this game, lazily binding the seat
/// on the first guess. The guesser seat is assigned at most once and never
/// reassigned; the creator can never take it.
pub fn resolve_guesser(
    creator_id: Uuid,
    guesser_id: Option<Uuid>,
    actor_id: Uuid,
) -> Result<GuesserBinding, GameError> {
    if actor_id == creator_id {
        return Err(GameError::authorization(
            "The creator cannot guess on their own game",
        ));
    }
    match guesser_id {
        Some(bound) if bound == actor_id => Ok(GuesserBinding::AlreadyBound),
        Some(_) => Err(GameError::authorization(
            "Another player is already guessing on this game",
        )),
        None => Ok(GuesserBinding::NewlyBound),
    }
}

/// Hints require an already-bound guesser; there is no lazy binding here.
pub fn ensure_bound_guesser(guesser_id: Option<Uuid>, actor_id: Uuid) -> Result<(), GameError> {
    match guesser_id {
        Some(bound) if bound == actor_id => Ok(()),
        _ => Err(GameError::authorization(
            "Only the bound guesser can request a hint",
        )),
    }
}

/// Turn-serialization rule: a new guess or hint is rejected while any other
/// guess or hint on the game is still pending.
pub fn ensure_no_pending(pending_count: u64) -> Result<(), GameError> {
    if pending_count == 0 {
        Ok(())
    } else {
        Err(GameError::conflict(
            "A guess or hint is already awaiting a response",
        ))
    }
}

pub fn ensure_guess_pending(status: &GuessStatus) -> Result<(), GameError> {
    match status {
        GuessStatus::Pending => Ok(()),
        _ => Err(GameError::conflict("Guess has already been responded to")),
    }
}

pub fn ensure_hint_pending(status: &HintStatus) -> Result<(), GameError> {
    match status {
        HintStatus::Pending => Ok(()),
        HintStatus::Answered => Err(GameError::conflict("Hint has already been answered")),
    }
}

/// The creator's verdict on a pending guess.
pub fn guess_verdict(correct: bool) -> GuessStatus {
    if correct {
        GuessStatus::Correct
    } else {
        GuessStatus::Incorrect
    }
}
