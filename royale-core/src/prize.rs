use royale_types::PintProgress;

/// Every game opens with this prize pool (50.00, in cents).
pub const GAME_STARTING_PRIZE_CENTS: i64 = 5_000;

/// Global target the whole user base is drinking toward (7.50, in cents).
pub const PINT_GOAL_CENTS: i64 = 750;

/// Halve a prize amount, rounding half-up to the cent.
///
/// All ledger arithmetic is integer cents; there is no floating point anywhere
/// near the prize pool.
pub fn halve_cents(cents: i64) -> i64 {
    (cents + 1) / 2
}

/// Prize after a guess is recorded. The first guess on a game is free; every
/// guess after that halves the pool.
pub fn prize_after_guess(prior_guess_count: u64, current_cents: i64) -> i64 {
    if prior_guess_count == 0 {
        current_cents
    } else {
        halve_cents(current_cents)
    }
}

/// Prize after a hint is requested. Hints always halve, regardless of how many
/// guesses have been made.
pub fn prize_after_hint(current_cents: i64) -> i64 {
    halve_cents(current_cents)
}

/// Aggregate progress of all users' winnings toward the pint goal.
pub fn pint_progress(total_winnings_cents: i64) -> PintProgress {
    let raw = (total_winnings_cents as f64 / PINT_GOAL_CENTS as f64) * 100.0;
    let progress = (raw.min(100.0) * 10.0).round() / 10.0;

    PintProgress {
        total_winnings_cents,
        pint_goal_cents: PINT_GOAL_CENTS,
        progress,
        remaining_cents: (PINT_GOAL_CENTS - total_winnings_cents).max(0),
        goal_reached: total_winnings_cents >= PINT_GOAL_CENTS,
    }
}
