pub mod games;
pub mod guesses;
pub mod hints;
pub mod prelude;
pub mod users;
