pub mod game_repository;
pub mod user_repository;

pub use game_repository::GameRepository;
pub use user_repository::UserRepository;
