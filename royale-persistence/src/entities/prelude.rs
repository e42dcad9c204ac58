pub use super::games::Entity as Games;
pub use super::guesses::Entity as Guesses;
pub use super::hints::Entity as Hints;
pub use super::users::Entity as Users;
