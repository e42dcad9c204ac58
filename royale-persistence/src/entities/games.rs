use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GameStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "solved")]
    Solved,
}

impl From<GameStatus> for royale_types::GameStatus {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::Active => royale_types::GameStatus::Active,
            GameStatus::Solved => royale_types::GameStatus::Solved,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub creator_id: Uuid,
    pub guesser_id: Option<Uuid>,
    pub song_title: String,
    pub artist: String,
    pub starting_prize_cents: i64,
    pub current_prize_cents: i64,
    pub status: GameStatus,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
    pub solved_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::GuesserId",
        to = "super::users::Column::Id"
    )]
    Guesser,
    #[sea_orm(has_many = "super::guesses::Entity")]
    Guesses,
    #[sea_orm(has_many = "super::hints::Entity")]
    Hints,
}

impl Related<super::guesses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guesses.def()
    }
}

impl Related<super::hints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
