use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GuessStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "correct")]
    Correct,
    #[sea_orm(string_value = "incorrect")]
    Incorrect,
}

impl From<GuessStatus> for royale_types::GuessStatus {
    fn from(status: GuessStatus) -> Self {
        match status {
            GuessStatus::Pending => royale_types::GuessStatus::Pending,
            GuessStatus::Correct => royale_types::GuessStatus::Correct,
            GuessStatus::Incorrect => royale_types::GuessStatus::Incorrect,
        }
    }
}

impl From<royale_types::GuessStatus> for GuessStatus {
    fn from(status: royale_types::GuessStatus) -> Self {
        match status {
            royale_types::GuessStatus::Pending => GuessStatus::Pending,
            royale_types::GuessStatus::Correct => GuessStatus::Correct,
            royale_types::GuessStatus::Incorrect => GuessStatus::Incorrect,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guesses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub game_id: Uuid,
    pub user_id: Uuid,
    pub guess_text: String,
    pub prize_before_cents: i64,
    pub prize_after_cents: i64,
    pub status: GuessStatus,
    pub feedback: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub responded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
