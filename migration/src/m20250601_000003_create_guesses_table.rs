use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_table::Users;
use crate::m20250601_000002_create_games_table::Games;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Guesses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Guesses::GameId).string().not_null())
                    .col(ColumnDef::new(Guesses::UserId).string().not_null())
                    .col(ColumnDef::new(Guesses::GuessText).string().not_null())
                    .col(
                        ColumnDef::new(Guesses::PrizeBeforeCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Guesses::PrizeAfterCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Guesses::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Guesses::Feedback).string())
                    .col(
                        ColumnDef::new(Guesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Guesses::RespondedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_game")
                            .from(Guesses::Table, Guesses::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_user")
                            .from(Guesses::Table, Guesses::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guesses_game_id")
                    .table(Guesses::Table)
                    .col(Guesses::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Guesses {
    Table,
    Id,
    GameId,
    UserId,
    GuessText,
    PrizeBeforeCents,
    PrizeAfterCents,
    Status,
    Feedback,
    CreatedAt,
    RespondedAt,
}
