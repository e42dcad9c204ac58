use sea_orm_migration::prelude::*;

use crate::m20250601_000002_create_games_table::Games;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hints::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hints::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Hints::GameId).string().not_null())
                    .col(ColumnDef::new(Hints::HintRequest).string().not_null())
                    .col(ColumnDef::new(Hints::HintResponse).string())
                    .col(
                        ColumnDef::new(Hints::PrizeBeforeCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Hints::PrizeAfterCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Hints::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Hints::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Hints::RespondedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hints_game")
                            .from(Hints::Table, Hints::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hints_game_id")
                    .table(Hints::Table)
                    .col(Hints::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Hints {
    Table,
    Id,
    GameId,
    HintRequest,
    HintResponse,
    PrizeBeforeCents,
    PrizeAfterCents,
    Status,
    CreatedAt,
    RespondedAt,
}
