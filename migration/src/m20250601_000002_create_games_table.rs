use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Games::CreatorId).string().not_null())
                    .col(ColumnDef::new(Games::GuesserId).string())
                    .col(ColumnDef::new(Games::SongTitle).string().not_null())
                    .col(ColumnDef::new(Games::Artist).string().not_null())
                    .col(
                        ColumnDef::new(Games::StartingPrizeCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::CurrentPrizeCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Games::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Games::SolvedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_creator")
                            .from(Games::Table, Games::CreatorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_guesser")
                            .from(Games::Table, Games::GuesserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Dashboard listings filter on either role
        manager
            .create_index(
                Index::create()
                    .name("idx_games_creator_id")
                    .table(Games::Table)
                    .col(Games::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_games_guesser_id")
                    .table(Games::Table)
                    .col(Games::GuesserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Games {
    Table,
    Id,
    CreatorId,
    GuesserId,
    SongTitle,
    Artist,
    StartingPrizeCents,
    CurrentPrizeCents,
    Status,
    Notes,
    CreatedAt,
    SolvedAt,
}
