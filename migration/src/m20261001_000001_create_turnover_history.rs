use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per product; records are kept newest-first as a JSON array
        manager
            .create_table(
                Table::create()
                    .table(TurnoverHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TurnoverHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TurnoverHistory::ProductId)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TurnoverHistory::DailyTurn)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(TurnoverHistory::Records)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TurnoverHistory::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TurnoverHistory::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TurnoverHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TurnoverHistory {
    Table,
    Id,
    ProductId,
    DailyTurn,
    Records,
    Timestamp,
    UpdatedAt,
}
