use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Latest known state per tag, written by the tag-processing pipeline
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Epc)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::ProductId).string_len(128).not_null())
                    .col(ColumnDef::new(Tags::Event).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Tags::LastRead)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Snapshot queries always filter by product first
        manager
            .create_index(
                Index::create()
                    .name("idx_tags_product_id_last_read")
                    .table(Tags::Table)
                    .col(Tags::ProductId)
                    .col(Tags::LastRead)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tags {
    Table,
    Epc,
    ProductId,
    Event,
    LastRead,
}
