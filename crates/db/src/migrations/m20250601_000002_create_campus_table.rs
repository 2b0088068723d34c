//! Create campus table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campus::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Campus::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Campus::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Campus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_campus_name")
                    .table(Campus::Table)
                    .col(Campus::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Campus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Campus {
    Table,
    Id,
    Name,
    CreatedAt,
}
