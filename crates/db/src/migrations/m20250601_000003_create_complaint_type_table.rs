//! Create complaint type table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplaintType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintType::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ComplaintType::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(ComplaintType::HasWorkers)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ComplaintType::CreatedAt)
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
                    .name("idx_complaint_type_name")
                    .table(ComplaintType::Table)
                    .col(ComplaintType::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintType::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ComplaintType {
    Table,
    Id,
    Name,
    HasWorkers,
    CreatedAt,
}
