//! Create progress update table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgressUpdate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProgressUpdate::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProgressUpdate::ComplaintId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProgressUpdate::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(ProgressUpdate::Notes).text().not_null())
                    .col(
                        ColumnDef::new(ProgressUpdate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_progress_update_complaint")
                            .from(ProgressUpdate::Table, ProgressUpdate::ComplaintId)
                            .to(Complaint::Table, Complaint::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (complaint_id, created_at) - per-complaint timeline
        manager
            .create_index(
                Index::create()
                    .name("idx_progress_update_complaint_created")
                    .table(ProgressUpdate::Table)
                    .col(ProgressUpdate::ComplaintId)
                    .col(ProgressUpdate::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgressUpdate::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProgressUpdate {
    Table,
    Id,
    ComplaintId,
    AuthorId,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
}
