//! Create complaint table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaint::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaint::TicketCode).string_len(16).not_null())
                    .col(ColumnDef::new(Complaint::CampusId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Complaint::ComplaintTypeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaint::Location).string_len(512).not_null())
                    .col(ColumnDef::new(Complaint::Description).text().not_null())
                    .col(ColumnDef::new(Complaint::ImagePath).string_len(1024))
                    .col(
                        ColumnDef::new(Complaint::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Complaint::CoordinatorId).string_len(32))
                    .col(ColumnDef::new(Complaint::WorkerId).string_len(32))
                    .col(ColumnDef::new(Complaint::ResolutionNotes).text())
                    .col(ColumnDef::new(Complaint::ResolutionImagePath).string_len(1024))
                    .col(ColumnDef::new(Complaint::ResolvedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Complaint::VerifiedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Complaint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Complaint::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_campus")
                            .from(Complaint::Table, Complaint::CampusId)
                            .to(Campus::Table, Campus::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_complaint_type")
                            .from(Complaint::Table, Complaint::ComplaintTypeId)
                            .to(ComplaintType::Table, ComplaintType::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: ticket_code (public lookup key)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_ticket_code")
                    .table(Complaint::Table)
                    .col(Complaint::TicketCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (campus_id, complaint_type_id) - coordinator scope listing
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_campus_type")
                    .table(Complaint::Table)
                    .col(Complaint::CampusId)
                    .col(Complaint::ComplaintTypeId)
                    .to_owned(),
            )
            .await?;

        // Index: status (dashboard counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_status")
                    .table(Complaint::Table)
                    .col(Complaint::Status)
                    .to_owned(),
            )
            .await?;

        // Index: worker_id (worker scope listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_worker_id")
                    .table(Complaint::Table)
                    .col(Complaint::WorkerId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_created_at")
                    .table(Complaint::Table)
                    .col(Complaint::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
    TicketCode,
    CampusId,
    ComplaintTypeId,
    Location,
    Description,
    ImagePath,
    Status,
    CoordinatorId,
    WorkerId,
    ResolutionNotes,
    ResolutionImagePath,
    ResolvedAt,
    VerifiedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Campus {
    Table,
    Id,
}

#[derive(Iden)]
enum ComplaintType {
    Table,
    Id,
}
