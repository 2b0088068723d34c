//! Create role assignment table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoleAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleAssignment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoleAssignment::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(RoleAssignment::Role).string_len(32).not_null())
                    .col(ColumnDef::new(RoleAssignment::CampusId).string_len(32))
                    .col(ColumnDef::new(RoleAssignment::ComplaintTypeId).string_len(32))
                    .col(
                        ColumnDef::new(RoleAssignment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_assignment_user")
                            .from(RoleAssignment::Table, RoleAssignment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (role resolution per user)
        manager
            .create_index(
                Index::create()
                    .name("idx_role_assignment_user_id")
                    .table(RoleAssignment::Table)
                    .col(RoleAssignment::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (role, campus_id, complaint_type_id) - directory lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_role_assignment_role_scope")
                    .table(RoleAssignment::Table)
                    .col(RoleAssignment::Role)
                    .col(RoleAssignment::CampusId)
                    .col(RoleAssignment::ComplaintTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoleAssignment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RoleAssignment {
    Table,
    Id,
    UserId,
    Role,
    CampusId,
    ComplaintTypeId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
