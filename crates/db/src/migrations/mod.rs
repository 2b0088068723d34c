//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_user_table;
mod m20250601_000002_create_campus_table;
mod m20250601_000003_create_complaint_type_table;
mod m20250601_000004_create_complaint_table;
mod m20250601_000005_create_role_assignment_table;
mod m20250601_000006_create_progress_update_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_user_table::Migration),
            Box::new(m20250601_000002_create_campus_table::Migration),
            Box::new(m20250601_000003_create_complaint_type_table::Migration),
            Box::new(m20250601_000004_create_complaint_table::Migration),
            Box::new(m20250601_000005_create_role_assignment_table::Migration),
            Box::new(m20250601_000006_create_progress_update_table::Migration),
        ]
    }
}
