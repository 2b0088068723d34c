//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User model.
///
/// Users are provisioned by an admin; their roles live in
/// [`super::role_assignment`]. The `token` column is the opaque bearer
/// credential handed out at provisioning time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Display name.
    pub name: String,

    /// Contact email (optional).
    #[sea_orm(nullable)]
    pub email: Option<String>,

    /// Access token used for bearer authentication.
    #[sea_orm(unique)]
    pub token: String,

    /// When the user was provisioned.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::role_assignment::Entity")]
    RoleAssignment,
}

impl Related<super::role_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoleAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
