//! Role assignment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role a user holds. This is the single canonical scheme every
/// permission and routing check goes through; coordinator and worker roles
/// are specialized by the campus/complaint-type scope columns on the
/// assignment row rather than by variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "vp")]
    Vp,
    #[sea_orm(string_value = "director")]
    Director,
    #[sea_orm(string_value = "coordinator")]
    Coordinator,
    #[sea_orm(string_value = "worker")]
    Worker,
}

impl RoleKind {
    /// Whether this role is scoped to a (campus, complaint type) pair.
    #[must_use]
    pub const fn is_scoped(self) -> bool {
        matches!(self, Self::Coordinator | Self::Worker)
    }

    /// Parse a role from its wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "vp" => Some(Self::Vp),
            "director" => Some(Self::Director),
            "coordinator" => Some(Self::Coordinator),
            "worker" => Some(Self::Worker),
            _ => None,
        }
    }

    /// Wire name of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Vp => "vp",
            Self::Director => "director",
            Self::Coordinator => "coordinator",
            Self::Worker => "worker",
        }
    }
}

/// Role assignment model — the join between a user and a role.
///
/// Coordinator/worker assignments carry a campus and complaint type;
/// admin/vp/director assignments carry neither. A user's primary role is the
/// role of their earliest-created assignment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_id: String,

    pub role: RoleKind,

    /// Campus scope (coordinator/worker only).
    #[sea_orm(nullable)]
    pub campus_id: Option<String>,

    /// Complaint-type scope (coordinator/worker only).
    #[sea_orm(nullable)]
    pub complaint_type_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::campus::Entity",
        from = "Column::CampusId",
        to = "super::campus::Column::Id"
    )]
    Campus,

    #[sea_orm(
        belongs_to = "super::complaint_type::Entity",
        from = "Column::ComplaintTypeId",
        to = "super::complaint_type::Column::Id"
    )]
    ComplaintType,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::campus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campus.def()
    }
}

impl Related<super::complaint_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComplaintType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [
            RoleKind::Admin,
            RoleKind::Vp,
            RoleKind::Director,
            RoleKind::Coordinator,
            RoleKind::Worker,
        ] {
            assert_eq!(RoleKind::parse(role.as_str()), Some(role));
        }
        assert_eq!(RoleKind::parse("cleaning_coordinator"), None);
    }

    #[test]
    fn test_scoped_roles() {
        assert!(RoleKind::Coordinator.is_scoped());
        assert!(RoleKind::Worker.is_scoped());
        assert!(!RoleKind::Admin.is_scoped());
        assert!(!RoleKind::Vp.is_scoped());
        assert!(!RoleKind::Director.is_scoped());
    }
}
