//! Complaint entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Complaint status.
///
/// The five states form a total order; a complaint never moves backward.
/// `Verified` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "verified")]
    Verified,
}

impl ComplaintStatus {
    /// Position of this status in the lifecycle order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Assigned => 1,
            Self::InProgress => 2,
            Self::Completed => 3,
            Self::Verified => 4,
        }
    }

    /// Parse a status from its wire name. Unknown values (including the
    /// non-authoritative "cancelled") yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "assigned" => Some(Self::Assigned),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "verified" => Some(Self::Verified),
            _ => None,
        }
    }

    /// Wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Verified => "verified",
        }
    }

    /// All statuses in lifecycle order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Pending,
            Self::Assigned,
            Self::InProgress,
            Self::Completed,
            Self::Verified,
        ]
    }
}

/// Complaint model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-readable ticket code (`CMP-XXXXXXXX`), unique and immutable.
    #[sea_orm(unique)]
    pub ticket_code: String,

    /// Campus the complaint concerns.
    pub campus_id: String,

    /// Department/category of the issue.
    pub complaint_type_id: String,

    /// Free-text location within the campus.
    pub location: String,

    /// Free-text description of the issue.
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Storage key of the image submitted with the complaint.
    #[sea_orm(nullable)]
    pub image_path: Option<String>,

    /// Current lifecycle status.
    pub status: ComplaintStatus,

    /// Assigned coordinator.
    #[sea_orm(nullable)]
    pub coordinator_id: Option<String>,

    /// Assigned worker.
    #[sea_orm(nullable)]
    pub worker_id: Option<String>,

    /// Resolution notes recorded on completion/verification.
    #[sea_orm(column_type = "Text", nullable)]
    pub resolution_notes: Option<String>,

    /// Storage key of the resolution image.
    #[sea_orm(nullable)]
    pub resolution_image_path: Option<String>,

    /// Set when the complaint reached `completed` (never cleared).
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// Set when the complaint reached `verified`.
    #[sea_orm(nullable)]
    pub verified_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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

    #[sea_orm(has_many = "super::progress_update::Entity")]
    ProgressUpdate,
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

impl Related<super::progress_update::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgressUpdate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_is_total() {
        let all = ComplaintStatus::all();
        for window in all.windows(2) {
            assert!(window[0].rank() < window[1].rank());
        }
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in ComplaintStatus::all() {
            assert_eq!(ComplaintStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_cancelled_is_not_a_status() {
        assert_eq!(ComplaintStatus::parse("cancelled"), None);
    }
}
