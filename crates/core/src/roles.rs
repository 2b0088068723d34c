//! Role lookups over a user's assignments.
//!
//! A [`RoleSet`] wraps the assignment rows loaded for one user, in
//! creation order (earliest first). Every permission and routing check in
//! the service layer goes through this type instead of inspecting rows
//! directly.

use campusfix_db::entities::role_assignment::{self, RoleKind};

/// The role assignments held by one user.
#[derive(Debug, Clone, Default)]
pub struct RoleSet {
    assignments: Vec<role_assignment::Model>,
}

impl RoleSet {
    /// Wrap assignment rows. Callers pass rows ordered by creation time,
    /// earliest first, as the repository returns them.
    #[must_use]
    pub fn new(assignments: Vec<role_assignment::Model>) -> Self {
        Self { assignments }
    }

    /// The earliest-created assignment, which defines the user's primary role.
    #[must_use]
    pub fn primary(&self) -> Option<&role_assignment::Model> {
        self.assignments.first()
    }

    /// The user's primary role, if any assignment exists.
    #[must_use]
    pub fn primary_role(&self) -> Option<RoleKind> {
        self.primary().map(|a| a.role)
    }

    #[must_use]
    pub fn has_role(&self, role: RoleKind) -> bool {
        self.assignments.iter().any(|a| a.role == role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(RoleKind::Admin)
    }

    /// Whether the user holds any campus-wide oversight role
    /// (admin, VP or director). Overseers see every complaint.
    #[must_use]
    pub fn is_overseer(&self) -> bool {
        self.assignments.iter().any(|a| !a.role.is_scoped())
    }

    /// The (campus, complaint type) pairs the user coordinates.
    pub fn coordinator_scopes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scopes_for(RoleKind::Coordinator)
    }

    /// The (campus, complaint type) pairs the user works.
    pub fn worker_scopes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scopes_for(RoleKind::Worker)
    }

    #[must_use]
    pub fn is_coordinator_for(&self, campus_id: &str, complaint_type_id: &str) -> bool {
        self.coordinator_scopes()
            .any(|(c, t)| c == campus_id && t == complaint_type_id)
    }

    #[must_use]
    pub fn is_worker_for(&self, campus_id: &str, complaint_type_id: &str) -> bool {
        self.worker_scopes()
            .any(|(c, t)| c == campus_id && t == complaint_type_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &role_assignment::Model> {
        self.assignments.iter()
    }

    /// Consume the set, returning the underlying rows.
    #[must_use]
    pub fn into_inner(self) -> Vec<role_assignment::Model> {
        self.assignments
    }

    fn scopes_for(&self, role: RoleKind) -> impl Iterator<Item = (&str, &str)> {
        self.assignments
            .iter()
            .filter(move |a| a.role == role)
            .filter_map(|a| {
                match (a.campus_id.as_deref(), a.complaint_type_id.as_deref()) {
                    (Some(campus), Some(complaint_type)) => Some((campus, complaint_type)),
                    _ => None,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn assignment(
        id: &str,
        role: RoleKind,
        scope: Option<(&str, &str)>,
        offset_secs: i64,
    ) -> role_assignment::Model {
        role_assignment::Model {
            id: id.to_string(),
            user_id: "user1".to_string(),
            role,
            campus_id: scope.map(|(c, _)| c.to_string()),
            complaint_type_id: scope.map(|(_, t)| t.to_string()),
            created_at: (Utc::now() + Duration::seconds(offset_secs)).into(),
        }
    }

    #[test]
    fn test_primary_role_is_earliest_assignment() {
        let roles = RoleSet::new(vec![
            assignment("a1", RoleKind::Coordinator, Some(("main", "plumbing")), 0),
            assignment("a2", RoleKind::Worker, Some(("main", "electrical")), 10),
        ]);

        assert_eq!(roles.primary_role(), Some(RoleKind::Coordinator));
        assert_eq!(roles.len(), 2);
    }

    #[test]
    fn test_overseer_detection() {
        let vp = RoleSet::new(vec![assignment("a1", RoleKind::Vp, None, 0)]);
        assert!(vp.is_overseer());
        assert!(!vp.is_admin());

        let coordinator = RoleSet::new(vec![assignment(
            "a2",
            RoleKind::Coordinator,
            Some(("main", "plumbing")),
            0,
        )]);
        assert!(!coordinator.is_overseer());
    }

    #[test]
    fn test_scope_matching() {
        let roles = RoleSet::new(vec![
            assignment("a1", RoleKind::Coordinator, Some(("main", "plumbing")), 0),
            assignment("a2", RoleKind::Worker, Some(("north", "electrical")), 5),
        ]);

        assert!(roles.is_coordinator_for("main", "plumbing"));
        assert!(!roles.is_coordinator_for("main", "electrical"));
        assert!(roles.is_worker_for("north", "electrical"));
        assert!(!roles.is_worker_for("main", "plumbing"));
    }

    #[test]
    fn test_empty_set() {
        let roles = RoleSet::default();
        assert!(roles.is_empty());
        assert_eq!(roles.primary_role(), None);
        assert!(!roles.is_admin());
        assert!(!roles.is_overseer());
    }
}
