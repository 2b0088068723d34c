//! Complaint lifecycle rules.
//!
//! The status order, the transition preconditions and the actor permission
//! table live here as pure functions so the rules can be tested without a
//! database. The complaint service applies them inside its transaction.

use campusfix_common::{AppError, AppResult};
use campusfix_db::entities::complaint::{self, ComplaintStatus};
use campusfix_db::entities::role_assignment::RoleKind;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::roles::RoleSet;

/// Validate a requested transition against the current status.
///
/// The lifecycle only moves forward: a target that ranks below the current
/// status is rejected, while re-applying the current status or skipping
/// ahead is allowed. Transitions into `completed` or `verified` require
/// non-empty resolution notes.
pub fn validate_transition(
    current: ComplaintStatus,
    target: ComplaintStatus,
    resolution_notes: Option<&str>,
) -> AppResult<()> {
    if target.rank() < current.rank() {
        return Err(AppError::Validation(format!(
            "Cannot move a complaint backward from {} to {}",
            current.as_str(),
            target.as_str()
        )));
    }

    if matches!(target, ComplaintStatus::Completed | ComplaintStatus::Verified) {
        let has_notes = resolution_notes.is_some_and(|notes| !notes.trim().is_empty());
        if !has_notes {
            return Err(AppError::Validation(format!(
                "Resolution notes are required when marking a complaint {}",
                target.as_str()
            )));
        }
    }

    Ok(())
}

/// Check whether an actor may drive transitions on this complaint.
///
/// Evaluated first match wins: an admin may always act; a coordinator may
/// act on complaints assigned to them; a worker may act on complaints
/// assigned to them. Everyone else is rejected, including VPs and
/// directors, whose oversight is read-only.
pub fn authorize_transition(
    actor_id: &str,
    roles: &RoleSet,
    complaint: &complaint::Model,
) -> AppResult<()> {
    if roles.is_admin() {
        return Ok(());
    }

    if roles.has_role(RoleKind::Coordinator)
        && complaint.coordinator_id.as_deref() == Some(actor_id)
    {
        return Ok(());
    }

    if roles.has_role(RoleKind::Worker) && complaint.worker_id.as_deref() == Some(actor_id) {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "You are not allowed to update this complaint".to_string(),
    ))
}

/// Resolution timestamps after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionStamps {
    pub resolved_at: Option<DateTimeWithTimeZone>,
    pub verified_at: Option<DateTimeWithTimeZone>,
}

/// Compute the timestamp values a transition leaves behind.
///
/// `resolved_at` is stamped with `now` whenever the target is `completed`
/// (re-applying `completed` refreshes it), and backfilled when a complaint
/// reaches `verified` without ever passing through `completed`. Neither
/// timestamp is cleared by later transitions.
#[must_use]
pub fn transition_stamps(
    target: ComplaintStatus,
    prior: &complaint::Model,
    now: DateTimeWithTimeZone,
) -> TransitionStamps {
    let resolved_at = match target {
        ComplaintStatus::Completed => Some(now),
        ComplaintStatus::Verified => prior.resolved_at.or(Some(now)),
        _ => prior.resolved_at,
    };

    let verified_at = if target == ComplaintStatus::Verified {
        Some(now)
    } else {
        prior.verified_at
    };

    TransitionStamps {
        resolved_at,
        verified_at,
    }
}
