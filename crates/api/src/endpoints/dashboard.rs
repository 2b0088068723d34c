//! Dashboard endpoints.

use axum::{Router, extract::State, routing::post};
use campusfix_common::AppResult;
use campusfix_core::ComplaintStats;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", post(stats))
}

/// Aggregate complaint counts within the actor's visible scope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: u64,
    pub pending: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub verified: u64,
}

impl From<ComplaintStats> for StatsResponse {
    fn from(s: ComplaintStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            assigned: s.assigned,
            in_progress: s.in_progress,
            completed: s.completed,
            verified: s.verified,
        }
    }
}

/// Per-role aggregate counts: overseers see the whole system, coordinators
/// their scopes, workers their own assignments.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatsResponse>> {
    let stats = state.complaint_service.stats(&user).await?;
    Ok(ApiResponse::ok(stats.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_serialization() {
        let response = StatsResponse::from(ComplaintStats {
            total: 12,
            pending: 3,
            assigned: 2,
            in_progress: 4,
            completed: 2,
            verified: 1,
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"inProgress\":4"));
        assert!(json.contains("\"total\":12"));
    }
}
