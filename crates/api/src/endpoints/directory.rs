//! Role/assignment directory endpoints.
//!
//! Read side of the directory: who covers a (campus, complaint type) pair
//! and who a complaint may be handed to next. Provisioning lives under
//! `/admin`.

use axum::{Json, Router, extract::State, routing::post};
use campusfix_common::AppResult;
use campusfix_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create directory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coordinator", post(coordinator))
        .route("/workers", post(workers))
        .route("/assignable-targets", post(assignable_targets))
}

/// Directory user response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
        }
    }
}

/// Scope pair request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequest {
    pub campus_id: String,
    pub complaint_type_id: String,
}

/// Coordinator response. The pair having no coordinator is a normal state,
/// not an error.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorResponse {
    pub coordinator: Option<UserResponse>,
}

/// The coordinator responsible for a (campus, complaint type) pair.
async fn coordinator(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ScopeRequest>,
) -> AppResult<ApiResponse<CoordinatorResponse>> {
    let found = state
        .directory_service
        .coordinator_for(&req.campus_id, &req.complaint_type_id)
        .await?;
    Ok(ApiResponse::ok(CoordinatorResponse {
        coordinator: found.map(Into::into),
    }))
}

/// The workers provisioned for a (campus, complaint type) pair.
async fn workers(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ScopeRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let found = state
        .directory_service
        .workers_for(&req.campus_id, &req.complaint_type_id)
        .await?;
    Ok(ApiResponse::ok(found.into_iter().map(Into::into).collect()))
}

/// Assignable targets request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignableTargetsRequest {
    pub complaint_id: String,
}

/// The users the actor may hand this complaint to next.
async fn assignable_targets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AssignableTargetsRequest>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let found = state
        .directory_service
        .assignable_targets_for(&user, &req.complaint_id)
        .await?;
    Ok(ApiResponse::ok(found.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_hides_token() {
        let response = UserResponse::from(user::Model {
            id: "u1".to_string(),
            username: "mjones".to_string(),
            name: "M. Jones".to_string(),
            email: None,
            token: "secret-token".to_string(),
            created_at: Utc::now().into(),
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"username\":\"mjones\""));
        assert!(!json.contains("secret-token"));
    }

    #[test]
    fn test_coordinator_response_with_none() {
        let json =
            serde_json::to_string(&CoordinatorResponse { coordinator: None }).unwrap();
        assert_eq!(json, r#"{"coordinator":null}"#);
    }
}
