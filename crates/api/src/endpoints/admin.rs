//! Admin provisioning endpoints.
//!
//! Everything under `/admin` goes through the service-level admin checks;
//! the handlers only shape requests and responses.

use axum::{Json, Router, extract::State, routing::post};
use campusfix_common::AppResult;
use campusfix_core::{AssignRoleInput, CreateUserInput, UpdateRoleInput};
use campusfix_db::entities::{campus, complaint_type, role_assignment, user};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(create_user))
        .route("/users/list", post(list_users))
        .route("/users/delete", post(delete_user))
        .route("/roles/assign", post(assign_role))
        .route("/roles/update", post(update_role))
        .route("/roles/list-for-user", post(list_roles_for_user))
        .route("/campuses/create", post(create_campus))
        .route("/complaint-types/create", post(create_complaint_type))
}

// ========== Users ==========

/// Admin view of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: String,
}

impl From<user::Model> for AdminUserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.email,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// Create user request. An initial role may be provisioned in the same
/// call; scoped roles take the campus and complaint type here too.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
}

/// Provisioned user response. The bearer token is returned exactly once,
/// here; every other user view omits it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedUserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub token: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleAssignmentResponse>,
}

/// Provision a user, optionally with an initial role assignment.
async fn create_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<ApiResponse<ProvisionedUserResponse>> {
    let created = state
        .user_service
        .create(
            &actor,
            CreateUserInput {
                username: req.username,
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    let role = match req.role {
        Some(role) => Some(
            state
                .directory_service
                .assign_role(
                    &actor,
                    AssignRoleInput {
                        user_id: created.id.clone(),
                        role,
                        campus_id: req.campus_id,
                        complaint_type_id: req.complaint_type_id,
                    },
                )
                .await?
                .into(),
        ),
        None => None,
    };

    Ok(ApiResponse::ok(ProvisionedUserResponse {
        id: created.id,
        username: created.username,
        name: created.name,
        email: created.email,
        token: created.token,
        created_at: created.created_at.to_rfc3339(),
        role,
    }))
}

/// List users request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    30
}

/// List users in provisioning order.
async fn list_users(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListUsersRequest>,
) -> AppResult<ApiResponse<Vec<AdminUserResponse>>> {
    let users = state
        .user_service
        .list(&actor, req.limit.min(100), req.offset)
        .await?;
    Ok(ApiResponse::ok(users.into_iter().map(Into::into).collect()))
}

/// Delete user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserRequest {
    pub user_id: String,
}

/// Delete a user along with their role assignments.
async fn delete_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DeleteUserRequest>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete(&actor, &req.user_id).await?;
    Ok(ApiResponse::ok(()))
}

// ========== Role assignments ==========

/// Role assignment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentResponse {
    pub id: String,
    pub user_id: String,
    pub role: role_assignment::RoleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaint_type_id: Option<String>,
    pub created_at: String,
}

impl From<role_assignment::Model> for RoleAssignmentResponse {
    fn from(a: role_assignment::Model) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            role: a.role,
            campus_id: a.campus_id,
            complaint_type_id: a.complaint_type_id,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Assign role request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role: String,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
}

/// Provision a role assignment.
async fn assign_role(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AssignRoleRequest>,
) -> AppResult<ApiResponse<RoleAssignmentResponse>> {
    let created = state
        .directory_service
        .assign_role(
            &actor,
            AssignRoleInput {
                user_id: req.user_id,
                role: req.role,
                campus_id: req.campus_id,
                complaint_type_id: req.complaint_type_id,
            },
        )
        .await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Update role request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub assignment_id: String,
    pub role: String,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
}

/// Edit an existing role assignment.
async fn update_role(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRoleRequest>,
) -> AppResult<ApiResponse<RoleAssignmentResponse>> {
    let updated = state
        .directory_service
        .update_role(
            &actor,
            UpdateRoleInput {
                assignment_id: req.assignment_id,
                role: req.role,
                campus_id: req.campus_id,
                complaint_type_id: req.complaint_type_id,
            },
        )
        .await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// List roles request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRolesRequest {
    pub user_id: String,
}

/// A user's role assignments, earliest first.
async fn list_roles_for_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListRolesRequest>,
) -> AppResult<ApiResponse<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .directory_service
        .roles_for_user(&actor, &req.user_id)
        .await?;
    Ok(ApiResponse::ok(
        assignments.into_iter().map(Into::into).collect(),
    ))
}

// ========== Catalog provisioning ==========

/// Campus response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

impl From<campus::Model> for CampusResponse {
    fn from(c: campus::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Create campus request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampusRequest {
    pub name: String,
}

/// Create a campus.
async fn create_campus(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCampusRequest>,
) -> AppResult<ApiResponse<CampusResponse>> {
    let created = state.campus_service.create(&actor, &req.name).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Complaint type response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTypeResponse {
    pub id: String,
    pub name: String,
    pub has_workers: bool,
    pub created_at: String,
}

impl From<complaint_type::Model> for ComplaintTypeResponse {
    fn from(t: complaint_type::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            has_workers: t.has_workers,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Create complaint type request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintTypeRequest {
    pub name: String,
    #[serde(default = "default_true")]
    pub has_workers: bool,
}

const fn default_true() -> bool {
    true
}

/// Create a complaint type.
async fn create_complaint_type(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateComplaintTypeRequest>,
) -> AppResult<ApiResponse<ComplaintTypeResponse>> {
    let created = state
        .complaint_type_service
        .create(&actor, &req.name, req.has_workers)
        .await?;
    Ok(ApiResponse::ok(created.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campusfix_db::entities::role_assignment::RoleKind;
    use chrono::Utc;

    #[test]
    fn test_role_assignment_response_serialization() {
        let response = RoleAssignmentResponse::from(role_assignment::Model {
            id: "ra1".to_string(),
            user_id: "u1".to_string(),
            role: RoleKind::Coordinator,
            campus_id: Some("main".to_string()),
            complaint_type_id: Some("plumbing".to_string()),
            created_at: Utc::now().into(),
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"role\":\"coordinator\""));
        assert!(json.contains("\"campusId\":\"main\""));
    }

    #[test]
    fn test_unscoped_role_omits_scope_fields() {
        let response = RoleAssignmentResponse::from(role_assignment::Model {
            id: "ra2".to_string(),
            user_id: "u2".to_string(),
            role: RoleKind::Vp,
            campus_id: None,
            complaint_type_id: None,
            created_at: Utc::now().into(),
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"role\":\"vp\""));
        assert!(!json.contains("campusId"));
        assert!(!json.contains("complaintTypeId"));
    }
}
