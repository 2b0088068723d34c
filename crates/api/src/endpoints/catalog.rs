//! Public catalog endpoints.
//!
//! The submission form needs the campus and complaint-type lists before any
//! authentication happens, so these two listings are public. Provisioning
//! the catalog stays under `/admin`.

use axum::{Router, extract::State, routing::post};
use campusfix_common::AppResult;
use campusfix_db::entities::{campus, complaint_type};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Create catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/campuses/list", post(list_campuses))
        .route("/complaint-types/list", post(list_complaint_types))
}

/// Campus catalog entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusResponse {
    pub id: String,
    pub name: String,
}

impl From<campus::Model> for CampusResponse {
    fn from(c: campus::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

/// List campuses, ordered by name.
async fn list_campuses(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CampusResponse>>> {
    let campuses = state.campus_service.list().await?;
    Ok(ApiResponse::ok(
        campuses.into_iter().map(Into::into).collect(),
    ))
}

/// Complaint-type catalog entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTypeResponse {
    pub id: String,
    pub name: String,
    pub has_workers: bool,
}

impl From<complaint_type::Model> for ComplaintTypeResponse {
    fn from(t: complaint_type::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            has_workers: t.has_workers,
        }
    }
}

/// List complaint types, ordered by name.
async fn list_complaint_types(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ComplaintTypeResponse>>> {
    let types = state.complaint_type_service.list().await?;
    Ok(ApiResponse::ok(types.into_iter().map(Into::into).collect()))
}
