//! Complaint endpoints: public submission and tracking, scoped listings,
//! lifecycle transitions, assignment and progress updates.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use campusfix_common::{AppError, AppResult};
use campusfix_core::{
    AssignComplaintInput, CreateProgressInput, ListComplaintsInput, SubmitComplaintInput,
    UpdateStatusInput, UploadImage,
};
use campusfix_db::entities::{complaint, progress_update};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Upload cap for a single image file.
const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Body cap for the multipart routes: one file at the cap plus form fields.
const MULTIPART_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Create complaints router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_complaint))
        .route("/track", post(track_complaint))
        .route("/list", post(list_complaints))
        .route("/update-status", post(update_status))
        .route("/assign", post(assign_complaint))
        .route("/progress/create", post(create_progress))
        .route("/progress/list", post(list_progress))
        .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT))
}

/// Complaint response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub ticket_code: String,
    pub campus_id: String,
    pub complaint_type_id: String,
    pub location: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub status: complaint::ComplaintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<complaint::Model> for ComplaintResponse {
    fn from(c: complaint::Model) -> Self {
        Self {
            id: c.id,
            ticket_code: c.ticket_code,
            campus_id: c.campus_id,
            complaint_type_id: c.complaint_type_id,
            location: c.location,
            description: c.description,
            image_path: c.image_path,
            status: c.status,
            coordinator_id: c.coordinator_id,
            worker_id: c.worker_id,
            resolution_notes: c.resolution_notes,
            resolution_image_path: c.resolution_image_path,
            resolved_at: c.resolved_at.map(|t| t.to_rfc3339()),
            verified_at: c.verified_at.map(|t| t.to_rfc3339()),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Submit a complaint via multipart form. Public: no authentication.
async fn create_complaint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let mut campus_id: Option<String> = None;
    let mut complaint_type_id: Option<String> = None;
    let mut location: Option<String> = None;
    let mut description: Option<String> = None;
    let mut image: Option<UploadImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "campusId" => campus_id = Some(read_text(field).await?),
            "typeId" => complaint_type_id = Some(read_text(field).await?),
            "location" => location = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "file" => image = read_image(field).await?,
            _ => {}
        }
    }

    let input = SubmitComplaintInput {
        campus_id: campus_id
            .ok_or_else(|| AppError::Validation("Campus is required".to_string()))?,
        complaint_type_id: complaint_type_id
            .ok_or_else(|| AppError::Validation("Complaint type is required".to_string()))?,
        location: location
            .ok_or_else(|| AppError::Validation("Location is required".to_string()))?,
        description: description
            .ok_or_else(|| AppError::Validation("Description is required".to_string()))?,
        image,
    };

    let created = state.complaint_service.submit(input).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Track complaint request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackComplaintRequest {
    pub ticket_code: String,
}

/// Look up a complaint by ticket code. Public: no authentication.
async fn track_complaint(
    State(state): State<AppState>,
    Json(req): Json<TrackComplaintRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let found = state.complaint_service.track(&req.ticket_code).await?;
    Ok(ApiResponse::ok(found.into()))
}

/// List complaints request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComplaintsRequest {
    pub status: Option<String>,
    pub campus_id: Option<String>,
    pub complaint_type_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    30
}

/// List complaints visible to the authenticated actor, newest first.
async fn list_complaints(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListComplaintsRequest>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let input = ListComplaintsInput {
        status: req.status,
        campus_id: req.campus_id,
        complaint_type_id: req.complaint_type_id,
        limit: req.limit.min(100),
        offset: req.offset,
    };
    let complaints = state.complaint_service.list(&user, input).await?;
    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// Update status response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub complaint: ComplaintResponse,
    pub message: String,
}

/// Drive a lifecycle transition via multipart form.
async fn update_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UpdateStatusResponse>> {
    let mut complaint_id: Option<String> = None;
    let mut status: Option<String> = None;
    let mut resolution_notes: Option<String> = None;
    let mut resolution_image: Option<UploadImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "complaintId" => complaint_id = Some(read_text(field).await?),
            "status" => status = Some(read_text(field).await?),
            "notes" => {
                let text = read_text(field).await?;
                if !text.is_empty() {
                    resolution_notes = Some(text);
                }
            }
            "file" => resolution_image = read_image(field).await?,
            _ => {}
        }
    }

    let input = UpdateStatusInput {
        complaint_id: complaint_id
            .ok_or_else(|| AppError::Validation("Complaint id is required".to_string()))?,
        status: status.ok_or_else(|| AppError::Validation("Status is required".to_string()))?,
        resolution_notes,
        resolution_image,
    };

    let updated = state.complaint_service.update_status(&user, input).await?;
    let message = format!(
        "Complaint {} is now {}",
        updated.ticket_code,
        updated.status.as_str()
    );
    Ok(ApiResponse::ok(UpdateStatusResponse {
        complaint: updated.into(),
        message,
    }))
}

/// Assign complaint request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignComplaintRequest {
    pub complaint_id: String,
    pub target_user_id: String,
}

/// Route a complaint to a coordinator or worker.
async fn assign_complaint(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AssignComplaintRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let input = AssignComplaintInput {
        complaint_id: req.complaint_id,
        target_user_id: req.target_user_id,
    };
    let updated = state.complaint_service.assign(&user, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Progress update response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub id: String,
    pub complaint_id: String,
    pub author_id: String,
    pub notes: String,
    pub created_at: String,
}

impl From<progress_update::Model> for ProgressResponse {
    fn from(p: progress_update::Model) -> Self {
        Self {
            id: p.id,
            complaint_id: p.complaint_id,
            author_id: p.author_id,
            notes: p.notes,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Create progress request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    pub complaint_id: String,
    pub notes: String,
}

/// Append a progress update to a complaint.
async fn create_progress(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateProgressRequest>,
) -> AppResult<ApiResponse<ProgressResponse>> {
    let input = CreateProgressInput {
        complaint_id: req.complaint_id,
        notes: req.notes,
    };
    let created = state.progress_service.create(&user, input).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// List progress request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProgressRequest {
    pub complaint_id: String,
}

/// List a complaint's progress updates, oldest first.
async fn list_progress(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ListProgressRequest>,
) -> AppResult<ApiResponse<Vec<ProgressResponse>>> {
    let updates = state
        .progress_service
        .list(&user, &req.complaint_id)
        .await?;
    Ok(ApiResponse::ok(
        updates.into_iter().map(Into::into).collect(),
    ))
}

// ========== Multipart helpers ==========

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Read a file field into an `UploadImage`, enforcing the per-file cap.
/// Empty file fields (a form submitted with no file picked) yield `None`.
async fn read_image(
    field: axum::extract::multipart::Field<'_>,
) -> AppResult<Option<UploadImage>> {
    let file_name = field
        .file_name()
        .map_or_else(|| "upload".to_string(), std::string::ToString::to_string);
    let content_type = field.content_type().map_or_else(
        || "application/octet-stream".to_string(),
        std::string::ToString::to_string,
    );
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .to_vec();

    if data.is_empty() {
        return Ok(None);
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "Image exceeds the 2 MB upload limit".to_string(),
        ));
    }

    Ok(Some(UploadImage {
        file_name,
        content_type,
        data,
    }))
}
