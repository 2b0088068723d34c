//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use campusfix_core::{
    CampusService, ComplaintService, ComplaintTypeService, DirectoryService, ProgressService,
    UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Complaint lifecycle: submission, tracking, transitions, assignment.
    pub complaint_service: ComplaintService,
    /// Role/assignment directory and role provisioning.
    pub directory_service: DirectoryService,
    /// Progress updates on complaints.
    pub progress_service: ProgressService,
    /// User provisioning and token authentication.
    pub user_service: UserService,
    /// Campus catalog.
    pub campus_service: CampusService,
    /// Complaint-type catalog.
    pub complaint_type_service: ComplaintTypeService,
}

/// Authentication middleware.
///
/// Resolves a `Authorization: Bearer <token>` header to a user row and
/// stores it in the request extensions. Requests without a valid token pass
/// through unauthenticated; the `AuthUser` extractor rejects them where an
/// actor is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
