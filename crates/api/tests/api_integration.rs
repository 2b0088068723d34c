//! API integration tests.
//!
//! Each test builds the full router over a `MockDatabase` seeded with the
//! rows that request will touch, then drives it with `oneshot`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    middleware as axum_middleware,
};
use campusfix_api::{
    middleware::{AppState, auth_middleware},
    router as api_router,
};
use campusfix_common::LocalStorage;
use campusfix_core::{
    CampusService, ComplaintService, ComplaintTypeService, DirectoryService, ProgressService,
    UserService,
};
use campusfix_db::{
    entities::{
        campus,
        role_assignment::{self, RoleKind},
        user,
    },
    repositories::{
        CampusRepository, ComplaintRepository, ComplaintTypeRepository, ProgressUpdateRepository,
        RoleAssignmentRepository, UserRepository,
    },
};
use chrono::Utc;
use maplit::btreemap;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;

/// Build app state over a mock connection.
fn test_state(db: Arc<sea_orm::DatabaseConnection>) -> AppState {
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let campus_repo = CampusRepository::new(Arc::clone(&db));
    let complaint_type_repo = ComplaintTypeRepository::new(Arc::clone(&db));
    let role_repo = RoleAssignmentRepository::new(Arc::clone(&db));
    let user_repo = UserRepository::new(Arc::clone(&db));
    let progress_repo = ProgressUpdateRepository::new(Arc::clone(&db));

    let storage = Arc::new(LocalStorage::new(
        PathBuf::from("/tmp/campusfix-test-files"),
        "/files".to_string(),
    ));

    AppState {
        complaint_service: ComplaintService::new(
            complaint_repo.clone(),
            campus_repo.clone(),
            complaint_type_repo.clone(),
            role_repo.clone(),
            user_repo.clone(),
            storage,
        ),
        directory_service: DirectoryService::new(
            role_repo.clone(),
            user_repo.clone(),
            campus_repo.clone(),
            complaint_type_repo.clone(),
            complaint_repo.clone(),
        ),
        progress_service: ProgressService::new(progress_repo, complaint_repo, role_repo.clone()),
        user_service: UserService::new(user_repo.clone(), role_repo.clone()),
        campus_service: CampusService::new(campus_repo, role_repo.clone()),
        complaint_type_service: ComplaintTypeService::new(complaint_type_repo, role_repo),
    }
}

/// Build the router the way the server wires it: API routes plus the
/// bearer-token middleware.
fn test_router(db: MockDatabase) -> Router {
    let state = test_state(Arc::new(db.into_connection()));
    api_router()
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: id.to_string(),
        name: id.to_string(),
        email: None,
        token: format!("token_{id}"),
        created_at: Utc::now().into(),
    }
}

fn admin_assignment(user_id: &str) -> role_assignment::Model {
    role_assignment::Model {
        id: format!("ra-{user_id}"),
        user_id: user_id.to_string(),
        role: RoleKind::Admin,
        campus_id: None,
        complaint_type_id: None,
        created_at: Utc::now().into(),
    }
}

fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
    btreemap! {"num_items" => sea_orm::Value::BigInt(Some(n))}
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_complaints_requires_auth() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints/list")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_stats_requires_auth() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/stats")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_track_with_blank_ticket_code_returns_400() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints/track")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"ticketCode":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_unknown_ticket_code_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<campusfix_db::entities::complaint::Model>::new()]);
    let app = test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints/track")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"ticketCode":"CMP-DEADBEEF"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_campuses_list_is_public() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[campus::Model {
        id: "main".to_string(),
        name: "Main Campus".to_string(),
        created_at: Utc::now().into(),
    }]]);
    let app = test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/campuses/list")
                .method("POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Main Campus"));
}

#[tokio::test]
async fn test_create_complaint_with_missing_fields_returns_400() {
    let app = test_router(MockDatabase::new(DatabaseBackend::Postgres));

    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"location\"\r\n\r\nDorm A\r\n--{boundary}--\r\n"
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/complaints/create")
                .method("POST")
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Campus is required"));
}

#[tokio::test]
async fn test_stats_with_bearer_token_returns_counts() {
    // authenticate_by_token, then the role lookup, then one total count and
    // five per-status counts.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("admin1")]])
        .append_query_results([[admin_assignment("admin1")]])
        .append_query_results([vec![count_row(12)]])
        .append_query_results([vec![count_row(3)]])
        .append_query_results([vec![count_row(2)]])
        .append_query_results([vec![count_row(4)]])
        .append_query_results([vec![count_row(2)]])
        .append_query_results([vec![count_row(1)]]);
    let app = test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/stats")
                .method("POST")
                .header("Authorization", "Bearer token_admin1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("\"total\":12"));
    assert!(body.contains("\"inProgress\":4"));
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    // Token resolves to no user row; the request reaches the handler
    // unauthenticated and is rejected there.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()]);
    let app = test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/dashboard/stats")
                .method("POST")
                .header("Authorization", "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
