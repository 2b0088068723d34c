//! API endpoints.

mod admin;
mod catalog;
mod complaints;
mod dashboard;
mod directory;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/complaints", complaints::router())
        .nest("/directory", directory::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
}
