//! HTTP API layer for campusfix.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: complaint lifecycle, role directory, dashboard, admin
//!   provisioning
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: token resolution, shared application state
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
