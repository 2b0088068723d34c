//! Core business logic for campusfix.

pub mod lifecycle;
pub mod roles;
pub mod services;

pub use services::*;
