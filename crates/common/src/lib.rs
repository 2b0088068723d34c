//! Common utilities and shared types for campusfix.
//!
//! This crate provides foundational components used across all campusfix
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers and ticket codes via [`IdGenerator`]
//! - **Storage**: Blob storage backend for complaint/resolution images
//!
//! # Example
//!
//! ```no_run
//! use campusfix_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let ticket = id_gen.generate_ticket_code();
//!     println!("New ticket: {}", ticket);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, TICKET_CODE_PREFIX};
pub use storage::{LocalStorage, StorageBackend, UploadedFile, generate_storage_key};
