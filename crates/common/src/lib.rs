//! Common utilities and shared types for vidshare.
//!
//! This crate provides foundational components used across all vidshare crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers via [`IdGenerator`], validated with [`parse_id`]
//! - **Storage**: Object storage backends for uploaded media
//!
//! # Example
//!
//! ```no_run
//! use vidshare_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {} on port {}", id, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, parse_id};
pub use storage::{
    LocalStorage, NoOpStorage, StorageBackend, StorageService, UploadedFile, generate_storage_key,
};
