//! Core business logic for vidshare.

pub mod services;

pub use services::*;
