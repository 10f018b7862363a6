//! ID generation and validation.

use ulid::Ulid;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable by creation time, which listing
    /// queries rely on as a tie-breaker.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component, unlike entity IDs
        Uuid::new_v4().simple().to_string()
    }
}

/// Validate a raw identifier taken from a path or body.
///
/// `label` names the entity in error messages ("Video", "Channel", ...). A blank
/// value is a missing field; anything that is not a ULID is an invalid ID. The
/// returned ID is normalized to the lowercase form stored in the database.
pub fn parse_id(raw: &str, label: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::MissingField(format!("{label} ID")));
    }

    Ulid::from_string(&trimmed.to_ascii_uppercase())
        .map(|id| id.to_string().to_lowercase())
        .map_err(|_| AppError::InvalidId(label.to_string()))
}
