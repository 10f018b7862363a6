//! Ownership checks for mutations.

use vidshare_common::{AppError, AppResult};

/// Fail with `Forbidden` unless `actor_id` owns the resource.
///
/// Callers load the resource first, so a missing resource is reported as
/// `NotFound` before ownership is considered.
pub fn ensure_owner(actor_id: &str, owner_id: &str, message: &str) -> AppResult<()> {
    if actor_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}
