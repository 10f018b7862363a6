//! Create-if-absent / delete-if-present for link rows (likes, subscriptions).
//!
//! Removal is one conditional `DELETE`. Insertion leans on the link table's
//! unique index: if a concurrent toggle inserted the same link first, the insert
//! fails with [`AppError::Conflict`] and the toggle starts over, which then
//! removes that link.

use std::future::Future;

use vidshare_common::{AppError, AppResult};

/// Attempts before a toggle that keeps losing races gives up.
const MAX_ATTEMPTS: usize = 3;

/// Result of a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled<M> {
    /// A new link was inserted.
    Added(M),
    /// An existing link was deleted.
    Removed,
}

impl<M> Toggled<M> {
    /// Whether the link exists after the toggle.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Run a toggle with the given remove/insert steps.
///
/// `remove` reports whether a row was deleted; `insert` must map a unique-index
/// violation to [`AppError::Conflict`].
pub async fn toggle<M, R, RF, I, IF>(remove: R, insert: I) -> AppResult<Toggled<M>>
where
    R: Fn() -> RF,
    RF: Future<Output = AppResult<bool>>,
    I: Fn() -> IF,
    IF: Future<Output = AppResult<M>>,
{
    let mut attempt = 1;
    loop {
        if remove().await? {
            return Ok(Toggled::Removed);
        }

        match insert().await {
            Ok(model) => return Ok(Toggled::Added(model)),
            Err(AppError::Conflict(reason)) if attempt < MAX_ATTEMPTS => {
                tracing::debug!(attempt, reason = %reason, "Toggle lost an insert race, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory link set standing in for a table with a unique index.
    #[derive(Default)]
    struct Links {
        rows: Mutex<Vec<&'static str>>,
        // Links inserted "concurrently" right before our next insert
        racers: Mutex<Vec<&'static str>>,
    }

    impl Links {
        async fn remove(&self, key: &'static str) -> AppResult<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| *r != key);
            Ok(rows.len() < before)
        }

        async fn insert(&self, key: &'static str) -> AppResult<&'static str> {
            let mut rows = self.rows.lock().unwrap();
            rows.extend(self.racers.lock().unwrap().drain(..));
            if rows.contains(&key) {
                return Err(AppError::Conflict("duplicate".into()));
            }
            rows.push(key);
            Ok(key)
        }
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let links = Links::default();

        let first = toggle(|| links.remove("a"), || links.insert("a")).await.unwrap();
        assert_eq!(first, Toggled::Added("a"));
        assert!(first.is_active());

        let second = toggle(|| links.remove("a"), || links.insert("a")).await.unwrap();
        assert_eq!(second, Toggled::Removed);
        assert!(links.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_retries_after_lost_race() {
        let links = Links::default();
        links.racers.lock().unwrap().push("a");

        // The concurrent insert wins, so this call removes it
        let outcome = toggle(|| links.remove("a"), || links.insert("a")).await.unwrap();
        assert_eq!(outcome, Toggled::Removed);
        assert!(links.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_gives_up_on_persistent_conflict() {
        let result: AppResult<Toggled<()>> = toggle(
            || async { Ok(false) },
            || async { Err(AppError::Conflict("always".into())) },
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_toggle_propagates_store_failure() {
        let result: AppResult<Toggled<()>> = toggle(
            || async { Err(AppError::Database("down".into())) },
            || async { Ok(()) },
        )
        .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
