//! Port for the win↔tag join table.
//!
//! A tag link either exists or it does not; there are no editable fields,
//! so reconciliation reduces to set difference on tag ids.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::ids::{RecordId, TagId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by win tag repository adapters.
    pub enum WinTagRepositoryError {
        /// Repository connection could not be established.
        Connection => "win tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "win tag repository query failed: {message}",
    }
}

/// Persistence port for win↔tag links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WinTagRepository: Send + Sync {
    /// Tags currently linked to the given win.
    async fn tag_ids_for_win(
        &self,
        win_id: RecordId,
    ) -> Result<Vec<TagId>, WinTagRepositoryError>;

    /// Create the given links.
    async fn attach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError>;

    /// Remove the given links.
    async fn detach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError>;
}

/// In-memory tag link repository for unit tests and fixture wiring.
#[derive(Debug, Default)]
pub struct InMemoryWinTagRepository {
    links: Mutex<HashMap<RecordId, HashSet<TagId>>>,
    fail_attaches: AtomicBool,
}

impl InMemoryWinTagRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent attaches fail with a query error.
    pub fn fail_attaches(&self) {
        self.fail_attaches.store(true, Ordering::SeqCst);
    }

    /// Sorted snapshot of the links held for a win.
    pub fn links_for(&self, win_id: RecordId) -> Vec<TagId> {
        let links = self.links.lock().expect("links poisoned");
        let mut tags: Vec<TagId> = links
            .get(&win_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        tags.sort();
        tags
    }
}

#[async_trait]
impl WinTagRepository for InMemoryWinTagRepository {
    async fn tag_ids_for_win(
        &self,
        win_id: RecordId,
    ) -> Result<Vec<TagId>, WinTagRepositoryError> {
        Ok(self.links_for(win_id))
    }

    async fn attach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError> {
        if self.fail_attaches.load(Ordering::SeqCst) {
            return Err(WinTagRepositoryError::query("injected attach failure"));
        }
        let mut links = self.links.lock().expect("links poisoned");
        links
            .entry(win_id)
            .or_default()
            .extend(tag_ids.iter().copied());
        Ok(())
    }

    async fn detach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError> {
        let mut links = self.links.lock().expect("links poisoned");
        if let Some(set) = links.get_mut(&win_id) {
            for tag in tag_ids {
                set.remove(tag);
            }
        }
        Ok(())
    }
}
