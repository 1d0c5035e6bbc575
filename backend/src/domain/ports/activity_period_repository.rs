//! Port for the derived activity-period records keyed by payment slot.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::ids::SlotId;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by activity period repository adapters.
    pub enum ActivityPeriodRepositoryError {
        /// Repository connection could not be established.
        Connection => "activity period repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "activity period repository query failed: {message}",
    }
}

/// Persistence port for slot-derived activity periods.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityPeriodRepository: Send + Sync {
    /// How many periods reference the given slot.
    async fn count_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError>;

    /// Delete every period referencing the given slot. Returns the count
    /// deleted.
    async fn delete_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError>;
}

/// In-memory period repository for unit tests and fixture wiring.
#[derive(Debug, Default)]
pub struct InMemoryActivityPeriodRepository {
    periods: Mutex<Vec<SlotId>>,
    fail_deletes: AtomicBool,
}

impl InMemoryActivityPeriodRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `count` periods as generated for `slot_id`.
    pub fn seed_periods(&self, slot_id: SlotId, count: usize) {
        let mut periods = self.periods.lock().expect("periods poisoned");
        periods.extend(std::iter::repeat_n(slot_id, count));
    }

    /// Total periods held, across all slots.
    pub fn total(&self) -> usize {
        self.periods.lock().expect("periods poisoned").len()
    }

    /// Make subsequent deletes fail with a query error.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActivityPeriodRepository for InMemoryActivityPeriodRepository {
    async fn count_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError> {
        Ok(self
            .periods
            .lock()
            .expect("periods poisoned")
            .iter()
            .filter(|slot| **slot == slot_id)
            .count())
    }

    async fn delete_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ActivityPeriodRepositoryError::query(
                "injected delete failure",
            ));
        }
        let mut periods = self.periods.lock().expect("periods poisoned");
        let before = periods.len();
        periods.retain(|slot| *slot != slot_id);
        Ok(before - periods.len())
    }
}
