//! Port for persisting and reading concrete payment slots.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::billing::{NewPaymentSlot, PaymentSlot};
use crate::domain::ids::{PlanId, SlotId};
use crate::domain::money::AmountCents;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by payment slot repository adapters.
    pub enum PaymentSlotRepositoryError {
        /// Repository connection could not be established.
        Connection => "payment slot repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "payment slot repository query failed: {message}",
    }
}

/// Persistence port for payment slots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentSlotRepository: Send + Sync {
    /// Bulk-insert slots for a plan and return them with assigned ids,
    /// preserving input order.
    async fn insert_many(
        &self,
        plan_id: PlanId,
        slots: Vec<NewPaymentSlot>,
    ) -> Result<Vec<PaymentSlot>, PaymentSlotRepositoryError>;

    /// Look a slot up by id.
    async fn find_by_id(
        &self,
        slot_id: SlotId,
    ) -> Result<Option<PaymentSlot>, PaymentSlotRepositoryError>;
}

/// In-memory slot repository for unit tests and fixture wiring.
#[derive(Debug, Default)]
pub struct InMemoryPaymentSlotRepository {
    slots: Mutex<Vec<PaymentSlot>>,
    fail_inserts: AtomicBool,
}

impl InMemoryPaymentSlotRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot under a known id so lookups can find it.
    pub fn seed_slot(&self, slot_id: SlotId, plan_id: PlanId) {
        self.slots
            .lock()
            .expect("slots poisoned")
            .push(PaymentSlot {
                id: slot_id,
                plan_id,
                amount_due: AmountCents::ZERO,
                amount_paid: AmountCents::ZERO,
                due_on: NaiveDate::default(),
                notes: String::new(),
                payment_id: None,
            });
    }

    /// Every slot persisted for the given plan, in insertion order.
    pub fn slots_for_plan(&self, plan_id: PlanId) -> Vec<PaymentSlot> {
        self.slots
            .lock()
            .expect("slots poisoned")
            .iter()
            .filter(|slot| slot.plan_id == plan_id)
            .cloned()
            .collect()
    }

    /// Make subsequent inserts fail with a query error.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentSlotRepository for InMemoryPaymentSlotRepository {
    async fn insert_many(
        &self,
        plan_id: PlanId,
        slots: Vec<NewPaymentSlot>,
    ) -> Result<Vec<PaymentSlot>, PaymentSlotRepositoryError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(PaymentSlotRepositoryError::query("injected insert failure"));
        }
        let inserted: Vec<PaymentSlot> = slots
            .into_iter()
            .map(|slot| PaymentSlot {
                id: SlotId::random(),
                plan_id,
                amount_due: slot.amount_due,
                amount_paid: slot.amount_paid,
                due_on: slot.due_on,
                notes: slot.notes,
                payment_id: None,
            })
            .collect();
        self.slots
            .lock()
            .expect("slots poisoned")
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn find_by_id(
        &self,
        slot_id: SlotId,
    ) -> Result<Option<PaymentSlot>, PaymentSlotRepositoryError> {
        Ok(self
            .slots
            .lock()
            .expect("slots poisoned")
            .iter()
            .find(|slot| slot.id == slot_id)
            .cloned())
    }
}
