//! Port for the payment side of the slot assignment.
//!
//! The payment↔slot link is stored in both directions for query
//! convenience. This port is the only place either side is written; the
//! assignment coordinator is its only caller, which keeps the two foreign
//! keys from drifting apart across call sites.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ids::{PaymentId, SlotId};

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by payment repository adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "payment repository query failed: {message}",
        /// The referenced payment does not exist.
        NotFound => "payment not found: {message}",
    }
}

/// Persistence port for the payment↔slot link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// The slot the payment currently claims, if any. Fails with `NotFound`
    /// when the payment itself does not exist.
    async fn current_slot(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<SlotId>, PaymentRepositoryError>;

    /// Write both sides of the link: the payment's `payment_slot_id` and
    /// the slot's `payment_id`. Fails with `NotFound` and writes nothing
    /// when the payment does not exist.
    ///
    /// No exclusivity check is performed; if another payment already claims
    /// the slot, the slot side is overwritten and the last write wins. A
    /// known gap, deliberately not resolved here.
    async fn link(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError>;

    /// Clear both sides of the link between this payment and `slot_id`.
    async fn unlink(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError>;
}

/// In-memory payment repository for unit tests and fixture wiring.
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    payments: Mutex<HashMap<PaymentId, Option<SlotId>>>,
    slot_claims: Mutex<HashMap<SlotId, PaymentId>>,
}

impl InMemoryPaymentRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an unassigned payment.
    pub fn seed_payment(&self, payment_id: PaymentId) {
        self.payments
            .lock()
            .expect("payments poisoned")
            .insert(payment_id, None);
    }

    /// The payment currently claiming `slot_id`, if any.
    pub fn claimant_of(&self, slot_id: SlotId) -> Option<PaymentId> {
        self.slot_claims
            .lock()
            .expect("claims poisoned")
            .get(&slot_id)
            .copied()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn current_slot(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<SlotId>, PaymentRepositoryError> {
        self.payments
            .lock()
            .expect("payments poisoned")
            .get(&payment_id)
            .copied()
            .ok_or_else(|| PaymentRepositoryError::not_found(payment_id.to_string()))
    }

    async fn link(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError> {
        let mut payments = self.payments.lock().expect("payments poisoned");
        let Some(entry) = payments.get_mut(&payment_id) else {
            return Err(PaymentRepositoryError::not_found(payment_id.to_string()));
        };
        *entry = Some(slot_id);
        // Slot side overwrites any previous claimant; last write wins.
        self.slot_claims
            .lock()
            .expect("claims poisoned")
            .insert(slot_id, payment_id);
        Ok(())
    }

    async fn unlink(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError> {
        let mut payments = self.payments.lock().expect("payments poisoned");
        let Some(entry) = payments.get_mut(&payment_id) else {
            return Err(PaymentRepositoryError::not_found(payment_id.to_string()));
        };
        *entry = None;
        let mut claims = self.slot_claims.lock().expect("claims poisoned");
        if claims.get(&slot_id) == Some(&payment_id) {
            claims.remove(&slot_id);
        }
        Ok(())
    }
}
