//! Payment↔slot assignment coordination.
//!
//! A payment is either `Unassigned` (no slot link) or `Assigned` (both FK
//! sides written). This coordinator owns every transition and the derived
//! activity-period lifecycle that rides along with it.
//!
//! Partial failures after the link itself has committed are reported as
//! successful outcomes carrying a warning, never as errors: an orphaned
//! activity period is recoverable data, a payment stuck in `Assigned` while
//! the user is trying to free the slot is the worse failure.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::DomainError;
use super::ids::{PaymentId, SlotId};
use super::ports::{
    ActivityPeriodGenerator, ActivityPeriodGeneratorError, ActivityPeriodRepository,
    ActivityPeriodRepositoryError, PaymentRepository, PaymentRepositoryError,
    PaymentSlotRepository, PaymentSlotRepositoryError,
};

fn map_payment_error(error: PaymentRepositoryError) -> DomainError {
    match error {
        PaymentRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("payment repository unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            DomainError::internal(format!("payment repository error: {message}"))
        }
        PaymentRepositoryError::NotFound { message } => DomainError::not_found(message),
    }
}

fn map_slot_error(error: PaymentSlotRepositoryError) -> DomainError {
    match error {
        PaymentSlotRepositoryError::Connection { message } => DomainError::service_unavailable(
            format!("payment slot repository unavailable: {message}"),
        ),
        PaymentSlotRepositoryError::Query { message } => {
            DomainError::internal(format!("payment slot repository error: {message}"))
        }
    }
}

/// Result of an assignment transition. `warning` is set when a follow-up
/// step failed after the primary state change committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentOutcome {
    /// Human-readable summary of what happened.
    pub summary: String,
    /// Set when activity-period generation or cleanup failed; the caller
    /// must surface it and fix the periods manually.
    pub warning: Option<String>,
}

impl AssignmentOutcome {
    fn ok(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            warning: None,
        }
    }

    fn with_warning(summary: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            warning: Some(warning.into()),
        }
    }
}

/// Coordinator for the payment↔slot state machine.
#[derive(Clone)]
pub struct AssignmentCoordinator<P, S, A, G> {
    payments: Arc<P>,
    slots: Arc<S>,
    periods: Arc<A>,
    generator: Arc<G>,
}

impl<P, S, A, G> AssignmentCoordinator<P, S, A, G> {
    /// Create a coordinator over its four collaborators.
    pub fn new(payments: Arc<P>, slots: Arc<S>, periods: Arc<A>, generator: Arc<G>) -> Self {
        Self {
            payments,
            slots,
            periods,
            generator,
        }
    }
}

impl<P, S, A, G> AssignmentCoordinator<P, S, A, G>
where
    P: PaymentRepository,
    S: PaymentSlotRepository,
    A: ActivityPeriodRepository,
    G: ActivityPeriodGenerator,
{
    /// Assign the payment to `slot`, or unassign it when `slot` is `None`.
    ///
    /// Exclusivity is not enforced: assigning a second payment to an
    /// already-claimed slot overwrites the slot side, last write wins.
    /// See the repository port notes for the rationale.
    pub async fn assign_payment_to_slot(
        &self,
        payment_id: PaymentId,
        slot: Option<SlotId>,
    ) -> Result<AssignmentOutcome, DomainError> {
        match slot {
            Some(slot_id) => self.assign(payment_id, slot_id).await,
            None => self.unassign(payment_id).await,
        }
    }

    async fn assign(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<AssignmentOutcome, DomainError> {
        // The slot must exist before anything is written; a dangling
        // `payment_slot_id` would otherwise commit.
        let slot = self
            .slots
            .find_by_id(slot_id)
            .await
            .map_err(map_slot_error)?;
        if slot.is_none() {
            return Err(DomainError::not_found(format!("payment slot {slot_id}")));
        }

        self.payments
            .link(payment_id, slot_id)
            .await
            .map_err(map_payment_error)?;
        info!(payment = %payment_id, slot = %slot_id, "payment assigned to slot");

        // The link above stays committed whatever happens next.
        match self.generator.generate(slot_id).await {
            Ok(generated) if generated.periods_created == 0 => {
                let note = generated
                    .message
                    .unwrap_or_else(|| "activity periods already exist for this slot".to_owned());
                Ok(AssignmentOutcome::ok(format!("Payment assigned; {note}")))
            }
            Ok(generated) => Ok(AssignmentOutcome::ok(format!(
                "Payment assigned; created {} activity period(s) for {}",
                generated.periods_created, generated.client_name
            ))),
            Err(ActivityPeriodGeneratorError::Failed { message }) => {
                warn!(
                    payment = %payment_id,
                    slot = %slot_id,
                    error = %message,
                    "activity period generation failed after assignment"
                );
                Ok(AssignmentOutcome::with_warning(
                    "Payment assigned",
                    format!(
                        "activity periods could not be generated ({message}); \
                         create them manually"
                    ),
                ))
            }
        }
    }

    async fn unassign(&self, payment_id: PaymentId) -> Result<AssignmentOutcome, DomainError> {
        // Read the current link before mutating anything.
        let previous = self
            .payments
            .current_slot(payment_id)
            .await
            .map_err(map_payment_error)?;

        let Some(previous_slot) = previous else {
            return Ok(AssignmentOutcome::ok("Payment was already unassigned"));
        };

        self.payments
            .unlink(payment_id, previous_slot)
            .await
            .map_err(map_payment_error)?;
        info!(payment = %payment_id, slot = %previous_slot, "payment unassigned from slot");

        match self.periods.delete_for_slot(previous_slot).await {
            Ok(deleted) => Ok(AssignmentOutcome::ok(format!(
                "Payment unassigned; deleted {deleted} activity period(s)"
            ))),
            Err(ActivityPeriodRepositoryError::Connection { message })
            | Err(ActivityPeriodRepositoryError::Query { message }) => {
                warn!(
                    payment = %payment_id,
                    slot = %previous_slot,
                    error = %message,
                    "activity period cleanup failed after unassignment"
                );
                Ok(AssignmentOutcome::with_warning(
                    "Payment unassigned",
                    format!(
                        "activity periods for the released slot could not be deleted \
                         ({message}); remove them manually"
                    ),
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "assignment_tests.rs"]
mod tests;
