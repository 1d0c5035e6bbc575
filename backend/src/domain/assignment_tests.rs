//! Behavioural coverage for the assignment coordinator.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::{fixture, rstest};

use crate::domain::error::ErrorCode;
use crate::domain::ids::{PaymentId, PlanId, SlotId};
use crate::domain::ports::{
    ActivityPeriodGenerator, ActivityPeriodGeneratorError, ActivityPeriodRepository,
    GeneratedPeriods, InMemoryActivityPeriodRepository, InMemoryPaymentRepository,
    InMemoryPaymentSlotRepository, PaymentRepository,
};

use super::{AssignmentCoordinator, AssignmentOutcome};

/// Test generator that actually records periods in the in-memory
/// repository, so round trips can assert on counts.
struct RecordingGenerator {
    periods: Arc<InMemoryActivityPeriodRepository>,
    creates: usize,
    fail: bool,
}

#[async_trait]
impl ActivityPeriodGenerator for RecordingGenerator {
    async fn generate(
        &self,
        slot_id: SlotId,
    ) -> Result<GeneratedPeriods, ActivityPeriodGeneratorError> {
        if self.fail {
            return Err(ActivityPeriodGeneratorError::failed("generator offline"));
        }
        let existing = self.periods.count_for_slot(slot_id).await.map_err(|err| {
            ActivityPeriodGeneratorError::failed(err.to_string())
        })?;
        if existing > 0 {
            return Ok(GeneratedPeriods {
                periods_created: 0,
                client_name: "Ada Client".to_owned(),
                message: Some("periods already exist".to_owned()),
            });
        }
        self.periods.seed_periods(slot_id, self.creates);
        Ok(GeneratedPeriods {
            periods_created: self.creates,
            client_name: "Ada Client".to_owned(),
            message: None,
        })
    }
}

struct Harness {
    payments: Arc<InMemoryPaymentRepository>,
    slots: Arc<InMemoryPaymentSlotRepository>,
    periods: Arc<InMemoryActivityPeriodRepository>,
    coordinator: AssignmentCoordinator<
        InMemoryPaymentRepository,
        InMemoryPaymentSlotRepository,
        InMemoryActivityPeriodRepository,
        RecordingGenerator,
    >,
}

impl Harness {
    fn seed_slot(&self, slot_id: SlotId) {
        self.slots.seed_slot(slot_id, PlanId::random());
    }
}

fn harness_with(creates: usize, fail_generator: bool) -> Harness {
    let payments = Arc::new(InMemoryPaymentRepository::new());
    let slots = Arc::new(InMemoryPaymentSlotRepository::new());
    let periods = Arc::new(InMemoryActivityPeriodRepository::new());
    let generator = Arc::new(RecordingGenerator {
        periods: Arc::clone(&periods),
        creates,
        fail: fail_generator,
    });
    let coordinator = AssignmentCoordinator::new(
        Arc::clone(&payments),
        Arc::clone(&slots),
        Arc::clone(&periods),
        generator,
    );
    Harness {
        payments,
        slots,
        periods,
        coordinator,
    }
}

#[fixture]
fn slot() -> SlotId {
    SlotId::random()
}

#[rstest]
#[tokio::test]
async fn assign_then_unassign_restores_the_period_count(slot: SlotId) {
    let harness = harness_with(2, false);
    harness.seed_slot(slot);
    let payment = PaymentId::random();
    harness.payments.seed_payment(payment);
    let before = harness.periods.total();

    let assigned = harness
        .coordinator
        .assign_payment_to_slot(payment, Some(slot))
        .await
        .expect("assign succeeds");
    assert!(assigned.warning.is_none());
    assert!(assigned.summary.contains("2 activity period(s)"));
    assert!(assigned.summary.contains("Ada Client"));
    assert_eq!(harness.periods.total(), before + 2);

    let unassigned = harness
        .coordinator
        .assign_payment_to_slot(payment, None)
        .await
        .expect("unassign succeeds");
    assert!(unassigned.warning.is_none());
    assert!(unassigned.summary.contains("deleted 2 activity period(s)"));
    assert_eq!(harness.periods.total(), before);
    assert_eq!(
        harness
            .payments
            .current_slot(payment)
            .await
            .expect("payment exists"),
        None
    );
}

#[rstest]
#[tokio::test]
async fn repeat_generation_reports_already_exists_without_duplicates(slot: SlotId) {
    let harness = harness_with(1, false);
    harness.seed_slot(slot);
    let first = PaymentId::random();
    let second = PaymentId::random();
    harness.payments.seed_payment(first);
    harness.payments.seed_payment(second);

    harness
        .coordinator
        .assign_payment_to_slot(first, Some(slot))
        .await
        .expect("first assign succeeds");
    let outcome = harness
        .coordinator
        .assign_payment_to_slot(second, Some(slot))
        .await
        .expect("second assign succeeds");

    // Zero-created/already-exists is a plain success, not a warning.
    assert!(outcome.warning.is_none());
    assert!(outcome.summary.contains("periods already exist"));
    assert_eq!(harness.periods.total(), 1);
}

#[rstest]
#[tokio::test]
async fn generator_failure_keeps_the_link_and_warns(slot: SlotId) {
    let harness = harness_with(1, true);
    harness.seed_slot(slot);
    let payment = PaymentId::random();
    harness.payments.seed_payment(payment);

    let outcome = harness
        .coordinator
        .assign_payment_to_slot(payment, Some(slot))
        .await
        .expect("assignment itself succeeds");

    let warning = outcome.warning.expect("warning set");
    assert!(warning.contains("generator offline"));
    assert!(warning.contains("manually"));
    // The payment→slot link from step 1 stays committed.
    assert_eq!(
        harness
            .payments
            .current_slot(payment)
            .await
            .expect("payment exists"),
        Some(slot)
    );
}

#[rstest]
#[tokio::test]
async fn cleanup_failure_still_releases_the_payment(slot: SlotId) {
    let harness = harness_with(1, false);
    harness.seed_slot(slot);
    let payment = PaymentId::random();
    harness.payments.seed_payment(payment);
    harness
        .coordinator
        .assign_payment_to_slot(payment, Some(slot))
        .await
        .expect("assign succeeds");

    harness.periods.fail_deletes();
    let outcome = harness
        .coordinator
        .assign_payment_to_slot(payment, None)
        .await
        .expect("unassign succeeds despite cleanup failure");

    assert!(outcome.warning.expect("warning set").contains("manually"));
    assert_eq!(
        harness
            .payments
            .current_slot(payment)
            .await
            .expect("payment exists"),
        None
    );
    // The orphaned periods remain for manual cleanup.
    assert_eq!(harness.periods.total(), 1);
}

#[rstest]
#[tokio::test]
async fn second_assignment_overwrites_the_slot_claim(slot: SlotId) {
    let harness = harness_with(1, false);
    harness.seed_slot(slot);
    let first = PaymentId::random();
    let second = PaymentId::random();
    harness.payments.seed_payment(first);
    harness.payments.seed_payment(second);

    harness
        .coordinator
        .assign_payment_to_slot(first, Some(slot))
        .await
        .expect("first assign succeeds");
    harness
        .coordinator
        .assign_payment_to_slot(second, Some(slot))
        .await
        .expect("second assign succeeds");

    // Documented gap: no exclusivity. The slot records the last writer
    // while both payments believe they are assigned.
    assert_eq!(harness.payments.claimant_of(slot), Some(second));
    assert_eq!(
        harness
            .payments
            .current_slot(first)
            .await
            .expect("payment exists"),
        Some(slot)
    );
    assert_eq!(
        harness
            .payments
            .current_slot(second)
            .await
            .expect("payment exists"),
        Some(slot)
    );
}

#[rstest]
#[tokio::test]
async fn unassigning_an_unassigned_payment_is_a_no_op(slot: SlotId) {
    let _ = slot;
    let harness = harness_with(1, false);
    let payment = PaymentId::random();
    harness.payments.seed_payment(payment);

    let outcome = harness
        .coordinator
        .assign_payment_to_slot(payment, None)
        .await
        .expect("no-op unassign succeeds");

    assert_eq!(
        outcome,
        AssignmentOutcome {
            summary: "Payment was already unassigned".to_owned(),
            warning: None,
        }
    );
}

#[rstest]
#[tokio::test]
async fn unknown_payment_is_not_found(slot: SlotId) {
    let harness = harness_with(1, false);
    harness.seed_slot(slot);

    let error = harness
        .coordinator
        .assign_payment_to_slot(PaymentId::random(), Some(slot))
        .await
        .expect_err("unknown payment rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn assigning_to_a_missing_slot_is_not_found_without_side_effects(slot: SlotId) {
    let harness = harness_with(1, false);
    let payment = PaymentId::random();
    harness.payments.seed_payment(payment);

    let error = harness
        .coordinator
        .assign_payment_to_slot(payment, Some(slot))
        .await
        .expect_err("missing slot rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
    // Nothing committed: the payment stays unassigned and no periods exist.
    assert_eq!(
        harness
            .payments
            .current_slot(payment)
            .await
            .expect("payment exists"),
        None
    );
    assert_eq!(harness.periods.total(), 0);
}
