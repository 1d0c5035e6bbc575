//! Payment schedule expansion.
//!
//! Turns a plan's slot source (template or custom list) into concrete,
//! dated payment slots. The engine inserts the slots and returns them; it
//! never mutates the plan row itself. Callers write the derived total back
//! onto the plan.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use tracing::debug;

use super::billing::{
    CUSTOM_PROVENANCE, CustomSlot, NewPaymentSlot, PaymentSlot, SlotSource, TEMPLATE_PROVENANCE,
    TemplateSlot,
};
use super::error::DomainError;
use super::ids::PlanId;
use super::money::AmountCents;
use super::ports::{
    PaymentSlotRepository, PaymentSlotRepositoryError, TemplateRepository, TemplateRepositoryError,
};

fn map_template_error(error: TemplateRepositoryError) -> DomainError {
    match error {
        TemplateRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("template repository unavailable: {message}"))
        }
        TemplateRepositoryError::Query { message } => {
            DomainError::internal(format!("template repository error: {message}"))
        }
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

/// Due date for an installment delayed by whole calendar months.
///
/// Day-of-month clamps to the last valid day of the target month, so a term
/// starting Jan 31 puts the one-month installment on Feb 28 (or 29).
fn due_date(term_starts_on: NaiveDate, months_to_delay: u32) -> Result<NaiveDate, DomainError> {
    term_starts_on
        .checked_add_months(Months::new(months_to_delay))
        .ok_or_else(|| {
            DomainError::invalid_request(format!(
                "due date {months_to_delay} months after {term_starts_on} is out of range"
            ))
        })
}

fn slot_from_definition(
    term_starts_on: NaiveDate,
    amount_due: AmountCents,
    months_to_delay: u32,
    provenance: &str,
) -> Result<NewPaymentSlot, DomainError> {
    if amount_due.is_negative() {
        return Err(DomainError::invalid_request(
            "slot amount due must not be negative",
        ));
    }
    Ok(NewPaymentSlot {
        amount_due,
        amount_paid: AmountCents::ZERO,
        due_on: due_date(term_starts_on, months_to_delay)?,
        notes: provenance.to_owned(),
    })
}

/// Expands plan slot sources into dated payment slots.
#[derive(Clone)]
pub struct ScheduleEngine<T, P> {
    templates: Arc<T>,
    slots: Arc<P>,
}

impl<T, P> ScheduleEngine<T, P> {
    /// Create an engine over the template and slot repositories.
    pub fn new(templates: Arc<T>, slots: Arc<P>) -> Self {
        Self { templates, slots }
    }
}

impl<T, P> ScheduleEngine<T, P>
where
    T: TemplateRepository,
    P: PaymentSlotRepository,
{
    /// Expand `source` into payment slots for `plan_id`, dated from
    /// `term_starts_on`, and bulk-insert them.
    ///
    /// An empty template or custom list yields an empty schedule, not an
    /// error. A storage failure during insertion surfaces immediately; the
    /// already-created plan row is not rolled back here.
    pub async fn expand_slots(
        &self,
        plan_id: PlanId,
        source: SlotSource,
        term_starts_on: NaiveDate,
    ) -> Result<Vec<PaymentSlot>, DomainError> {
        let definitions = match source {
            SlotSource::Template(template_id) => {
                self.templates
                    .find_template(template_id)
                    .await
                    .map_err(map_template_error)?
                    .ok_or_else(|| {
                        DomainError::not_found(format!("payment plan template {template_id}"))
                    })?;
                let slots = self
                    .templates
                    .slots_for_template(template_id)
                    .await
                    .map_err(map_template_error)?;
                template_definitions(term_starts_on, &slots)?
            }
            SlotSource::Custom(custom) => custom_definitions(term_starts_on, &custom)?,
        };

        if definitions.is_empty() {
            return Ok(Vec::new());
        }

        let inserted = self
            .slots
            .insert_many(plan_id, definitions)
            .await
            .map_err(map_slot_error)?;

        debug!(
            plan = %plan_id,
            slots = inserted.len(),
            "payment schedule expanded"
        );
        Ok(inserted)
    }
}

fn template_definitions(
    term_starts_on: NaiveDate,
    slots: &[TemplateSlot],
) -> Result<Vec<NewPaymentSlot>, DomainError> {
    slots
        .iter()
        .map(|slot| {
            slot_from_definition(
                term_starts_on,
                slot.amount_due,
                slot.months_to_delay,
                TEMPLATE_PROVENANCE,
            )
        })
        .collect()
}

fn custom_definitions(
    term_starts_on: NaiveDate,
    slots: &[CustomSlot],
) -> Result<Vec<NewPaymentSlot>, DomainError> {
    slots
        .iter()
        .map(|slot| {
            slot_from_definition(
                term_starts_on,
                slot.amount_due,
                slot.months_to_delay,
                CUSTOM_PROVENANCE,
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
