//! Row types bridging the domain field structs and the Diesel schema.
//!
//! Insert rows carry the generated id, the parent foreign key, and the
//! recording actor alongside the editable fields; change sets carry the
//! editable fields only. `treat_none_as_null` keeps update semantics at
//! "rewrite every field": an absent optional really clears the column.

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::billing::PaymentSlot;
use crate::domain::ids::{PaymentId, PlanId, SlotId};
use crate::domain::money::AmountCents;
use crate::domain::records::{
    ActivityPeriodFields, AssignmentFields, GoalFields, NpsScoreFields, PaymentPlanFields,
    PaymentSlotFields, PlanSource, TestimonialFields, WinFields,
};

use super::schema::{
    activity_periods, assignments, goals, nps_scores, payment_plans, payment_slots, testimonials,
    wins,
};

fn template_uuid(source: PlanSource) -> Option<Uuid> {
    match source {
        PlanSource::Template(id) => Some(id.into_uuid()),
        PlanSource::Custom => None,
    }
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = goals)]
pub struct NewGoalRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub title: String,
    pub details: Option<String>,
    pub target_on: Option<NaiveDate>,
    pub achieved: bool,
}

impl NewGoalRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &GoalFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            title: fields.title.clone(),
            details: fields.details.clone(),
            target_on: fields.target_on,
            achieved: fields.achieved,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = goals, treat_none_as_null = true)]
pub struct GoalChanges {
    pub title: String,
    pub details: Option<String>,
    pub target_on: Option<NaiveDate>,
    pub achieved: bool,
}

impl From<&GoalFields> for GoalChanges {
    fn from(fields: &GoalFields) -> Self {
        Self {
            title: fields.title.clone(),
            details: fields.details.clone(),
            target_on: fields.target_on,
            achieved: fields.achieved,
        }
    }
}

// ---------------------------------------------------------------------------
// Wins
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = wins)]
pub struct NewWinRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub title: String,
    pub won_on: NaiveDate,
    pub notes: Option<String>,
}

impl NewWinRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &WinFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            title: fields.title.clone(),
            won_on: fields.won_on,
            notes: fields.notes.clone(),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = wins, treat_none_as_null = true)]
pub struct WinChanges {
    pub title: String,
    pub won_on: NaiveDate,
    pub notes: Option<String>,
}

impl From<&WinFields> for WinChanges {
    fn from(fields: &WinFields) -> Self {
        Self {
            title: fields.title.clone(),
            won_on: fields.won_on,
            notes: fields.notes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = assignments)]
pub struct NewAssignmentRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub title: String,
    pub assigned_on: NaiveDate,
    pub completed: bool,
}

impl NewAssignmentRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &AssignmentFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            title: fields.title.clone(),
            assigned_on: fields.assigned_on,
            completed: fields.completed,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = assignments)]
pub struct AssignmentChanges {
    pub title: String,
    pub assigned_on: NaiveDate,
    pub completed: bool,
}

impl From<&AssignmentFields> for AssignmentChanges {
    fn from(fields: &AssignmentFields) -> Self {
        Self {
            title: fields.title.clone(),
            assigned_on: fields.assigned_on,
            completed: fields.completed,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity periods
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = activity_periods)]
pub struct NewActivityPeriodRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Option<Uuid>,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub payment_slot_id: Option<Uuid>,
}

impl NewActivityPeriodRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &ActivityPeriodFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: Some(actor),
            starts_on: fields.starts_on,
            ends_on: fields.ends_on,
            payment_slot_id: fields.payment_slot_id.map(SlotId::into_uuid),
        }
    }

    /// A system-generated period derived from a payment slot; no recording
    /// actor.
    pub fn generated(
        id: Uuid,
        client_id: Uuid,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
        slot_id: SlotId,
    ) -> Self {
        Self {
            id,
            client_id,
            recorded_by: None,
            starts_on,
            ends_on,
            payment_slot_id: Some(slot_id.into_uuid()),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = activity_periods, treat_none_as_null = true)]
pub struct ActivityPeriodChanges {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub payment_slot_id: Option<Uuid>,
}

impl From<&ActivityPeriodFields> for ActivityPeriodChanges {
    fn from(fields: &ActivityPeriodFields) -> Self {
        Self {
            starts_on: fields.starts_on,
            ends_on: fields.ends_on,
            payment_slot_id: fields.payment_slot_id.map(SlotId::into_uuid),
        }
    }
}

// ---------------------------------------------------------------------------
// NPS scores
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = nps_scores)]
pub struct NewNpsScoreRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub score: i16,
    pub recorded_on: NaiveDate,
    pub comment: Option<String>,
}

impl NewNpsScoreRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &NpsScoreFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            score: fields.score,
            recorded_on: fields.recorded_on,
            comment: fields.comment.clone(),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = nps_scores, treat_none_as_null = true)]
pub struct NpsScoreChanges {
    pub score: i16,
    pub recorded_on: NaiveDate,
    pub comment: Option<String>,
}

impl From<&NpsScoreFields> for NpsScoreChanges {
    fn from(fields: &NpsScoreFields) -> Self {
        Self {
            score: fields.score,
            recorded_on: fields.recorded_on,
            comment: fields.comment.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = testimonials)]
pub struct NewTestimonialRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub quote: String,
    pub given_on: NaiveDate,
    pub published: bool,
}

impl NewTestimonialRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &TestimonialFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            quote: fields.quote.clone(),
            given_on: fields.given_on,
            published: fields.published,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = testimonials)]
pub struct TestimonialChanges {
    pub quote: String,
    pub given_on: NaiveDate,
    pub published: bool,
}

impl From<&TestimonialFields> for TestimonialChanges {
    fn from(fields: &TestimonialFields) -> Self {
        Self {
            quote: fields.quote.clone(),
            given_on: fields.given_on,
            published: fields.published,
        }
    }
}

// ---------------------------------------------------------------------------
// Payment plans
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = payment_plans)]
pub struct NewPaymentPlanRow {
    pub id: Uuid,
    pub client_id: Uuid,
    pub recorded_by: Uuid,
    pub template_id: Option<Uuid>,
    pub term_starts_on: NaiveDate,
    pub term_ends_on: NaiveDate,
    pub total_amount_cents: i64,
}

impl NewPaymentPlanRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &PaymentPlanFields) -> Self {
        Self {
            id,
            client_id: parent,
            recorded_by: actor,
            template_id: template_uuid(fields.source),
            term_starts_on: fields.term_starts_on,
            term_ends_on: fields.term_ends_on,
            total_amount_cents: fields.total_amount.cents(),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = payment_plans, treat_none_as_null = true)]
pub struct PaymentPlanChanges {
    pub template_id: Option<Uuid>,
    pub term_starts_on: NaiveDate,
    pub term_ends_on: NaiveDate,
    pub total_amount_cents: i64,
}

impl From<&PaymentPlanFields> for PaymentPlanChanges {
    fn from(fields: &PaymentPlanFields) -> Self {
        Self {
            template_id: template_uuid(fields.source),
            term_starts_on: fields.term_starts_on,
            term_ends_on: fields.term_ends_on,
            total_amount_cents: fields.total_amount.cents(),
        }
    }
}

// ---------------------------------------------------------------------------
// Payment slots
// ---------------------------------------------------------------------------

#[derive(Debug, Insertable)]
#[diesel(table_name = payment_slots)]
pub struct NewPaymentSlotRow {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub recorded_by: Option<Uuid>,
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    pub due_on: NaiveDate,
    pub notes: String,
    pub payment_id: Option<Uuid>,
}

impl NewPaymentSlotRow {
    pub fn new(id: Uuid, parent: Uuid, actor: Uuid, fields: &PaymentSlotFields) -> Self {
        Self {
            id,
            plan_id: parent,
            recorded_by: Some(actor),
            amount_due_cents: fields.amount_due.cents(),
            amount_paid_cents: fields.amount_paid.cents(),
            due_on: fields.due_on,
            notes: fields.notes.clone().unwrap_or_default(),
            payment_id: fields.payment_id.map(PaymentId::into_uuid),
        }
    }

    /// A slot produced by schedule expansion; no recording actor and no
    /// payment claim yet.
    pub fn expanded(plan_id: PlanId, slot: &PaymentSlot) -> Self {
        Self {
            id: slot.id.into_uuid(),
            plan_id: plan_id.into_uuid(),
            recorded_by: None,
            amount_due_cents: slot.amount_due.cents(),
            amount_paid_cents: slot.amount_paid.cents(),
            due_on: slot.due_on,
            notes: slot.notes.clone(),
            payment_id: slot.payment_id.map(PaymentId::into_uuid),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = payment_slots, treat_none_as_null = true)]
pub struct PaymentSlotChanges {
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    pub due_on: NaiveDate,
    pub notes: String,
    pub payment_id: Option<Uuid>,
}

impl From<&PaymentSlotFields> for PaymentSlotChanges {
    fn from(fields: &PaymentSlotFields) -> Self {
        Self {
            amount_due_cents: fields.amount_due.cents(),
            amount_paid_cents: fields.amount_paid.cents(),
            due_on: fields.due_on,
            notes: fields.notes.clone().unwrap_or_default(),
            payment_id: fields.payment_id.map(PaymentId::into_uuid),
        }
    }
}

/// Read row for a payment slot, as selected by the billing adapters.
#[derive(Debug, Queryable)]
pub struct PaymentSlotRow {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub amount_due_cents: i64,
    pub amount_paid_cents: i64,
    pub due_on: NaiveDate,
    pub notes: String,
    pub payment_id: Option<Uuid>,
}

impl From<PaymentSlotRow> for PaymentSlot {
    fn from(row: PaymentSlotRow) -> Self {
        Self {
            id: SlotId::from_uuid(row.id),
            plan_id: PlanId::from_uuid(row.plan_id),
            amount_due: AmountCents::new(row.amount_due_cents),
            amount_paid: AmountCents::new(row.amount_paid_cents),
            due_on: row.due_on,
            notes: row.notes,
            payment_id: row.payment_id.map(PaymentId::from_uuid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn plan_rows_store_the_template_source_as_a_foreign_key() {
        let template = crate::domain::ids::TemplateId::random();
        let fields = PaymentPlanFields {
            source: PlanSource::Template(template),
            term_starts_on: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            term_ends_on: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date"),
            total_amount: AmountCents::new(1200_00),
        };
        let changes = PaymentPlanChanges::from(&fields);
        assert_eq!(changes.template_id, Some(template.into_uuid()));

        let custom = PaymentPlanFields {
            source: PlanSource::Custom,
            ..fields
        };
        assert_eq!(PaymentPlanChanges::from(&custom).template_id, None);
    }

    #[rstest]
    fn slot_rows_round_trip_into_domain_slots() {
        let row = PaymentSlotRow {
            id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            amount_due_cents: 500_00,
            amount_paid_cents: 0,
            due_on: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            notes: "Generated from payment plan template".to_owned(),
            payment_id: None,
        };
        let slot = PaymentSlot::from(row);
        assert_eq!(slot.amount_due, AmountCents::new(500_00));
        assert_eq!(slot.amount_paid, AmountCents::ZERO);
        assert_eq!(slot.payment_id, None);
    }

    #[rstest]
    fn generated_periods_carry_no_recording_actor() {
        let row = NewActivityPeriodRow::generated(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date"),
            SlotId::random(),
        );
        assert_eq!(row.recorded_by, None);
        assert!(row.payment_slot_id.is_some());
    }
}
