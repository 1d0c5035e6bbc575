//! Sub-record kind descriptors and their editable field sets.
//!
//! Rather than repeating one diff-and-apply routine per sub-collection,
//! the per-kind knowledge lives in a small descriptor
//! table: each kind is a unit struct implementing [`RecordKind`], naming its
//! collection, its field struct, and its field-level validation. The
//! reconciler itself is written once, generically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::ids::{PaymentId, RecordId, SlotId, TemplateId};
use super::money::AmountCents;

/// Descriptor for one reconcilable sub-collection.
pub trait RecordKind: Copy + Send + Sync + 'static {
    /// The full editable field set for this kind. Updates rewrite every
    /// field; there are no partial-merge semantics.
    type Fields: Clone
        + std::fmt::Debug
        + PartialEq
        + Send
        + Sync
        + Serialize
        + serde::de::DeserializeOwned
        + 'static;

    /// Collection name used in log events and error messages.
    const COLLECTION: &'static str;

    /// Check schema-level constraints before any storage operation runs.
    fn validate(fields: &Self::Fields) -> Result<(), DomainError>;
}

/// One caller-supplied desired item: an absent id marks a brand-new record,
/// a present id marks an update target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct DesiredRecord<K: RecordKind> {
    /// Existing record identifier, if this item was persisted before.
    pub id: Option<RecordId>,
    /// The full field set the record should carry after the call.
    #[serde(flatten)]
    pub fields: K::Fields,
}

impl<K: RecordKind> DesiredRecord<K> {
    /// A desired item for a brand-new record.
    pub fn new(fields: K::Fields) -> Self {
        Self { id: None, fields }
    }

    /// A desired item targeting an already-persisted record.
    pub fn existing(id: RecordId, fields: K::Fields) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_request(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_non_negative(amount: AmountCents, field: &str) -> Result<(), DomainError> {
    if amount.is_negative() {
        return Err(DomainError::invalid_request(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

fn require_ordered_dates(
    start: NaiveDate,
    end: NaiveDate,
    what: &str,
) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::invalid_request(format!(
            "{what} must not end before it starts"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// Editable fields of a client goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFields {
    pub title: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub target_on: Option<NaiveDate>,
    #[serde(default)]
    pub achieved: bool,
}

/// Kind descriptor for client goals.
#[derive(Debug, Clone, Copy)]
pub struct GoalKind;

impl RecordKind for GoalKind {
    type Fields = GoalFields;
    const COLLECTION: &'static str = "goals";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_non_empty(&fields.title, "goal title")
    }
}

// ---------------------------------------------------------------------------
// Wins
// ---------------------------------------------------------------------------

/// Editable fields of a client win. Tag links are reconciled separately by
/// the win service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinFields {
    pub title: String,
    pub won_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Kind descriptor for client wins.
#[derive(Debug, Clone, Copy)]
pub struct WinKind;

impl RecordKind for WinKind {
    type Fields = WinFields;
    const COLLECTION: &'static str = "wins";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_non_empty(&fields.title, "win title")
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

/// Editable fields of a client assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFields {
    pub title: String,
    pub assigned_on: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

/// Kind descriptor for client assignments.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentKind;

impl RecordKind for AssignmentKind {
    type Fields = AssignmentFields;
    const COLLECTION: &'static str = "assignments";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_non_empty(&fields.title, "assignment title")
    }
}

// ---------------------------------------------------------------------------
// Activity periods
// ---------------------------------------------------------------------------

/// Editable fields of an activity period. `payment_slot_id` records which
/// slot generated the period, when any did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPeriodFields {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub payment_slot_id: Option<SlotId>,
}

/// Kind descriptor for activity periods.
#[derive(Debug, Clone, Copy)]
pub struct ActivityPeriodKind;

impl RecordKind for ActivityPeriodKind {
    type Fields = ActivityPeriodFields;
    const COLLECTION: &'static str = "activity_periods";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_ordered_dates(fields.starts_on, fields.ends_on, "activity period")
    }
}

// ---------------------------------------------------------------------------
// NPS scores
// ---------------------------------------------------------------------------

/// Editable fields of an NPS score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpsScoreFields {
    pub score: i16,
    pub recorded_on: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Kind descriptor for NPS scores.
#[derive(Debug, Clone, Copy)]
pub struct NpsScoreKind;

impl RecordKind for NpsScoreKind {
    type Fields = NpsScoreFields;
    const COLLECTION: &'static str = "nps_scores";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        if !(0..=10).contains(&fields.score) {
            return Err(DomainError::invalid_request(
                "nps score must be between 0 and 10",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

/// Editable fields of a testimonial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialFields {
    pub quote: String,
    pub given_on: NaiveDate,
    #[serde(default)]
    pub published: bool,
}

/// Kind descriptor for testimonials.
#[derive(Debug, Clone, Copy)]
pub struct TestimonialKind;

impl RecordKind for TestimonialKind {
    type Fields = TestimonialFields;
    const COLLECTION: &'static str = "testimonials";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_non_empty(&fields.quote, "testimonial quote")
    }
}

// ---------------------------------------------------------------------------
// Payment plans
// ---------------------------------------------------------------------------

/// Where a plan's slot schedule came from: a reusable template, or a
/// caller-supplied custom list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "templateId")]
pub enum PlanSource {
    /// Slots were expanded from this template.
    Template(TemplateId),
    /// Slots were supplied by the caller.
    Custom,
}

/// Editable fields of a payment plan. `total_amount` is derived from the
/// plan's slots; callers write it back after expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanFields {
    pub source: PlanSource,
    pub term_starts_on: NaiveDate,
    pub term_ends_on: NaiveDate,
    pub total_amount: AmountCents,
}

/// Kind descriptor for payment plans. Deleting a plan cascades to its slots
/// at the storage level.
#[derive(Debug, Clone, Copy)]
pub struct PaymentPlanKind;

impl RecordKind for PaymentPlanKind {
    type Fields = PaymentPlanFields;
    const COLLECTION: &'static str = "payment_plans";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_ordered_dates(fields.term_starts_on, fields.term_ends_on, "plan term")?;
        require_non_negative(fields.total_amount, "plan total")
    }
}

// ---------------------------------------------------------------------------
// Payment slots
// ---------------------------------------------------------------------------

/// Editable fields of a payment slot. `payment_id` is the inverse side of
/// the payment assignment; only the assignment coordinator writes it outside
/// of full-list reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSlotFields {
    pub amount_due: AmountCents,
    pub amount_paid: AmountCents,
    pub due_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_id: Option<PaymentId>,
}

/// Kind descriptor for payment slots. The parent is the owning plan, not a
/// client.
#[derive(Debug, Clone, Copy)]
pub struct PaymentSlotKind;

impl RecordKind for PaymentSlotKind {
    type Fields = PaymentSlotFields;
    const COLLECTION: &'static str = "payment_slots";

    fn validate(fields: &Self::Fields) -> Result<(), DomainError> {
        require_non_negative(fields.amount_due, "amount due")?;
        require_non_negative(fields.amount_paid, "amount paid")
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for the kind descriptor table.

    use super::*;
    use rstest::rstest;

    fn goal(title: &str) -> GoalFields {
        GoalFields {
            title: title.to_owned(),
            details: None,
            target_on: None,
            achieved: false,
        }
    }

    #[rstest]
    fn goal_requires_a_title() {
        assert!(GoalKind::validate(&goal("ship the launch")).is_ok());
        assert!(GoalKind::validate(&goal("   ")).is_err());
    }

    #[rstest]
    #[case(-1, false)]
    #[case(0, true)]
    #[case(10, true)]
    #[case(11, false)]
    fn nps_score_must_stay_in_range(#[case] score: i16, #[case] ok: bool) {
        let fields = NpsScoreFields {
            score,
            recorded_on: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date"),
            comment: None,
        };
        assert_eq!(NpsScoreKind::validate(&fields).is_ok(), ok);
    }

    #[rstest]
    fn activity_period_rejects_inverted_dates() {
        let fields = ActivityPeriodFields {
            starts_on: NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid date"),
            ends_on: NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            payment_slot_id: None,
        };
        assert!(ActivityPeriodKind::validate(&fields).is_err());
    }

    #[rstest]
    fn payment_slot_rejects_negative_amounts() {
        let fields = PaymentSlotFields {
            amount_due: AmountCents::new(-500),
            amount_paid: AmountCents::ZERO,
            due_on: NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
            notes: None,
            payment_id: None,
        };
        assert!(PaymentSlotKind::validate(&fields).is_err());
    }

    #[rstest]
    fn desired_record_json_flattens_fields() {
        let desired = DesiredRecord::<GoalKind>::new(goal("quarterly review"));
        let value = serde_json::to_value(&desired).expect("serializes");
        assert_eq!(value["title"], "quarterly review");
        assert!(value["id"].is_null());
    }
}
