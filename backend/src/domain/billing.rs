//! Billing entities: templates, slots, and schedule sources.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{PaymentId, PlanId, SlotId, TemplateId};
use super::money::AmountCents;

/// Provenance note stamped on slots expanded from a template.
pub const TEMPLATE_PROVENANCE: &str = "Generated from payment plan template";

/// Provenance note stamped on slots expanded from a custom schedule.
pub const CUSTOM_PROVENANCE: &str = "Generated from custom payment schedule";

/// A reusable payment plan template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanTemplate {
    pub id: TemplateId,
    pub name: String,
    pub program_months: u32,
}

/// One installment definition owned by a template: how much is due, and how
/// many calendar months after the term start it falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSlot {
    pub amount_due: AmountCents,
    pub months_to_delay: u32,
}

/// A caller-supplied installment definition for a custom schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomSlot {
    pub amount_due: AmountCents,
    pub months_to_delay: u32,
}

/// Where the slots of a schedule expansion come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SlotSource {
    /// Expand the ordered slot set of this template.
    Template(TemplateId),
    /// Expand the given custom slot list.
    Custom(Vec<CustomSlot>),
}

/// A concrete, dated installment obligation belonging to one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSlot {
    pub id: SlotId,
    pub plan_id: PlanId,
    pub amount_due: AmountCents,
    pub amount_paid: AmountCents,
    pub due_on: NaiveDate,
    pub notes: String,
    /// Non-null exactly while one payment claims this slot.
    pub payment_id: Option<PaymentId>,
}

/// A slot about to be inserted; identifiers are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentSlot {
    pub amount_due: AmountCents,
    pub amount_paid: AmountCents,
    pub due_on: NaiveDate,
    pub notes: String,
}

/// Derived plan total: the sum of its slots' amounts due. Writing this back
/// onto the plan row is the caller's responsibility.
pub fn schedule_total(slots: &[PaymentSlot]) -> AmountCents {
    slots.iter().map(|slot| slot.amount_due).sum()
}
