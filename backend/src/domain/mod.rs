//! Domain layer: entities, value types, services, and ports.
//!
//! The two cooperating components live here. The collection reconciler
//! (`reconcile`, with the `wins` variant) synchronizes a parent's desired
//! sub-record list against storage; the payment schedule engine
//! (`schedule`, `assignment`) expands plan templates into dated slots and
//! reacts to payments being matched against them. Both talk to storage
//! through the traits in `ports`.

pub mod assignment;
pub mod billing;
pub mod error;
pub mod ids;
pub mod money;
pub mod ports;
pub mod reconcile;
pub mod records;
pub mod schedule;
pub mod wins;

pub use self::assignment::{AssignmentCoordinator, AssignmentOutcome};
pub use self::billing::{
    CustomSlot, NewPaymentSlot, PaymentPlanTemplate, PaymentSlot, SlotSource, TemplateSlot,
    schedule_total,
};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::ids::{
    ActorId, ClientId, ParentId, PaymentId, PlanId, RecordId, SlotId, TagId, TemplateId,
};
pub use self::money::AmountCents;
pub use self::reconcile::{CollectionReconciler, ReconcileOutcome};
pub use self::records::{
    ActivityPeriodFields, ActivityPeriodKind, AssignmentFields, AssignmentKind, DesiredRecord,
    GoalFields, GoalKind, NpsScoreFields, NpsScoreKind, PaymentPlanFields, PaymentPlanKind,
    PaymentSlotFields, PaymentSlotKind, PlanSource, RecordKind, TestimonialFields, TestimonialKind,
    WinFields, WinKind,
};
pub use self::schedule::ScheduleEngine;
pub use self::wins::{DesiredWin, WinService};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
