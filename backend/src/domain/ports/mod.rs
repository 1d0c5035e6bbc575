//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store, the activity-period generator collaborator). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod activity_period_generator;
mod activity_period_repository;
mod payment_repository;
mod payment_slot_repository;
mod sub_record_store;
mod template_repository;
mod win_tag_repository;

#[cfg(test)]
pub use activity_period_generator::MockActivityPeriodGenerator;
pub use activity_period_generator::{
    ActivityPeriodGenerator, ActivityPeriodGeneratorError, FixtureActivityPeriodGenerator,
    GeneratedPeriods,
};
#[cfg(test)]
pub use activity_period_repository::MockActivityPeriodRepository;
pub use activity_period_repository::{
    ActivityPeriodRepository, ActivityPeriodRepositoryError, InMemoryActivityPeriodRepository,
};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{InMemoryPaymentRepository, PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use payment_slot_repository::MockPaymentSlotRepository;
pub use payment_slot_repository::{
    InMemoryPaymentSlotRepository, PaymentSlotRepository, PaymentSlotRepositoryError,
};
pub use sub_record_store::{
    InMemorySubRecordStore, StoredRecord, SubRecordStore, SubRecordStoreError,
};
#[cfg(test)]
pub use template_repository::MockTemplateRepository;
pub use template_repository::{
    FixtureTemplateRepository, TemplateRepository, TemplateRepositoryError,
};
#[cfg(test)]
pub use win_tag_repository::MockWinTagRepository;
pub use win_tag_repository::{InMemoryWinTagRepository, WinTagRepository, WinTagRepositoryError};
