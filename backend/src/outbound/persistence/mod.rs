//! PostgreSQL persistence adapters for the domain ports.

pub mod billing;
pub mod error_mapping;
pub mod models;
pub mod period_generator;
pub mod pool;
pub mod schema;
pub mod sub_record_stores;
pub mod win_tags;

pub use self::billing::{
    DieselActivityPeriodRepository, DieselPaymentRepository, DieselPaymentSlotRepository,
    DieselTemplateRepository,
};
pub use self::period_generator::DieselActivityPeriodGenerator;
pub use self::pool::{DbPool, PoolConfig, PoolError};
pub use self::sub_record_stores::{
    DieselActivityPeriodStore, DieselAssignmentStore, DieselGoalStore, DieselNpsScoreStore,
    DieselPaymentPlanStore, DieselPaymentSlotStore, DieselTestimonialStore, DieselWinStore,
};
pub use self::win_tags::DieselWinTagRepository;
