//! Shared application state wired over the PostgreSQL adapters.

use std::sync::Arc;

use crate::domain::records::{
    ActivityPeriodKind, AssignmentKind, GoalKind, NpsScoreKind, PaymentPlanKind, PaymentSlotKind,
    TestimonialKind,
};
use crate::domain::{AssignmentCoordinator, CollectionReconciler, ScheduleEngine, WinService};
use crate::outbound::persistence::{
    DbPool, DieselActivityPeriodGenerator, DieselActivityPeriodRepository,
    DieselActivityPeriodStore, DieselAssignmentStore, DieselGoalStore, DieselNpsScoreStore,
    DieselPaymentPlanStore, DieselPaymentRepository, DieselPaymentSlotRepository,
    DieselPaymentSlotStore, DieselTemplateRepository, DieselTestimonialStore, DieselWinStore,
    DieselWinTagRepository,
};

/// Everything the HTTP handlers need, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub goals: CollectionReconciler<GoalKind, DieselGoalStore>,
    pub assignments: CollectionReconciler<AssignmentKind, DieselAssignmentStore>,
    pub activity_periods: CollectionReconciler<ActivityPeriodKind, DieselActivityPeriodStore>,
    pub nps_scores: CollectionReconciler<NpsScoreKind, DieselNpsScoreStore>,
    pub testimonials: CollectionReconciler<TestimonialKind, DieselTestimonialStore>,
    pub payment_plans: CollectionReconciler<PaymentPlanKind, DieselPaymentPlanStore>,
    pub payment_slots: CollectionReconciler<PaymentSlotKind, DieselPaymentSlotStore>,
    pub wins: WinService<DieselWinStore, DieselWinTagRepository>,
    pub schedule: ScheduleEngine<DieselTemplateRepository, DieselPaymentSlotRepository>,
    pub assignment: AssignmentCoordinator<
        DieselPaymentRepository,
        DieselPaymentSlotRepository,
        DieselActivityPeriodRepository,
        DieselActivityPeriodGenerator,
    >,
}

impl AppState {
    /// Wire every service over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        let goals = CollectionReconciler::new(Arc::new(DieselGoalStore::new(pool.clone())));
        let assignments =
            CollectionReconciler::new(Arc::new(DieselAssignmentStore::new(pool.clone())));
        let activity_periods =
            CollectionReconciler::new(Arc::new(DieselActivityPeriodStore::new(pool.clone())));
        let nps_scores =
            CollectionReconciler::new(Arc::new(DieselNpsScoreStore::new(pool.clone())));
        let testimonials =
            CollectionReconciler::new(Arc::new(DieselTestimonialStore::new(pool.clone())));
        let payment_plans =
            CollectionReconciler::new(Arc::new(DieselPaymentPlanStore::new(pool.clone())));
        let payment_slots =
            CollectionReconciler::new(Arc::new(DieselPaymentSlotStore::new(pool.clone())));
        let wins = WinService::new(
            Arc::new(DieselWinStore::new(pool.clone())),
            Arc::new(DieselWinTagRepository::new(pool.clone())),
        );
        let slot_repository = Arc::new(DieselPaymentSlotRepository::new(pool.clone()));
        let schedule = ScheduleEngine::new(
            Arc::new(DieselTemplateRepository::new(pool.clone())),
            Arc::clone(&slot_repository),
        );
        let assignment = AssignmentCoordinator::new(
            Arc::new(DieselPaymentRepository::new(pool.clone())),
            slot_repository,
            Arc::new(DieselActivityPeriodRepository::new(pool.clone())),
            Arc::new(DieselActivityPeriodGenerator::new(pool.clone())),
        );

        Self {
            pool,
            goals,
            assignments,
            activity_periods,
            nps_scores,
            testimonials,
            payment_plans,
            payment_slots,
            wins,
            schedule,
            assignment,
        }
    }
}
