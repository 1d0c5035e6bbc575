//! Behavioural coverage for schedule expansion.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use crate::domain::billing::{
    CUSTOM_PROVENANCE, CustomSlot, PaymentPlanTemplate, SlotSource, TEMPLATE_PROVENANCE,
    TemplateSlot, schedule_total,
};
use crate::domain::error::ErrorCode;
use crate::domain::ids::{PlanId, TemplateId};
use crate::domain::money::AmountCents;
use crate::domain::ports::{FixtureTemplateRepository, InMemoryPaymentSlotRepository};

use super::ScheduleEngine;

type Engine = ScheduleEngine<FixtureTemplateRepository, InMemoryPaymentSlotRepository>;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn template_slot(amount: i64, delay: u32) -> TemplateSlot {
    TemplateSlot {
        amount_due: AmountCents::new(amount),
        months_to_delay: delay,
    }
}

fn engine_with_template(slots: Vec<TemplateSlot>) -> (TemplateId, Engine, Arc<InMemoryPaymentSlotRepository>) {
    let template = PaymentPlanTemplate {
        id: TemplateId::random(),
        name: "three monthly".to_owned(),
        program_months: 3,
    };
    let template_id = template.id;
    let templates = Arc::new(FixtureTemplateRepository::with_template(template, slots));
    let slot_repo = Arc::new(InMemoryPaymentSlotRepository::new());
    let engine = ScheduleEngine::new(templates, Arc::clone(&slot_repo));
    (template_id, engine, slot_repo)
}

#[fixture]
fn plan_id() -> PlanId {
    PlanId::random()
}

#[rstest]
#[tokio::test]
async fn template_expansion_dates_and_total(plan_id: PlanId) {
    let (template_id, engine, slot_repo) = engine_with_template(vec![
        template_slot(500, 0),
        template_slot(500, 1),
        template_slot(500, 2),
    ]);

    let slots = engine
        .expand_slots(plan_id, SlotSource::Template(template_id), date(2024, 1, 15))
        .await
        .expect("expansion succeeds");

    let due: Vec<NaiveDate> = slots.iter().map(|slot| slot.due_on).collect();
    assert_eq!(
        due,
        vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
    );
    assert_eq!(schedule_total(&slots), AmountCents::new(1500));
    assert!(slots.iter().all(|slot| slot.amount_paid == AmountCents::ZERO));
    assert!(slots.iter().all(|slot| slot.payment_id.is_none()));
    assert!(slots.iter().all(|slot| slot.notes == TEMPLATE_PROVENANCE));
    assert_eq!(slot_repo.slots_for_plan(plan_id).len(), 3);
}

#[rstest]
#[tokio::test]
async fn custom_expansion_matches_the_two_slot_scenario(plan_id: PlanId) {
    let (_, engine, _) = engine_with_template(Vec::new());

    let slots = engine
        .expand_slots(
            plan_id,
            SlotSource::Custom(vec![
                CustomSlot {
                    amount_due: AmountCents::new(300),
                    months_to_delay: 0,
                },
                CustomSlot {
                    amount_due: AmountCents::new(300),
                    months_to_delay: 1,
                },
            ]),
            date(2025, 6, 1),
        )
        .await
        .expect("expansion succeeds");

    let due: Vec<NaiveDate> = slots.iter().map(|slot| slot.due_on).collect();
    assert_eq!(due, vec![date(2025, 6, 1), date(2025, 7, 1)]);
    assert_eq!(schedule_total(&slots), AmountCents::new(600));
    assert!(slots.iter().all(|slot| slot.notes == CUSTOM_PROVENANCE));
}

#[rstest]
#[case(date(2024, 1, 31), 1, date(2024, 2, 29))]
#[case(date(2023, 1, 31), 1, date(2023, 2, 28))]
#[case(date(2024, 3, 31), 1, date(2024, 4, 30))]
#[tokio::test]
async fn month_end_due_dates_clamp(
    plan_id: PlanId,
    #[case] term_start: NaiveDate,
    #[case] delay: u32,
    #[case] expected: NaiveDate,
) {
    let (_, engine, _) = engine_with_template(Vec::new());

    let slots = engine
        .expand_slots(
            plan_id,
            SlotSource::Custom(vec![CustomSlot {
                amount_due: AmountCents::new(100),
                months_to_delay: delay,
            }]),
            term_start,
        )
        .await
        .expect("expansion succeeds");

    assert_eq!(slots.first().map(|slot| slot.due_on), Some(expected));
}

#[rstest]
#[tokio::test]
async fn missing_template_is_not_found(plan_id: PlanId) {
    let (_, engine, slot_repo) = engine_with_template(Vec::new());

    let error = engine
        .expand_slots(
            plan_id,
            SlotSource::Template(TemplateId::random()),
            date(2025, 1, 1),
        )
        .await
        .expect_err("unknown template rejected");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert!(slot_repo.slots_for_plan(plan_id).is_empty());
}

#[rstest]
#[tokio::test]
async fn empty_template_yields_an_empty_schedule(plan_id: PlanId) {
    let (template_id, engine, slot_repo) = engine_with_template(Vec::new());

    let slots = engine
        .expand_slots(plan_id, SlotSource::Template(template_id), date(2025, 1, 1))
        .await
        .expect("empty template is not an error");

    assert!(slots.is_empty());
    assert!(slot_repo.slots_for_plan(plan_id).is_empty());
}

#[rstest]
#[tokio::test]
async fn empty_custom_list_yields_an_empty_schedule(plan_id: PlanId) {
    let (_, engine, _) = engine_with_template(Vec::new());

    let slots = engine
        .expand_slots(plan_id, SlotSource::Custom(Vec::new()), date(2025, 1, 1))
        .await
        .expect("empty custom list is not an error");

    assert!(slots.is_empty());
}

#[rstest]
#[tokio::test]
async fn negative_amounts_are_rejected_before_any_insert(plan_id: PlanId) {
    let (_, engine, slot_repo) = engine_with_template(Vec::new());

    let error = engine
        .expand_slots(
            plan_id,
            SlotSource::Custom(vec![CustomSlot {
                amount_due: AmountCents::new(-1),
                months_to_delay: 0,
            }]),
            date(2025, 1, 1),
        )
        .await
        .expect_err("negative amount rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(slot_repo.slots_for_plan(plan_id).is_empty());
}

#[rstest]
#[tokio::test]
async fn insert_failure_surfaces_immediately(plan_id: PlanId) {
    let (_, engine, slot_repo) = engine_with_template(Vec::new());
    slot_repo.fail_inserts();

    let error = engine
        .expand_slots(
            plan_id,
            SlotSource::Custom(vec![CustomSlot {
                amount_due: AmountCents::new(100),
                months_to_delay: 0,
            }]),
            date(2025, 1, 1),
        )
        .await
        .expect_err("insert failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
