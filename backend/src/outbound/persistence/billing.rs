//! Diesel adapters for the billing ports: templates, slots, payments, and
//! slot-derived activity periods.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::billing::{NewPaymentSlot, PaymentPlanTemplate, PaymentSlot, TemplateSlot};
use crate::domain::ids::{PaymentId, PlanId, SlotId, TemplateId};
use crate::domain::money::AmountCents;
use crate::domain::ports::{
    ActivityPeriodRepository, ActivityPeriodRepositoryError, PaymentRepository,
    PaymentRepositoryError, PaymentSlotRepository, PaymentSlotRepositoryError, TemplateRepository,
    TemplateRepositoryError,
};

use super::models::{NewPaymentSlotRow, PaymentSlotRow};
use super::pool::DbPool;
use super::schema::{activity_periods, payment_plan_templates, payment_slots, payments,
    template_slots};

fn months_from_storage(value: i32, what: &str) -> Result<u32, TemplateRepositoryError> {
    u32::try_from(value)
        .map_err(|_| TemplateRepositoryError::query(format!("negative {what} in storage")))
}

/// Read-only template repository over the template tables.
#[derive(Clone)]
pub struct DieselTemplateRepository {
    pool: DbPool,
}

impl DieselTemplateRepository {
    /// Create an adapter over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for DieselTemplateRepository {
    async fn find_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Option<PaymentPlanTemplate>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<(Uuid, String, i32)> = payment_plan_templates::table
            .find(template_id.into_uuid())
            .select((
                payment_plan_templates::id,
                payment_plan_templates::name,
                payment_plan_templates::program_months,
            ))
            .first(&mut conn)
            .await
            .optional()?;

        row.map(|(id, name, program_months)| {
            Ok(PaymentPlanTemplate {
                id: TemplateId::from_uuid(id),
                name,
                program_months: months_from_storage(program_months, "program_months")?,
            })
        })
        .transpose()
    }

    async fn slots_for_template(
        &self,
        template_id: TemplateId,
    ) -> Result<Vec<TemplateSlot>, TemplateRepositoryError> {
        let mut conn = self.pool.get().await?;
        let rows: Vec<(i64, i32)> = template_slots::table
            .filter(template_slots::template_id.eq(template_id.into_uuid()))
            .order(template_slots::months_to_delay.asc())
            .select((
                template_slots::amount_due_cents,
                template_slots::months_to_delay,
            ))
            .load(&mut conn)
            .await?;

        rows.into_iter()
            .map(|(amount_due_cents, months_to_delay)| {
                Ok(TemplateSlot {
                    amount_due: AmountCents::new(amount_due_cents),
                    months_to_delay: months_from_storage(months_to_delay, "months_to_delay")?,
                })
            })
            .collect()
    }
}

/// Payment slot repository over the `payment_slots` table.
#[derive(Clone)]
pub struct DieselPaymentSlotRepository {
    pool: DbPool,
}

impl DieselPaymentSlotRepository {
    /// Create an adapter over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentSlotRepository for DieselPaymentSlotRepository {
    async fn insert_many(
        &self,
        plan_id: PlanId,
        slots: Vec<NewPaymentSlot>,
    ) -> Result<Vec<PaymentSlot>, PaymentSlotRepositoryError> {
        let inserted: Vec<PaymentSlot> = slots
            .into_iter()
            .map(|slot| PaymentSlot {
                id: SlotId::random(),
                plan_id,
                amount_due: slot.amount_due,
                amount_paid: slot.amount_paid,
                due_on: slot.due_on,
                notes: slot.notes,
                payment_id: None,
            })
            .collect();
        let rows: Vec<NewPaymentSlotRow> = inserted
            .iter()
            .map(|slot| NewPaymentSlotRow::expanded(plan_id, slot))
            .collect();

        let mut conn = self.pool.get().await?;
        diesel::insert_into(payment_slots::table)
            .values(rows)
            .execute(&mut conn)
            .await?;
        Ok(inserted)
    }

    async fn find_by_id(
        &self,
        slot_id: SlotId,
    ) -> Result<Option<PaymentSlot>, PaymentSlotRepositoryError> {
        let mut conn = self.pool.get().await?;
        let row: Option<PaymentSlotRow> = payment_slots::table
            .find(slot_id.into_uuid())
            .select((
                payment_slots::id,
                payment_slots::plan_id,
                payment_slots::amount_due_cents,
                payment_slots::amount_paid_cents,
                payment_slots::due_on,
                payment_slots::notes,
                payment_slots::payment_id,
            ))
            .first(&mut conn)
            .await
            .optional()?;
        Ok(row.map(PaymentSlot::from))
    }
}

/// Payment repository holding both sides of the payment↔slot link.
///
/// Unlike the driving services, the two foreign-key writes here run inside
/// one database transaction; the link never half-exists at rest.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create an adapter over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn current_slot(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<SlotId>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await?;
        let slot: Option<Option<Uuid>> = payments::table
            .find(payment_id.into_uuid())
            .select(payments::payment_slot_id)
            .first(&mut conn)
            .await
            .optional()?;
        match slot {
            Some(current) => Ok(current.map(SlotId::from_uuid)),
            None => Err(PaymentRepositoryError::not_found(payment_id.to_string())),
        }
    }

    async fn link(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await?;
        // The missing-payment check must fail inside the transaction so the
        // slot-side write rolls back with it; a slot must never claim a
        // payment that does not exist.
        conn.transaction::<(), PaymentRepositoryError, _>(|conn| {
            async move {
                let payment_rows = diesel::update(payments::table.find(payment_id.into_uuid()))
                    .set(payments::payment_slot_id.eq(Some(slot_id.into_uuid())))
                    .execute(conn)
                    .await?;
                if payment_rows == 0 {
                    return Err(PaymentRepositoryError::not_found(payment_id.to_string()));
                }
                // Slot side overwrites any previous claimant; last write
                // wins.
                diesel::update(payment_slots::table.find(slot_id.into_uuid()))
                    .set(payment_slots::payment_id.eq(Some(payment_id.into_uuid())))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }

    async fn unlink(
        &self,
        payment_id: PaymentId,
        slot_id: SlotId,
    ) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<(), PaymentRepositoryError, _>(|conn| {
            async move {
                let payment_rows = diesel::update(payments::table.find(payment_id.into_uuid()))
                    .set(payments::payment_slot_id.eq(None::<Uuid>))
                    .execute(conn)
                    .await?;
                if payment_rows == 0 {
                    return Err(PaymentRepositoryError::not_found(payment_id.to_string()));
                }
                // Only clear the slot side while this payment still holds
                // the claim.
                diesel::update(
                    payment_slots::table.filter(
                        payment_slots::id
                            .eq(slot_id.into_uuid())
                            .and(payment_slots::payment_id.eq(payment_id.into_uuid())),
                    ),
                )
                .set(payment_slots::payment_id.eq(None::<Uuid>))
                .execute(conn)
                .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }
}

/// Activity period repository keyed by originating payment slot.
#[derive(Clone)]
pub struct DieselActivityPeriodRepository {
    pool: DbPool,
}

impl DieselActivityPeriodRepository {
    /// Create an adapter over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityPeriodRepository for DieselActivityPeriodRepository {
    async fn count_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError> {
        let mut conn = self.pool.get().await?;
        let count: i64 = activity_periods::table
            .filter(activity_periods::payment_slot_id.eq(slot_id.into_uuid()))
            .count()
            .get_result(&mut conn)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn delete_for_slot(
        &self,
        slot_id: SlotId,
    ) -> Result<usize, ActivityPeriodRepositoryError> {
        let mut conn = self.pool.get().await?;
        let removed = diesel::delete(
            activity_periods::table
                .filter(activity_periods::payment_slot_id.eq(slot_id.into_uuid())),
        )
        .execute(&mut conn)
        .await?;
        Ok(removed)
    }
}
