//! Diesel-backed activity-period generator.
//!
//! Generates the activity period implied by a payment slot: one period
//! spanning the calendar month that starts on the slot's due date. The run
//! is idempotent — if any period already references the slot, nothing is
//! created and the outcome says so.

use async_trait::async_trait;
use chrono::Months;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ids::SlotId;
use crate::domain::ports::{
    ActivityPeriodGenerator, ActivityPeriodGeneratorError, GeneratedPeriods,
};

use super::models::NewActivityPeriodRow;
use super::pool::DbPool;
use super::schema::{activity_periods, clients, payment_plans, payment_slots};

/// Generator that derives activity periods from payment slots.
#[derive(Clone)]
pub struct DieselActivityPeriodGenerator {
    pool: DbPool,
}

impl DieselActivityPeriodGenerator {
    /// Create a generator over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityPeriodGenerator for DieselActivityPeriodGenerator {
    async fn generate(
        &self,
        slot_id: SlotId,
    ) -> Result<GeneratedPeriods, ActivityPeriodGeneratorError> {
        let mut conn = self.pool.get().await?;

        let slot: Option<(Uuid, chrono::NaiveDate)> = payment_slots::table
            .find(slot_id.into_uuid())
            .select((payment_slots::plan_id, payment_slots::due_on))
            .first(&mut conn)
            .await
            .optional()?;
        let Some((plan_id, due_on)) = slot else {
            return Err(ActivityPeriodGeneratorError::failed(format!(
                "payment slot {slot_id} not found"
            )));
        };

        let client_id: Option<Uuid> = payment_plans::table
            .find(plan_id)
            .select(payment_plans::client_id)
            .first(&mut conn)
            .await
            .optional()?;
        let Some(client_id) = client_id else {
            return Err(ActivityPeriodGeneratorError::failed(format!(
                "payment plan for slot {slot_id} not found"
            )));
        };

        let client_name: String = clients::table
            .find(client_id)
            .select(clients::display_name)
            .first(&mut conn)
            .await
            .optional()?
            .unwrap_or_default();

        let existing: i64 = activity_periods::table
            .filter(activity_periods::payment_slot_id.eq(slot_id.into_uuid()))
            .count()
            .get_result(&mut conn)
            .await?;
        if existing > 0 {
            debug!(slot = %slot_id, existing, "activity periods already exist");
            return Ok(GeneratedPeriods {
                periods_created: 0,
                client_name,
                message: Some("activity periods already exist for this payment slot".to_owned()),
            });
        }

        let Some(ends_on) = due_on.checked_add_months(Months::new(1)) else {
            return Err(ActivityPeriodGeneratorError::failed(format!(
                "due date {due_on} is out of range"
            )));
        };
        let row = NewActivityPeriodRow::generated(
            Uuid::new_v4(),
            client_id,
            due_on,
            ends_on,
            slot_id,
        );
        diesel::insert_into(activity_periods::table)
            .values(row)
            .execute(&mut conn)
            .await?;

        debug!(slot = %slot_id, client = %client_id, "activity period generated");
        Ok(GeneratedPeriods {
            periods_created: 1,
            client_name,
            message: None,
        })
    }
}
