//! Diesel-backed sub-record stores, one adapter per collection kind.
//!
//! The adapters are mechanical: each binds the generic store port to one
//! table, one parent foreign-key column, and the row types from `models`.
//! A macro stamps them out so the per-kind code is exactly the per-kind
//! knowledge and nothing else.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ids::{ActorId, ParentId, RecordId};
use crate::domain::ports::{SubRecordStore, SubRecordStoreError};
use crate::domain::records::{
    ActivityPeriodKind, AssignmentKind, GoalKind, NpsScoreKind, PaymentPlanKind, PaymentSlotKind,
    RecordKind, TestimonialKind, WinKind,
};

use super::models::{
    ActivityPeriodChanges, AssignmentChanges, GoalChanges, NewActivityPeriodRow, NewAssignmentRow,
    NewGoalRow, NewNpsScoreRow, NewPaymentPlanRow, NewPaymentSlotRow, NewTestimonialRow, NewWinRow,
    NpsScoreChanges, PaymentPlanChanges, PaymentSlotChanges, TestimonialChanges, WinChanges,
};
use super::pool::DbPool;
use super::schema::{
    activity_periods, assignments, goals, nps_scores, payment_plans, payment_slots, testimonials,
    wins,
};

macro_rules! diesel_sub_record_store {
    (
        $(#[$meta:meta])*
        $adapter:ident {
            kind: $kind:ty,
            table: $table:ident,
            parent: $parent_col:ident,
            insert_row: $new_row:ident,
            changes: $changes:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $adapter {
            pool: DbPool,
        }

        impl $adapter {
            /// Create an adapter over the shared connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl SubRecordStore<$kind> for $adapter {
            async fn existing_ids(
                &self,
                parent: ParentId,
            ) -> Result<Vec<RecordId>, SubRecordStoreError> {
                let mut conn = self.pool.get().await?;
                let ids: Vec<Uuid> = $table::table
                    .filter($table::$parent_col.eq(parent.into_uuid()))
                    .select($table::id)
                    .load(&mut conn)
                    .await?;
                Ok(ids.into_iter().map(RecordId::from_uuid).collect())
            }

            async fn delete_many(&self, ids: &[RecordId]) -> Result<usize, SubRecordStoreError> {
                let raw: Vec<Uuid> = ids.iter().copied().map(RecordId::into_uuid).collect();
                let mut conn = self.pool.get().await?;
                let removed = diesel::delete($table::table.filter($table::id.eq_any(raw)))
                    .execute(&mut conn)
                    .await?;
                Ok(removed)
            }

            async fn update(
                &self,
                id: RecordId,
                fields: &<$kind as RecordKind>::Fields,
            ) -> Result<(), SubRecordStoreError> {
                let mut conn = self.pool.get().await?;
                let affected = diesel::update($table::table.find(id.into_uuid()))
                    .set($changes::from(fields))
                    .execute(&mut conn)
                    .await?;
                if affected == 0 {
                    return Err(SubRecordStoreError::not_found(format!(
                        "{} {id}",
                        <$kind as RecordKind>::COLLECTION
                    )));
                }
                Ok(())
            }

            async fn insert(
                &self,
                parent: ParentId,
                actor: ActorId,
                fields: &<$kind as RecordKind>::Fields,
            ) -> Result<RecordId, SubRecordStoreError> {
                let id = RecordId::random();
                let row =
                    $new_row::new(id.into_uuid(), parent.into_uuid(), actor.into_uuid(), fields);
                let mut conn = self.pool.get().await?;
                diesel::insert_into($table::table)
                    .values(row)
                    .execute(&mut conn)
                    .await?;
                Ok(id)
            }
        }
    };
}

diesel_sub_record_store! {
    /// Store for client goals.
    DieselGoalStore {
        kind: GoalKind,
        table: goals,
        parent: client_id,
        insert_row: NewGoalRow,
        changes: GoalChanges,
    }
}

diesel_sub_record_store! {
    /// Store for client wins. Tag links live in the win↔tag repository; the
    /// join table cascades when win rows are deleted here.
    DieselWinStore {
        kind: WinKind,
        table: wins,
        parent: client_id,
        insert_row: NewWinRow,
        changes: WinChanges,
    }
}

diesel_sub_record_store! {
    /// Store for client assignments.
    DieselAssignmentStore {
        kind: AssignmentKind,
        table: assignments,
        parent: client_id,
        insert_row: NewAssignmentRow,
        changes: AssignmentChanges,
    }
}

diesel_sub_record_store! {
    /// Store for activity periods.
    DieselActivityPeriodStore {
        kind: ActivityPeriodKind,
        table: activity_periods,
        parent: client_id,
        insert_row: NewActivityPeriodRow,
        changes: ActivityPeriodChanges,
    }
}

diesel_sub_record_store! {
    /// Store for NPS scores.
    DieselNpsScoreStore {
        kind: NpsScoreKind,
        table: nps_scores,
        parent: client_id,
        insert_row: NewNpsScoreRow,
        changes: NpsScoreChanges,
    }
}

diesel_sub_record_store! {
    /// Store for testimonials.
    DieselTestimonialStore {
        kind: TestimonialKind,
        table: testimonials,
        parent: client_id,
        insert_row: NewTestimonialRow,
        changes: TestimonialChanges,
    }
}

diesel_sub_record_store! {
    /// Store for payment plans. Deleting a plan cascades to its slots at the
    /// database level.
    DieselPaymentPlanStore {
        kind: PaymentPlanKind,
        table: payment_plans,
        parent: client_id,
        insert_row: NewPaymentPlanRow,
        changes: PaymentPlanChanges,
    }
}

diesel_sub_record_store! {
    /// Store for payment slots. The parent here is the owning plan.
    DieselPaymentSlotStore {
        kind: PaymentSlotKind,
        table: payment_slots,
        parent: plan_id,
        insert_row: NewPaymentSlotRow,
        changes: PaymentSlotChanges,
    }
}
