//! Diesel adapter for the win↔tag join table.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ids::{RecordId, TagId};
use crate::domain::ports::{WinTagRepository, WinTagRepositoryError};

use super::pool::DbPool;
use super::schema::win_tags;

#[derive(Debug, Insertable)]
#[diesel(table_name = win_tags)]
struct NewWinTagRow {
    win_id: Uuid,
    tag_id: Uuid,
}

/// Win tag repository over the `win_tags` join table.
#[derive(Clone)]
pub struct DieselWinTagRepository {
    pool: DbPool,
}

impl DieselWinTagRepository {
    /// Create an adapter over the shared connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WinTagRepository for DieselWinTagRepository {
    async fn tag_ids_for_win(
        &self,
        win_id: RecordId,
    ) -> Result<Vec<TagId>, WinTagRepositoryError> {
        let mut conn = self.pool.get().await?;
        let ids: Vec<Uuid> = win_tags::table
            .filter(win_tags::win_id.eq(win_id.into_uuid()))
            .select(win_tags::tag_id)
            .load(&mut conn)
            .await?;
        Ok(ids.into_iter().map(TagId::from_uuid).collect())
    }

    async fn attach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError> {
        let rows: Vec<NewWinTagRow> = tag_ids
            .iter()
            .map(|tag| NewWinTagRow {
                win_id: win_id.into_uuid(),
                tag_id: tag.into_uuid(),
            })
            .collect();
        let mut conn = self.pool.get().await?;
        diesel::insert_into(win_tags::table)
            .values(rows)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    async fn detach(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), WinTagRepositoryError> {
        let raw: Vec<Uuid> = tag_ids.iter().copied().map(TagId::into_uuid).collect();
        let mut conn = self.pool.get().await?;
        diesel::delete(
            win_tags::table.filter(
                win_tags::win_id
                    .eq(win_id.into_uuid())
                    .and(win_tags::tag_id.eq_any(raw)),
            ),
        )
        .execute(&mut conn)
        .await?;
        Ok(())
    }
}
