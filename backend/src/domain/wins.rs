//! Win reconciliation with tag links.
//!
//! Wins follow the base diff algorithm, plus a second diff over the
//! win↔tag join keyed by tag id. A tag link has no editable fields, so its
//! reconciliation is pure set difference.
//!
//! This module contains the single compensating rollback in the core: a
//! newly-inserted win whose tag attach fails is deleted again, so no
//! untagged orphan survives the call.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::DomainError;
use super::ids::{ActorId, ParentId, RecordId, TagId};
use super::ports::{SubRecordStore, WinTagRepository, WinTagRepositoryError};
use super::reconcile::{ReconcileOutcome, map_store_error};
use super::records::{RecordKind, WinFields, WinKind};

fn map_tag_error(error: WinTagRepositoryError) -> DomainError {
    match error {
        WinTagRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("win tag repository unavailable: {message}"))
        }
        WinTagRepositoryError::Query { message } => {
            DomainError::internal(format!("win tag repository error: {message}"))
        }
    }
}

/// One desired win: base fields plus the full desired tag-id set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredWin {
    /// Existing win identifier, if this item was persisted before.
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: WinFields,
    /// The tags the win should carry after the call, exactly.
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Win service layering tag-link reconciliation over the base diff.
#[derive(Clone)]
pub struct WinService<S, T> {
    wins: Arc<S>,
    tags: Arc<T>,
}

impl<S, T> WinService<S, T> {
    /// Create a service over the win store and the tag link repository.
    pub fn new(wins: Arc<S>, tags: Arc<T>) -> Self {
        Self { wins, tags }
    }
}

impl<S, T> WinService<S, T>
where
    S: SubRecordStore<WinKind>,
    T: WinTagRepository,
{
    /// Insert a win and attach its tags. If attaching fails the win is
    /// deleted again and the failure surfaces.
    pub async fn create_win(
        &self,
        parent: ParentId,
        actor: ActorId,
        fields: WinFields,
        tag_ids: &[TagId],
    ) -> Result<RecordId, DomainError> {
        WinKind::validate(&fields)?;
        let win_id = self
            .wins
            .insert(parent, actor, &fields)
            .await
            .map_err(map_store_error::<WinKind>)?;

        if let Err(error) = self.tags.attach(win_id, tag_ids).await {
            // Compensate: do not leave an untagged orphan behind.
            if let Err(cleanup) = self.wins.delete_many(&[win_id]).await {
                warn!(
                    win = %win_id,
                    error = %cleanup,
                    "failed to delete win after tag attach failure"
                );
            }
            return Err(map_tag_error(error));
        }
        Ok(win_id)
    }

    /// Rewrite a win's fields and make its tag links match `tag_ids`.
    pub async fn update_win(
        &self,
        win_id: RecordId,
        fields: WinFields,
        tag_ids: &[TagId],
    ) -> Result<(), DomainError> {
        WinKind::validate(&fields)?;
        self.wins
            .update(win_id, &fields)
            .await
            .map_err(map_store_error::<WinKind>)?;
        self.reconcile_tags(win_id, tag_ids).await
    }

    /// Make the persisted win set for `parent` match `desired`, tags
    /// included. Win rows deleted here lose their tag links through the
    /// storage-level cascade on the join table.
    pub async fn reconcile(
        &self,
        parent: ParentId,
        actor: ActorId,
        desired: Vec<DesiredWin>,
    ) -> Result<ReconcileOutcome, DomainError> {
        for win in &desired {
            WinKind::validate(&win.fields)?;
        }

        let existing = self
            .wins
            .existing_ids(parent)
            .await
            .map_err(map_store_error::<WinKind>)?;
        let kept: HashSet<RecordId> = desired.iter().filter_map(|win| win.id).collect();
        let to_delete: Vec<RecordId> = existing
            .into_iter()
            .filter(|id| !kept.contains(id))
            .collect();

        let mut outcome = ReconcileOutcome::default();
        if !to_delete.is_empty() {
            outcome.deleted = self
                .wins
                .delete_many(&to_delete)
                .await
                .map_err(map_store_error::<WinKind>)?;
        }

        for win in desired {
            match win.id {
                Some(id) => {
                    self.update_win(id, win.fields, &win.tag_ids).await?;
                    outcome.updated += 1;
                }
                None => {
                    let id = self
                        .create_win(parent, actor, win.fields, &win.tag_ids)
                        .await?;
                    outcome.inserted.push(id);
                }
            }
        }

        debug!(
            parent = %parent,
            deleted = outcome.deleted,
            updated = outcome.updated,
            inserted = outcome.inserted.len(),
            "wins reconciled"
        );
        Ok(outcome)
    }

    /// Diff the persisted tag links against the desired set.
    async fn reconcile_tags(
        &self,
        win_id: RecordId,
        tag_ids: &[TagId],
    ) -> Result<(), DomainError> {
        let existing: HashSet<TagId> = self
            .tags
            .tag_ids_for_win(win_id)
            .await
            .map_err(map_tag_error)?
            .into_iter()
            .collect();
        let desired: HashSet<TagId> = tag_ids.iter().copied().collect();

        let to_detach: Vec<TagId> = existing.difference(&desired).copied().collect();
        let to_attach: Vec<TagId> = desired.difference(&existing).copied().collect();

        if !to_detach.is_empty() {
            self.tags
                .detach(win_id, &to_detach)
                .await
                .map_err(map_tag_error)?;
        }
        if !to_attach.is_empty() {
            self.tags
                .attach(win_id, &to_attach)
                .await
                .map_err(map_tag_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "wins_tests.rs"]
mod tests;
