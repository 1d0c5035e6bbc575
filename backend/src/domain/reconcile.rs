//! Generic collection reconciliation.
//!
//! Every client sub-collection is edited the same way: the caller submits
//! the full desired list and the persisted set is made to match. One
//! generic service implements that diff for all kinds; the per-kind
//! knowledge lives in the [`RecordKind`] descriptor table.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use super::error::DomainError;
use super::ids::{ActorId, ParentId, RecordId};
use super::ports::{SubRecordStore, SubRecordStoreError};
use super::records::{DesiredRecord, RecordKind};

/// What a successful reconcile applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    /// Records deleted because the desired list no longer carried their id.
    pub deleted: usize,
    /// Records rewritten in place.
    pub updated: usize,
    /// Identifiers of freshly inserted records, in desired-list order.
    pub inserted: Vec<RecordId>,
}

pub(crate) fn map_store_error<K: RecordKind>(error: SubRecordStoreError) -> DomainError {
    match error {
        SubRecordStoreError::Connection { message } => DomainError::service_unavailable(format!(
            "{} store unavailable: {message}",
            K::COLLECTION
        )),
        SubRecordStoreError::Query { message } => {
            DomainError::internal(format!("{} store error: {message}", K::COLLECTION))
        }
        SubRecordStoreError::NotFound { message } => DomainError::not_found(message),
    }
}

/// Diff-and-apply service for one sub-collection kind.
#[derive(Clone)]
pub struct CollectionReconciler<K: RecordKind, S> {
    store: Arc<S>,
    _kind: PhantomData<K>,
}

impl<K: RecordKind, S> CollectionReconciler<K, S> {
    /// Create a reconciler over the given kind-scoped store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }
}

impl<K, S> CollectionReconciler<K, S>
where
    K: RecordKind,
    S: SubRecordStore<K>,
{
    /// Make the persisted set for `(parent, kind)` match `desired` exactly.
    ///
    /// Operations run as an ordered sequence: deletes, then one update per
    /// carried id, then one insert per new item. Field validation happens
    /// up front; a validation failure produces no storage writes at all.
    ///
    /// The store has no transaction capability, so a storage failure stops
    /// the sequence and leaves the already-applied prefix in place. Callers
    /// must treat a failed reconcile as "state is some prefix of desired" —
    /// re-fetch and retry.
    ///
    /// Concurrent reconciles of the same parent and kind are not
    /// coordinated: both compute their diff against a snapshot and the
    /// loser's writes are silently overwritten. Known gap.
    pub async fn reconcile(
        &self,
        parent: ParentId,
        actor: ActorId,
        desired: Vec<DesiredRecord<K>>,
    ) -> Result<ReconcileOutcome, DomainError> {
        for item in &desired {
            K::validate(&item.fields)?;
        }

        let existing = self
            .store
            .existing_ids(parent)
            .await
            .map_err(map_store_error::<K>)?;

        let (with_id, without_id): (Vec<_>, Vec<_>) =
            desired.into_iter().partition(|item| item.id.is_some());

        let kept: HashSet<RecordId> = with_id.iter().filter_map(|item| item.id).collect();
        let to_delete: Vec<RecordId> = existing
            .into_iter()
            .filter(|id| !kept.contains(id))
            .collect();

        let mut outcome = ReconcileOutcome::default();

        if !to_delete.is_empty() {
            outcome.deleted = self
                .store
                .delete_many(&to_delete)
                .await
                .map_err(map_store_error::<K>)?;
        }

        for item in with_id {
            let Some(id) = item.id else { continue };
            self.store
                .update(id, &item.fields)
                .await
                .map_err(map_store_error::<K>)?;
            outcome.updated += 1;
        }

        for item in without_id {
            let id = self
                .store
                .insert(parent, actor, &item.fields)
                .await
                .map_err(map_store_error::<K>)?;
            outcome.inserted.push(id);
        }

        debug!(
            collection = K::COLLECTION,
            parent = %parent,
            deleted = outcome.deleted,
            updated = outcome.updated,
            inserted = outcome.inserted.len(),
            "collection reconciled"
        );
        Ok(outcome)
    }

    /// Insert a single record under `parent`.
    pub async fn create_one(
        &self,
        parent: ParentId,
        actor: ActorId,
        fields: K::Fields,
    ) -> Result<RecordId, DomainError> {
        K::validate(&fields)?;
        self.store
            .insert(parent, actor, &fields)
            .await
            .map_err(map_store_error::<K>)
    }

    /// Rewrite every editable field of one existing record.
    pub async fn update_one(&self, id: RecordId, fields: K::Fields) -> Result<(), DomainError> {
        K::validate(&fields)?;
        self.store
            .update(id, &fields)
            .await
            .map_err(map_store_error::<K>)
    }

    /// Delete one record by id.
    pub async fn delete_one(&self, id: RecordId) -> Result<(), DomainError> {
        let removed = self
            .store
            .delete_many(&[id])
            .await
            .map_err(map_store_error::<K>)?;
        if removed == 0 {
            return Err(DomainError::not_found(format!("{} {id}", K::COLLECTION)));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
