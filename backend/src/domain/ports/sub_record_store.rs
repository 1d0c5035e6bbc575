//! Generic storage port for one parent's sub-record collection.
//!
//! One trait serves every sub-collection kind; the kind descriptor carries
//! the table-specific knowledge. Adapters are kind-scoped: a store for
//! `GoalKind` only ever touches the goals table.
//!
//! The port deliberately exposes no transaction capability. Callers applying
//! several operations must treat a mid-sequence failure as "a prefix of the
//! requested operations is applied" (see the reconciler contract).

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::domain::ids::{ActorId, ParentId, RecordId};
use crate::domain::records::RecordKind;

use super::macros::define_port_error;

define_port_error! {
    /// Errors raised by sub-record store adapters.
    pub enum SubRecordStoreError {
        /// Store connection could not be established.
        Connection => "sub-record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "sub-record store query failed: {message}",
        /// The targeted record does not exist.
        NotFound => "sub-record not found: {message}",
    }
}

/// Kind-scoped persistence port for sub-records of one parent entity.
#[async_trait]
pub trait SubRecordStore<K: RecordKind>: Send + Sync {
    /// Identifiers currently persisted for this parent under this kind.
    async fn existing_ids(&self, parent: ParentId) -> Result<Vec<RecordId>, SubRecordStoreError>;

    /// Bulk-delete the given records. Returns the number removed.
    async fn delete_many(&self, ids: &[RecordId]) -> Result<usize, SubRecordStoreError>;

    /// Rewrite every editable field of an existing record. The parent
    /// foreign key and insert-time stamps are never touched.
    async fn update(&self, id: RecordId, fields: &K::Fields)
        -> Result<(), SubRecordStoreError>;

    /// Insert a new record under `parent`, stamping `actor` as the recorder.
    /// Server-assigned defaults are captured here only, never on update.
    async fn insert(
        &self,
        parent: ParentId,
        actor: ActorId,
        fields: &K::Fields,
    ) -> Result<RecordId, SubRecordStoreError>;
}

/// One record held by [`InMemorySubRecordStore`].
#[derive(Debug, Clone)]
pub struct StoredRecord<K: RecordKind> {
    pub parent: ParentId,
    pub recorded_by: ActorId,
    pub fields: K::Fields,
}

/// In-memory store used by unit tests and fixture wiring.
///
/// Failure toggles let tests exercise the prefix-applied contract without a
/// real database.
#[derive(Debug, Default)]
pub struct InMemorySubRecordStore<K: RecordKind> {
    records: Mutex<HashMap<RecordId, StoredRecord<K>>>,
    fail_deletes: AtomicBool,
    fail_updates: AtomicBool,
    fail_inserts: AtomicBool,
}

impl<K: RecordKind> InMemorySubRecordStore<K> {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            fail_deletes: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            fail_inserts: AtomicBool::new(false),
        }
    }

    /// Seed a record directly, bypassing the port.
    pub fn seed(&self, parent: ParentId, actor: ActorId, fields: K::Fields) -> RecordId {
        let id = RecordId::random();
        self.records.lock().expect("store poisoned").insert(
            id,
            StoredRecord {
                parent,
                recorded_by: actor,
                fields,
            },
        );
        id
    }

    /// Snapshot of every record held for `parent`.
    pub fn snapshot(&self, parent: ParentId) -> Vec<(RecordId, K::Fields)> {
        self.records
            .lock()
            .expect("store poisoned")
            .iter()
            .filter(|(_, record)| record.parent == parent)
            .map(|(id, record)| (*id, record.fields.clone()))
            .collect()
    }

    /// The fields of one record, if present.
    pub fn fields_of(&self, id: RecordId) -> Option<K::Fields> {
        self.records
            .lock()
            .expect("store poisoned")
            .get(&id)
            .map(|record| record.fields.clone())
    }

    /// The actor stamped on one record at insert time, if present.
    pub fn recorded_by(&self, id: RecordId) -> Option<ActorId> {
        self.records
            .lock()
            .expect("store poisoned")
            .get(&id)
            .map(|record| record.recorded_by)
    }

    /// Make subsequent deletes fail with a query error.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    /// Make subsequent updates fail with a query error.
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Make subsequent inserts fail with a query error.
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl<K: RecordKind> SubRecordStore<K> for InMemorySubRecordStore<K> {
    async fn existing_ids(&self, parent: ParentId) -> Result<Vec<RecordId>, SubRecordStoreError> {
        let records = self.records.lock().expect("store poisoned");
        let mut ids: Vec<RecordId> = records
            .iter()
            .filter(|(_, record)| record.parent == parent)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<usize, SubRecordStoreError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(SubRecordStoreError::query("injected delete failure"));
        }
        let mut records = self.records.lock().expect("store poisoned");
        Ok(ids
            .iter()
            .filter(|id| records.remove(id).is_some())
            .count())
    }

    async fn update(
        &self,
        id: RecordId,
        fields: &K::Fields,
    ) -> Result<(), SubRecordStoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(SubRecordStoreError::query("injected update failure"));
        }
        let mut records = self.records.lock().expect("store poisoned");
        match records.get_mut(&id) {
            Some(record) => {
                record.fields = fields.clone();
                Ok(())
            }
            None => Err(SubRecordStoreError::not_found(format!(
                "{} {id}",
                K::COLLECTION
            ))),
        }
    }

    async fn insert(
        &self,
        parent: ParentId,
        actor: ActorId,
        fields: &K::Fields,
    ) -> Result<RecordId, SubRecordStoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(SubRecordStoreError::query("injected insert failure"));
        }
        Ok(self.seed(parent, actor, fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage for the in-memory store.

    use rstest::rstest;

    use super::*;
    use crate::domain::records::{GoalFields, GoalKind};

    fn goal(title: &str) -> GoalFields {
        GoalFields {
            title: title.to_owned(),
            details: None,
            target_on: None,
            achieved: false,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn insert_then_update_then_delete_round_trip() {
        let store = InMemorySubRecordStore::<GoalKind>::new();
        let parent = ParentId::random();
        let actor = ActorId::random();

        let id = store
            .insert(parent, actor, &goal("draft"))
            .await
            .expect("insert succeeds");
        assert_eq!(store.recorded_by(id), Some(actor));

        store
            .update(id, &goal("final"))
            .await
            .expect("update succeeds");
        assert_eq!(store.fields_of(id).map(|f| f.title), Some("final".into()));

        let removed = store.delete_many(&[id]).await.expect("delete succeeds");
        assert_eq!(removed, 1);
        assert!(store.existing_ids(parent).await.expect("ids").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = InMemorySubRecordStore::<GoalKind>::new();
        let err = store
            .update(RecordId::random(), &goal("x"))
            .await
            .expect_err("missing record rejected");
        assert!(matches!(err, SubRecordStoreError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn failure_toggles_surface_query_errors() {
        let store = InMemorySubRecordStore::<GoalKind>::new();
        store.fail_inserts();
        let err = store
            .insert(ParentId::random(), ActorId::random(), &goal("x"))
            .await
            .expect_err("injected failure");
        assert!(matches!(err, SubRecordStoreError::Query { .. }));
    }
}
