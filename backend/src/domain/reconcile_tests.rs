//! Behavioural coverage for the generic reconciler.

use std::sync::Arc;

use rstest::{fixture, rstest};

use crate::domain::error::ErrorCode;
use crate::domain::ids::{ActorId, ParentId, RecordId};
use crate::domain::ports::InMemorySubRecordStore;
use crate::domain::records::{DesiredRecord, GoalFields, GoalKind};

use super::CollectionReconciler;

type GoalStore = InMemorySubRecordStore<GoalKind>;
type GoalReconciler = CollectionReconciler<GoalKind, GoalStore>;

fn goal(title: &str) -> GoalFields {
    GoalFields {
        title: title.to_owned(),
        details: None,
        target_on: None,
        achieved: false,
    }
}

#[fixture]
fn store() -> Arc<GoalStore> {
    Arc::new(GoalStore::new())
}

#[fixture]
fn parent() -> ParentId {
    ParentId::random()
}

#[fixture]
fn actor() -> ActorId {
    ActorId::random()
}

#[rstest]
#[tokio::test]
async fn applies_a_mixed_delete_update_insert_list(store: Arc<GoalStore>, parent: ParentId, actor: ActorId) {
    let keep = store.seed(parent, actor, goal("old title"));
    let drop = store.seed(parent, actor, goal("stale"));

    let reconciler = GoalReconciler::new(Arc::clone(&store));
    let outcome = reconciler
        .reconcile(
            parent,
            actor,
            vec![
                DesiredRecord::existing(keep, goal("x")),
                DesiredRecord::new(goal("new")),
            ],
        )
        .await
        .expect("reconcile succeeds");

    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.inserted.len(), 1);

    let snapshot = store.snapshot(parent);
    assert_eq!(snapshot.len(), 2);
    assert!(store.fields_of(drop).is_none());
    assert_eq!(store.fields_of(keep).map(|f| f.title), Some("x".into()));
    let inserted = outcome.inserted.first().copied().expect("one insert");
    assert_eq!(
        store.fields_of(inserted).map(|f| f.title),
        Some("new".into())
    );
}

#[rstest]
#[tokio::test]
async fn empty_desired_list_deletes_everything(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    store.seed(parent, actor, goal("a"));
    store.seed(parent, actor, goal("b"));

    let reconciler = GoalReconciler::new(Arc::clone(&store));
    let outcome = reconciler
        .reconcile(parent, actor, Vec::new())
        .await
        .expect("reconcile succeeds");

    assert_eq!(outcome.deleted, 2);
    assert!(store.snapshot(parent).is_empty());
}

#[rstest]
#[tokio::test]
async fn reconcile_is_idempotent_but_still_writes(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    let id = store.seed(parent, actor, goal("steady"));
    let desired = vec![DesiredRecord::existing(id, goal("steady"))];
    let reconciler = GoalReconciler::new(Arc::clone(&store));

    let first = reconciler
        .reconcile(parent, actor, desired.clone())
        .await
        .expect("first run succeeds");
    let second = reconciler
        .reconcile(parent, actor, desired)
        .await
        .expect("second run succeeds");

    // Identical desired lists still issue one update per item.
    assert_eq!(first.updated, 1);
    assert_eq!(second.updated, 1);
    assert_eq!(store.snapshot(parent).len(), 1);
    assert_eq!(store.fields_of(id).map(|f| f.title), Some("steady".into()));
}

#[rstest]
#[tokio::test]
async fn validation_failure_produces_no_writes(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    let survivor = store.seed(parent, actor, goal("kept"));

    let reconciler = GoalReconciler::new(Arc::clone(&store));
    let error = reconciler
        .reconcile(parent, actor, vec![DesiredRecord::new(goal("   "))])
        .await
        .expect_err("blank title rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    // The would-be deletion of `survivor` never ran.
    assert!(store.fields_of(survivor).is_some());
}

#[rstest]
#[tokio::test]
async fn storage_failure_leaves_the_applied_prefix(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    let stale = store.seed(parent, actor, goal("stale"));
    let kept = store.seed(parent, actor, goal("kept"));
    store.fail_updates();

    let reconciler = GoalReconciler::new(Arc::clone(&store));
    let error = reconciler
        .reconcile(
            parent,
            actor,
            vec![
                DesiredRecord::existing(kept, goal("renamed")),
                DesiredRecord::new(goal("never inserted")),
            ],
        )
        .await
        .expect_err("update failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
    // Deletes ran before the failing update; the insert never did.
    assert!(store.fields_of(stale).is_none());
    assert_eq!(store.fields_of(kept).map(|f| f.title), Some("kept".into()));
    assert_eq!(store.snapshot(parent).len(), 1);
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_id_is_not_found(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    let reconciler = GoalReconciler::new(Arc::clone(&store));
    let error = reconciler
        .reconcile(
            parent,
            actor,
            vec![DesiredRecord::existing(RecordId::random(), goal("ghost"))],
        )
        .await
        .expect_err("unknown id rejected");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn insert_stamps_the_calling_actor(store: Arc<GoalStore>, parent: ParentId) {
    let actor = ActorId::random();
    let reconciler = GoalReconciler::new(Arc::clone(&store));

    let outcome = reconciler
        .reconcile(parent, actor, vec![DesiredRecord::new(goal("stamped"))])
        .await
        .expect("reconcile succeeds");

    let inserted = outcome.inserted.first().copied().expect("one insert");
    assert_eq!(store.recorded_by(inserted), Some(actor));
}

#[rstest]
#[tokio::test]
async fn single_record_operations_round_trip(
    store: Arc<GoalStore>,
    parent: ParentId,
    actor: ActorId,
) {
    let reconciler = GoalReconciler::new(Arc::clone(&store));

    let id = reconciler
        .create_one(parent, actor, goal("one"))
        .await
        .expect("create succeeds");
    reconciler
        .update_one(id, goal("one, revised"))
        .await
        .expect("update succeeds");
    assert_eq!(
        store.fields_of(id).map(|f| f.title),
        Some("one, revised".into())
    );

    reconciler.delete_one(id).await.expect("delete succeeds");
    let error = reconciler
        .delete_one(id)
        .await
        .expect_err("second delete is not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
