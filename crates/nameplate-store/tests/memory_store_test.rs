//! Integration tests for the in-memory store — uniqueness enforcement,
//! optimistic concurrency, and name-reservation lifecycle.

use std::sync::Arc;

use chrono::Utc;
use nameplate_core::error::MetadataError;
use nameplate_core::models::audit::{ActorId, AuditInfo};
use nameplate_core::models::id::ResourceId;
use nameplate_core::models::lifecycle::ProvisioningStatus;
use nameplate_core::models::name::ResourceName;
use nameplate_core::models::record::ResourceRecord;
use nameplate_core::models::scope::Scope;
use nameplate_core::models::tag::Tag;
use nameplate_core::store::ResourceStore;
use nameplate_store::MemoryStore;
use uuid::Uuid;

/// Helper: a fresh project scope.
fn fresh_scope() -> Scope {
    Scope {
        organization_id: Uuid::new_v4(),
        project_id: Some(Uuid::new_v4()),
    }
}

/// Helper: a live record with the given name in the given scope.
fn record(scope: Scope, name: &str) -> ResourceRecord {
    ResourceRecord {
        id: ResourceId::allocate(),
        kind_key: "cluster".into(),
        scope,
        name: ResourceName::new(name).unwrap(),
        description: String::new(),
        tags: Vec::new(),
        audit: AuditInfo::stamp(ActorId::new("tester")),
        status: ProvisioningStatus::Provisioning,
        deleted_at: None,
    }
}

// ---------------------------------------------------------------------------
// Conditional insert
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insert_reserves_the_name_within_its_scope() {
    let store = MemoryStore::new();
    let scope = fresh_scope();

    store.insert(record(scope, "alpha")).await.unwrap();
    let err = store.insert(record(scope, "alpha")).await.unwrap_err();
    assert!(matches!(err, MetadataError::NameConflict { .. }));

    // Same name in a different scope is fine.
    store.insert(record(fresh_scope(), "alpha")).await.unwrap();
}

#[tokio::test]
async fn concurrent_creates_resolve_to_one_success_one_conflict() {
    let store = Arc::new(MemoryStore::new());
    let scope = fresh_scope();

    let a = tokio::spawn({
        let store = store.clone();
        let record = record(scope, "alpha");
        async move { store.insert(record).await }
    });
    let b = tokio::spawn({
        let store = store.clone();
        let record = record(scope, "alpha");
        async move { store.insert(record).await }
    });

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(
        a.is_ok() as u8 + b.is_ok() as u8,
        1,
        "exactly one create must win"
    );
    let loser = if a.is_ok() { b } else { a };
    assert!(matches!(
        loser.unwrap_err(),
        MetadataError::NameConflict { .. }
    ));
}

// ---------------------------------------------------------------------------
// Optimistic update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stale_version_token_is_a_conflict() {
    let store = MemoryStore::new();
    let stored = store.insert(record(fresh_scope(), "alpha")).await.unwrap();

    let mut first = stored.clone();
    first.description = "one".into();
    first.audit.touch(&ActorId::new("tester"));
    store.update(stored.version(), first).await.unwrap();

    // Second writer still holds the original version token.
    let mut second = stored.clone();
    second.description = "two".into();
    let err = store.update(stored.version(), second).await.unwrap_err();
    assert!(matches!(err, MetadataError::Conflict { .. }));
}

#[tokio::test]
async fn rename_rechecks_before_releasing_the_old_name() {
    let store = MemoryStore::new();
    let scope = fresh_scope();
    let alpha = store.insert(record(scope, "alpha")).await.unwrap();
    store.insert(record(scope, "beta")).await.unwrap();

    // alpha -> beta collides with the live holder of "beta".
    let mut renamed = alpha.clone();
    renamed.name = ResourceName::new("beta").unwrap();
    let err = store.update(alpha.version(), renamed).await.unwrap_err();
    assert!(matches!(err, MetadataError::NameConflict { .. }));

    // The failed rename released nothing: "alpha" is still taken.
    let err = store.insert(record(scope, "alpha")).await.unwrap_err();
    assert!(matches!(err, MetadataError::NameConflict { .. }));

    // A rename to a free name moves the reservation.
    let mut renamed = alpha.clone();
    renamed.name = ResourceName::new("gamma").unwrap();
    renamed.audit.touch(&ActorId::new("tester"));
    store.update(alpha.version(), renamed).await.unwrap();
    store.insert(record(scope, "alpha")).await.unwrap();
    assert!(store.insert(record(scope, "gamma")).await.is_err());
}

#[tokio::test]
async fn scope_and_deletion_marker_are_immutable() {
    let store = MemoryStore::new();
    let stored = store.insert(record(fresh_scope(), "alpha")).await.unwrap();

    let mut moved = stored.clone();
    moved.scope = fresh_scope();
    assert!(matches!(
        store.update(stored.version(), moved).await.unwrap_err(),
        MetadataError::Validation { .. }
    ));

    let mut deleted = stored.clone();
    deleted.deleted_at = Some(Utc::now());
    let deleted = store.update(stored.version(), deleted).await.unwrap();

    let mut revived = deleted.clone();
    revived.deleted_at = None;
    assert!(matches!(
        store.update(deleted.version(), revived).await.unwrap_err(),
        MetadataError::Validation { .. }
    ));
}

// ---------------------------------------------------------------------------
// Deletion, lookup, list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn soft_delete_releases_the_name_but_keeps_the_row() {
    let store = MemoryStore::new();
    let scope = fresh_scope();
    let stored = store.insert(record(scope, "alpha")).await.unwrap();

    let mut deleted = stored.clone();
    deleted.deleted_at = Some(Utc::now());
    store.update(stored.version(), deleted).await.unwrap();

    // Name immediately reusable; id lookup still resolves the old row.
    let replacement = store.insert(record(scope, "alpha")).await.unwrap();
    assert_ne!(replacement.id, stored.id);
    assert!(store.get(&scope, &stored.id).await.unwrap().is_deleting());

    // Name lookup resolves the live replacement, not the deleting row.
    let by_name = store
        .get_by_name(&scope, &ResourceName::new("alpha").unwrap())
        .await
        .unwrap();
    assert_eq!(by_name.id, replacement.id);

    // The deleting row still appears in the scope snapshot.
    let listed = store.list(&scope).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn get_is_scope_isolated() {
    let store = MemoryStore::new();
    let stored = store.insert(record(fresh_scope(), "alpha")).await.unwrap();

    let foreign = fresh_scope();
    assert!(matches!(
        store.get(&foreign, &stored.id).await.unwrap_err(),
        MetadataError::NotFound { .. }
    ));
    // System-side lookup is not scope-bound.
    assert_eq!(store.find(&stored.id).await.unwrap().id, stored.id);
}

#[tokio::test]
async fn purge_removes_the_row_for_good() {
    let store = MemoryStore::new();
    let scope = fresh_scope();
    let mut stored = store.insert(record(scope, "alpha")).await.unwrap();
    stored.deleted_at = Some(Utc::now());
    let stored = store.update(stored.audit.modified_time, stored.clone()).await.unwrap();

    store.purge(&stored.id).await.unwrap();
    assert!(matches!(
        store.find(&stored.id).await.unwrap_err(),
        MetadataError::NotFound { .. }
    ));
    assert!(store.purge(&stored.id).await.is_err());
}

#[tokio::test]
async fn tags_round_trip_through_the_store() {
    let store = MemoryStore::new();
    let mut input = record(fresh_scope(), "alpha");
    input.tags = vec![Tag::new("env", "prod")];
    let stored = store.insert(input).await.unwrap();
    let fetched = store.find(&stored.id).await.unwrap();
    assert_eq!(fetched.tags, vec![Tag::new("env", "prod")]);
}
