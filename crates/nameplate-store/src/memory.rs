//! In-memory implementation of [`ResourceStore`].
//!
//! A single async `RwLock` over the record table makes every mutation
//! linearizable: the conditional insert and the version-checked update
//! each run inside one write-lock critical section, which is what makes
//! check-and-reserve atomic and renames race-free.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use nameplate_core::error::{MetadataError, MetadataResult};
use nameplate_core::models::id::ResourceId;
use nameplate_core::models::name::ResourceName;
use nameplate_core::models::record::ResourceRecord;
use nameplate_core::models::scope::Scope;
use nameplate_core::store::ResourceStore;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Default)]
struct Inner {
    records: HashMap<ResourceId, ResourceRecord>,
    /// Name reservations for live (non-deleted) records, per scope.
    live_names: HashMap<Scope, HashMap<ResourceName, ResourceId>>,
}

impl Inner {
    fn name_holder(&self, scope: &Scope, name: &ResourceName) -> Option<&ResourceId> {
        self.live_names.get(scope).and_then(|names| names.get(name))
    }

    fn reserve_name(&mut self, scope: Scope, name: ResourceName, id: ResourceId) {
        self.live_names.entry(scope).or_default().insert(name, id);
    }

    fn release_name(&mut self, scope: &Scope, name: &ResourceName) {
        if let Some(names) = self.live_names.get_mut(scope) {
            names.remove(name);
            if names.is_empty() {
                self.live_names.remove(scope);
            }
        }
    }
}

fn not_found(key: impl ToString) -> MetadataError {
    MetadataError::NotFound {
        entity: "resource".into(),
        key: key.to_string(),
    }
}

/// In-memory reference store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceStore for MemoryStore {
    async fn insert(&self, record: ResourceRecord) -> MetadataResult<ResourceRecord> {
        let mut inner = self.inner.write().await;

        // Allocator collisions are cryptographically unlikely; refusing
        // the insert keeps the id-never-reassigned invariant anyway.
        if inner.records.contains_key(&record.id) {
            return Err(MetadataError::Internal(format!(
                "id collision on {}",
                record.id
            )));
        }
        if inner.name_holder(&record.scope, &record.name).is_some() {
            return Err(MetadataError::NameConflict {
                scope: record.scope.to_string(),
                name: record.name.to_string(),
            });
        }

        inner.reserve_name(record.scope, record.name.clone(), record.id.clone());
        inner.records.insert(record.id.clone(), record.clone());
        info!(id = %record.id, scope = %record.scope, name = %record.name, "resource inserted");
        Ok(record)
    }

    async fn get(&self, scope: &Scope, id: &ResourceId) -> MetadataResult<ResourceRecord> {
        let inner = self.inner.read().await;
        inner
            .records
            .get(id)
            .filter(|record| record.scope == *scope)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn get_by_name(
        &self,
        scope: &Scope,
        name: &ResourceName,
    ) -> MetadataResult<ResourceRecord> {
        let inner = self.inner.read().await;
        let id = inner.name_holder(scope, name).ok_or_else(|| not_found(name))?;
        inner.records.get(id).cloned().ok_or_else(|| not_found(name))
    }

    async fn find(&self, id: &ResourceId) -> MetadataResult<ResourceRecord> {
        let inner = self.inner.read().await;
        inner.records.get(id).cloned().ok_or_else(|| not_found(id))
    }

    async fn update(
        &self,
        expected_version: DateTime<Utc>,
        record: ResourceRecord,
    ) -> MetadataResult<ResourceRecord> {
        let mut inner = self.inner.write().await;

        let stored = inner.records.get(&record.id).ok_or_else(|| not_found(&record.id))?;
        if stored.version() != expected_version {
            return Err(MetadataError::Conflict {
                id: record.id.to_string(),
            });
        }
        if stored.scope != record.scope {
            return Err(MetadataError::Validation {
                message: "scope is immutable".into(),
            });
        }
        if stored.is_deleting() && !record.is_deleting() {
            return Err(MetadataError::Validation {
                message: "deletion marker cannot be cleared".into(),
            });
        }

        let previous_name = stored.name.clone();
        let was_live = !stored.is_deleting();
        let stays_live = !record.is_deleting();

        // Rename: check the new name before releasing the old one, all
        // under the same write lock.
        if was_live && stays_live && previous_name != record.name {
            if let Some(holder) = inner.name_holder(&record.scope, &record.name) {
                if *holder != record.id {
                    return Err(MetadataError::NameConflict {
                        scope: record.scope.to_string(),
                        name: record.name.to_string(),
                    });
                }
            }
            inner.release_name(&record.scope, &previous_name);
            inner.reserve_name(record.scope, record.name.clone(), record.id.clone());
        }

        // Soft delete frees the name for reuse; the row stays until the
        // external sweep purges it.
        if was_live && !stays_live {
            inner.release_name(&record.scope, &previous_name);
        }

        inner.records.insert(record.id.clone(), record.clone());
        debug!(id = %record.id, name = %record.name, "resource updated");
        Ok(record)
    }

    async fn list(&self, scope: &Scope) -> MetadataResult<Vec<ResourceRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .values()
            .filter(|record| record.scope == *scope)
            .cloned()
            .collect())
    }

    async fn purge(&self, id: &ResourceId) -> MetadataResult<()> {
        let mut inner = self.inner.write().await;
        let record = inner.records.remove(id).ok_or_else(|| not_found(id))?;
        // A purged record that was somehow still live must not leave a
        // dangling reservation.
        if !record.is_deleting() {
            inner.release_name(&record.scope, &record.name);
        }
        info!(id = %record.id, scope = %record.scope, "resource purged");
        Ok(())
    }
}
