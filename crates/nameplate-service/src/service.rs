//! Metadata service — request orchestration for create, read, update,
//! delete, list, and lifecycle-signal application.

use chrono::{DateTime, Utc};
use nameplate_core::error::{MetadataError, MetadataResult};
use nameplate_core::metadata::{ResourceMetadata, ScopedReadMetadata};
use nameplate_core::models::audit::ActorId;
use nameplate_core::models::id::ResourceId;
use nameplate_core::models::lifecycle::{
    next_status, OrchestrationEvent, OrchestrationSignal, ProvisioningStatus,
};
use nameplate_core::models::name::ResourceName;
use nameplate_core::models::record::ResourceRecord;
use nameplate_core::models::scope::{RequestContext, ResourceKind, Scope};
use nameplate_core::models::tag::{merge_tags, Tag};
use nameplate_core::projector::{to_read_view, MutationIntent};
use nameplate_core::store::{ActorProvider, ResourceStore};
use tracing::{debug, info, warn};

use crate::config::MetadataConfig;

/// Actor identity stamped on mutations driven by orchestration
/// signals rather than by a client request.
const SYSTEM_ACTOR: &str = "system";

/// Metadata service.
///
/// Generic over the store and actor-provider collaborators so that the
/// request layer has no dependency on any concrete backend.
pub struct MetadataService<S: ResourceStore, A: ActorProvider> {
    store: S,
    actors: A,
    config: MetadataConfig,
}

impl<S: ResourceStore, A: ActorProvider> MetadataService<S, A> {
    pub fn new(store: S, actors: A, config: MetadataConfig) -> Self {
        Self {
            store,
            actors,
            config,
        }
    }

    /// Create a resource from a write payload.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        payload: ResourceMetadata,
    ) -> MetadataResult<ScopedReadMetadata> {
        // 1. Resolve actor identity and scope from request context.
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;

        // 2. Validate the payload through the write-view allow-list.
        let intent = MutationIntent::from_write_view(payload, actor, &self.config.write_limits())?;

        // 3. Mint the id and assemble the record; the store's
        //    conditional insert is the name-uniqueness check.
        let id = ResourceId::allocate();
        let record = ResourceRecord::create(id, kind, scope, intent);
        let stored = self.store.insert(record).await?;

        info!(id = %stored.id, scope = %stored.scope, name = %stored.name,
              kind = kind.key, "resource created");
        Ok(to_read_view(&stored))
    }

    /// Fetch one resource by id.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        id: &ResourceId,
    ) -> MetadataResult<ScopedReadMetadata> {
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch(&scope, kind, id).await?;
        Ok(to_read_view(&record))
    }

    /// Fetch one live resource by name.
    pub async fn get_by_name(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        name: &ResourceName,
    ) -> MetadataResult<ScopedReadMetadata> {
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch_by_name(&scope, kind, name).await?;
        Ok(to_read_view(&record))
    }

    /// Update a resource by id with full-replace semantics (the payload
    /// is the complete desired state of the mutable subset).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        id: &ResourceId,
        expected_version: DateTime<Utc>,
        payload: ResourceMetadata,
    ) -> MetadataResult<ScopedReadMetadata> {
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch(&scope, kind, id).await?;
        self.apply_update(record, expected_version, payload, actor)
            .await
    }

    /// Update a resource addressed by its current name.
    pub async fn update_by_name(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        name: &ResourceName,
        expected_version: DateTime<Utc>,
        payload: ResourceMetadata,
    ) -> MetadataResult<ScopedReadMetadata> {
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch_by_name(&scope, kind, name).await?;
        self.apply_update(record, expected_version, payload, actor)
            .await
    }

    /// Merge tags by key into a resource, leaving other tags and all
    /// other fields untouched.
    pub async fn merge_tags(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        id: &ResourceId,
        expected_version: DateTime<Utc>,
        tags: Vec<Tag>,
    ) -> MetadataResult<ScopedReadMetadata> {
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;
        let mut record = self.fetch(&scope, kind, id).await?;
        if record.is_deleting() {
            return Err(MetadataError::AlreadyDeleting {
                id: record.id.to_string(),
            });
        }

        let merged = merge_tags(&record.tags, &tags);
        if merged.len() > self.config.max_tags {
            return Err(MetadataError::Validation {
                message: format!("at most {} tags are allowed", self.config.max_tags),
            });
        }
        if tags.iter().any(|t| t.name.is_empty()) {
            return Err(MetadataError::Validation {
                message: "tag names must not be empty".into(),
            });
        }

        record.tags = merged;
        record.audit.touch(&actor);
        let stored = self.store.update(expected_version, record).await?;
        debug!(id = %stored.id, "tags merged");
        Ok(to_read_view(&stored))
    }

    /// Soft-delete a resource by id. Idempotent: repeating the request
    /// returns the same view with an unchanged deletion timestamp.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        id: &ResourceId,
    ) -> MetadataResult<ScopedReadMetadata> {
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch(&scope, kind, id).await?;
        self.apply_delete(record, actor).await
    }

    /// Soft-delete a resource addressed by its current name.
    pub async fn delete_by_name(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
        name: &ResourceName,
    ) -> MetadataResult<ScopedReadMetadata> {
        let actor = self.actors.current_actor(ctx).await?;
        let scope = Scope::resolve(ctx, kind)?;
        let record = self.fetch_by_name(&scope, kind, name).await?;
        self.apply_delete(record, actor).await
    }

    /// Snapshot of every resource of `kind` in the caller's scope,
    /// soft-deleting records included. Narrower views are a client-side
    /// filter over this result.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        kind: &ResourceKind,
    ) -> MetadataResult<Vec<ScopedReadMetadata>> {
        let scope = Scope::resolve(ctx, kind)?;
        let records = self.store.list(&scope).await?;
        let views = records
            .iter()
            .filter(|record| record.kind_key == kind.key)
            .map(to_read_view)
            .collect::<Vec<_>>();
        debug!(scope = %scope, kind = kind.key, count = views.len(), "scope listed");
        Ok(views)
    }

    /// Apply an asynchronous orchestration signal.
    ///
    /// Signals with no legal edge from the current status are dropped
    /// and logged, never force-applied: they arrive out of band and may
    /// be stale replays. A dropped signal is not an error — status is
    /// data, not a request outcome.
    pub async fn apply_orchestration_event(&self, signal: OrchestrationSignal) -> MetadataResult<()> {
        let mut attempts = 0;
        loop {
            let record = match self.store.find(&signal.resource_id).await {
                Ok(record) => record,
                Err(MetadataError::NotFound { .. }) => {
                    warn!(id = %signal.resource_id, event = ?signal.event,
                          "orchestration signal for unknown resource dropped");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            if signal.event == OrchestrationEvent::TornDown {
                // Teardown completion: the external sweep's cue to
                // remove the row for good. Any deletion-marked record
                // may progress to final teardown, including one whose
                // earlier teardown failed and was retried externally.
                if record.is_deleting() {
                    self.store.purge(&record.id).await?;
                    info!(id = %record.id, "resource torn down and purged");
                } else {
                    warn!(id = %record.id, status = ?record.status,
                          "torn-down signal for undeleted resource dropped");
                }
                return Ok(());
            }

            // A marked record only progresses toward teardown.
            if record.is_deleting()
                && !(record.status == ProvisioningStatus::Deprovisioning
                    && signal.event == OrchestrationEvent::Failed)
            {
                warn!(id = %record.id, status = ?record.status, event = ?signal.event,
                      "orchestration signal for deleting resource dropped");
                return Ok(());
            }

            let Some(next) = next_status(record.status, signal.event) else {
                warn!(id = %record.id, status = ?record.status, event = ?signal.event,
                      "orchestration signal with no valid transition dropped");
                return Ok(());
            };

            let version = record.version();
            let mut updated = record;
            updated.status = next;
            // Re-stamp the audit pair so the version token advances:
            // a client write that read the record before this signal
            // must fail the store's version check, not revert the
            // status it just applied.
            updated.audit.touch(&ActorId::new(SYSTEM_ACTOR));
            match self.store.update(version, updated).await {
                Ok(stored) => {
                    info!(id = %stored.id, status = ?stored.status, "provisioning status updated");
                    return Ok(());
                }
                Err(MetadataError::Conflict { .. })
                    if attempts < self.config.signal_retry_budget =>
                {
                    // Raced a client mutation; re-read and retry.
                    attempts += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // -----------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------

    /// Fetch by id, treating a record of a different kind as absent.
    async fn fetch(
        &self,
        scope: &Scope,
        kind: &ResourceKind,
        id: &ResourceId,
    ) -> MetadataResult<ResourceRecord> {
        let record = self.store.get(scope, id).await?;
        Self::check_kind(record, kind)
    }

    async fn fetch_by_name(
        &self,
        scope: &Scope,
        kind: &ResourceKind,
        name: &ResourceName,
    ) -> MetadataResult<ResourceRecord> {
        let record = self.store.get_by_name(scope, name).await?;
        Self::check_kind(record, kind)
    }

    fn check_kind(record: ResourceRecord, kind: &ResourceKind) -> MetadataResult<ResourceRecord> {
        if record.kind_key == kind.key {
            Ok(record)
        } else {
            Err(MetadataError::NotFound {
                entity: kind.key.into(),
                key: record.id.to_string(),
            })
        }
    }

    async fn apply_update(
        &self,
        mut record: ResourceRecord,
        expected_version: DateTime<Utc>,
        payload: ResourceMetadata,
        actor: ActorId,
    ) -> MetadataResult<ScopedReadMetadata> {
        if record.is_deleting() {
            return Err(MetadataError::AlreadyDeleting {
                id: record.id.to_string(),
            });
        }
        let intent = MutationIntent::from_write_view(payload, actor, &self.config.write_limits())?;
        intent.apply_replace(&mut record);
        let stored = self.store.update(expected_version, record).await?;
        debug!(id = %stored.id, name = %stored.name, "resource updated");
        Ok(to_read_view(&stored))
    }

    async fn apply_delete(
        &self,
        mut record: ResourceRecord,
        actor: ActorId,
    ) -> MetadataResult<ScopedReadMetadata> {
        // Idempotent: re-requesting delete on a marked record is a
        // no-op with the original deletion timestamp.
        if record.is_deleting() {
            return Ok(to_read_view(&record));
        }

        let version = record.version();
        record.deleted_at = Some(Utc::now());
        if record
            .status
            .can_transition_to(ProvisioningStatus::Deprovisioning)
        {
            record.status = ProvisioningStatus::Deprovisioning;
        }
        record.audit.touch(&actor);
        let stored = self.store.update(version, record).await?;

        info!(id = %stored.id, scope = %stored.scope, "resource deletion marked");
        Ok(to_read_view(&stored))
    }
}
