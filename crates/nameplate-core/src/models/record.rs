//! The canonical metadata record — identity, naming, tags, scope, audit
//! trail, and lifecycle status combined.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::audit::AuditInfo;
use super::id::ResourceId;
use super::lifecycle::ProvisioningStatus;
use super::name::ResourceName;
use super::scope::{ResourceKind, Scope};
use super::tag::Tag;
use crate::projector::MutationIntent;

/// Aggregate metadata record for one platform resource.
///
/// Invariants:
/// - `id` is set exactly once and never reassigned
/// - `name` is unique among non-deleted records in the same scope
///   (enforced by the store)
/// - `scope` is immutable after creation
/// - `deleted_at`, once set, is never cleared; the record then accepts
///   no further client mutation
/// - `audit.creation_time <= audit.modified_time`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: ResourceId,
    /// Key of the [`ResourceKind`] this record belongs to.
    pub kind_key: String,
    pub scope: Scope,
    pub name: ResourceName,
    pub description: String,
    pub tags: Vec<Tag>,
    pub audit: AuditInfo,
    pub status: ProvisioningStatus,
    /// Deletion marker. Presence signals deletion-in-progress.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ResourceRecord {
    /// Assemble a fresh record from a validated mutation intent.
    ///
    /// This is the only construction path: the id comes from the
    /// allocator, the scope from the resolver, and the audit stamp from
    /// the intent's actor.
    pub fn create(id: ResourceId, kind: &ResourceKind, scope: Scope, intent: MutationIntent) -> Self {
        Self {
            id,
            kind_key: kind.key.to_owned(),
            scope,
            name: intent.name,
            description: intent.description,
            tags: intent.tags.unwrap_or_default(),
            audit: AuditInfo::stamp(intent.actor),
            status: ProvisioningStatus::initial(kind),
            deleted_at: None,
        }
    }

    /// Whether the deletion marker is set.
    pub fn is_deleting(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// The optimistic-concurrency version token of this record.
    pub fn version(&self) -> DateTime<Utc> {
        self.audit.modified_time
    }
}
