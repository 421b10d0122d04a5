//! Collaborator trait definitions.
//!
//! All store operations are async. Scope-addressed operations take the
//! resolved [`Scope`] to enforce tenancy isolation; `find` and `purge`
//! are system-side (lifecycle signals address resources by id alone).

use chrono::{DateTime, Utc};

use crate::error::MetadataResult;
use crate::models::audit::ActorId;
use crate::models::id::ResourceId;
use crate::models::name::ResourceName;
use crate::models::record::ResourceRecord;
use crate::models::scope::{RequestContext, Scope};

/// Persistent store for metadata records.
///
/// Implementations must provide two atomicity guarantees:
/// - `insert` is a conditional insert keyed by `(scope, name)` over
///   live records: concurrent creations of the same pair resolve to
///   exactly one success and one `NameConflict`.
/// - `update` checks the version token and re-checks name uniqueness
///   (on rename) in one critical section, so a rename never transiently
///   frees or double-books a name.
///
/// Soft-deleted records release their name reservation but keep their
/// row until `purge`; ids are never reused.
pub trait ResourceStore: Send + Sync {
    /// Conditionally insert a fresh record. Fails with `NameConflict`
    /// if a live record in the same scope already holds the name.
    fn insert(
        &self,
        record: ResourceRecord,
    ) -> impl Future<Output = MetadataResult<ResourceRecord>> + Send;

    /// Fetch by id within a scope. Soft-deleting records still resolve.
    fn get(
        &self,
        scope: &Scope,
        id: &ResourceId,
    ) -> impl Future<Output = MetadataResult<ResourceRecord>> + Send;

    /// Fetch by name within a scope. Resolves live records only — a
    /// deleting record has already released its name.
    fn get_by_name(
        &self,
        scope: &Scope,
        name: &ResourceName,
    ) -> impl Future<Output = MetadataResult<ResourceRecord>> + Send;

    /// Fetch by id across scopes, for lifecycle-signal application.
    fn find(&self, id: &ResourceId) -> impl Future<Output = MetadataResult<ResourceRecord>> + Send;

    /// Replace a record if its stored version token equals
    /// `expected_version`; otherwise fail with `Conflict`.
    fn update(
        &self,
        expected_version: DateTime<Utc>,
        record: ResourceRecord,
    ) -> impl Future<Output = MetadataResult<ResourceRecord>> + Send;

    /// Snapshot of every record in the scope, soft-deleting included.
    fn list(&self, scope: &Scope) -> impl Future<Output = MetadataResult<Vec<ResourceRecord>>> + Send;

    /// Physically remove a record. Driven by the external
    /// garbage-collection sweep via the torn-down signal.
    fn purge(&self, id: &ResourceId) -> impl Future<Output = MetadataResult<()>> + Send;
}

/// External identity collaborator that resolves the acting principal
/// for an inbound request. Used to stamp audit fields.
pub trait ActorProvider: Send + Sync {
    fn current_actor(
        &self,
        ctx: &RequestContext,
    ) -> impl Future<Output = MetadataResult<ActorId>> + Send;
}
