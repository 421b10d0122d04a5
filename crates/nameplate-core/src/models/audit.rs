//! Audit trail — who created and last modified a record, and when.
//!
//! Audit fields are server-owned: the creation pair is set exactly once
//! from the caller's resolved actor identity, the modification pair is
//! re-stamped on every successful mutation. Clients can never supply
//! either.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque actor identity resolved by the external identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creation and last-modification stamps for a record.
///
/// Invariant: `creation_time <= modified_time`. The modification time
/// doubles as the optimistic-concurrency version token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_by: ActorId,
    pub creation_time: DateTime<Utc>,
    pub modified_by: ActorId,
    pub modified_time: DateTime<Utc>,
}

impl AuditInfo {
    /// Stamp a freshly created record: both pairs set to the same actor
    /// and instant, so `modified_time == creation_time`.
    pub fn stamp(actor: ActorId) -> Self {
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            creation_time: now,
            modified_by: actor,
            modified_time: now,
        }
    }

    /// Re-stamp the modification pair after a successful mutation.
    ///
    /// Clamped to `creation_time` so the invariant holds even under
    /// clock skew.
    pub fn touch(&mut self, actor: &ActorId) {
        self.modified_by = actor.clone();
        self.modified_time = Utc::now().max(self.creation_time);
    }
}
