//! Scope — the organization/project context that bounds name uniqueness.
//!
//! Scope is always derived from request context (endpoints are nested
//! under an organization path), never from body content. It is assigned
//! at creation and immutable thereafter; moving a resource between
//! scopes is delete + recreate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MetadataError;

/// Whether a resource kind lives directly under an organization or
/// inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoping {
    Organization,
    Project,
}

/// Descriptor for a kind of platform resource.
///
/// `key` namespaces records in the store, `scoping` is what the scope
/// resolver validates against, and `orchestrated` tells the lifecycle
/// tracker whether a backing controller will drive provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    pub key: &'static str,
    pub scoping: Scoping,
    pub orchestrated: bool,
}

impl ResourceKind {
    pub const fn organization_scoped(key: &'static str, orchestrated: bool) -> Self {
        Self {
            key,
            scoping: Scoping::Organization,
            orchestrated,
        }
    }

    pub const fn project_scoped(key: &'static str, orchestrated: bool) -> Self {
        Self {
            key,
            scoping: Scoping::Project,
            orchestrated,
        }
    }
}

/// Path-derived context of an inbound request.
///
/// Carries only the scope identifiers; actor identity comes from the
/// external identity collaborator, not from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub organization_id: Uuid,
    pub project_id: Option<Uuid>,
}

impl RequestContext {
    pub fn for_organization(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            project_id: None,
        }
    }

    pub fn for_project(organization_id: Uuid, project_id: Uuid) -> Self {
        Self {
            organization_id,
            project_id: Some(project_id),
        }
    }
}

/// The resolved scope a record belongs to. Scope identifiers are IDs,
/// never names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub organization_id: Uuid,
    pub project_id: Option<Uuid>,
}

impl Scope {
    /// Derive and validate the scope for `kind` from request context.
    ///
    /// Fails with `InvalidScope` when a project-scoped kind is invoked
    /// without project context, or an organization-only kind with one.
    pub fn resolve(ctx: &RequestContext, kind: &ResourceKind) -> Result<Self, MetadataError> {
        match (kind.scoping, ctx.project_id) {
            (Scoping::Organization, None) => Ok(Self {
                organization_id: ctx.organization_id,
                project_id: None,
            }),
            (Scoping::Organization, Some(_)) => Err(MetadataError::InvalidScope {
                message: format!("resource kind {} is organization-scoped", kind.key),
            }),
            (Scoping::Project, Some(project_id)) => Ok(Self {
                organization_id: ctx.organization_id,
                project_id: Some(project_id),
            }),
            (Scoping::Project, None) => Err(MetadataError::InvalidScope {
                message: format!("resource kind {} requires project context", kind.key),
            }),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.project_id {
            Some(project_id) => write!(f, "{}/{}", self.organization_id, project_id),
            None => write!(f, "{}", self.organization_id),
        }
    }
}
