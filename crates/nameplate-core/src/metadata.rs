//! Read/write schema for resource metadata.
//!
//! The write view ([`ResourceMetadata`]) is exactly the client-mutable
//! subset: name, description, tags. It has no other fields, so a client
//! echoing a read view back cannot smuggle server-owned values — they
//! are unrepresentable in the accepted shape.
//!
//! The read view is layered by value embedding with `#[serde(flatten)]`,
//! so each wrapper serializes as one flat camelCase object:
//!
//! `ResourceMetadata` ⊂ [`StaticResourceMetadata`] (id + audit) ⊂
//! [`ResourceReadMetadata`] (deletion marker + status) ⊂
//! [`OrganizationScopedReadMetadata`] ⊂ [`ProjectScopedReadMetadata`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::lifecycle::ProvisioningStatus;
use crate::models::tag::Tag;

/// The client-mutable subset of a resource's metadata — the entire
/// write schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

/// Server-assigned identity and audit trail on top of the mutable
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticResourceMetadata {
    #[serde(flatten)]
    pub metadata: ResourceMetadata,
    pub id: String,
    pub creation_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

/// Full read view of one resource, scope fields excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReadMetadata {
    #[serde(flatten)]
    pub base: StaticResourceMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_time: Option<DateTime<Utc>>,
    pub provisioning_status: ProvisioningStatus,
}

/// Read view of a resource scoped directly to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationScopedReadMetadata {
    #[serde(flatten)]
    pub read: ResourceReadMetadata,
    pub organization_id: Uuid,
}

/// Read view of a resource scoped to a project within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScopedReadMetadata {
    #[serde(flatten)]
    pub organization: OrganizationScopedReadMetadata,
    pub project_id: Uuid,
}

/// Read view polymorphic over the two scope shapes.
///
/// A tagged pair of concrete structs, never structural coercion: the
/// project variant is tried first on deserialization since its shape is
/// a strict superset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopedReadMetadata {
    Project(ProjectScopedReadMetadata),
    Organization(OrganizationScopedReadMetadata),
}

impl ScopedReadMetadata {
    fn read(&self) -> &ResourceReadMetadata {
        match self {
            Self::Project(p) => &p.organization.read,
            Self::Organization(o) => &o.read,
        }
    }

    pub fn id(&self) -> &str {
        &self.read().base.id
    }

    pub fn name(&self) -> &str {
        &self.read().base.metadata.name
    }

    pub fn description(&self) -> &str {
        &self.read().base.metadata.description
    }

    pub fn tags(&self) -> &[Tag] {
        self.read().base.metadata.tags.as_deref().unwrap_or_default()
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.read().base.creation_time
    }

    pub fn modified_time(&self) -> Option<DateTime<Utc>> {
        self.read().base.modified_time
    }

    pub fn deletion_time(&self) -> Option<DateTime<Utc>> {
        self.read().deletion_time
    }

    pub fn provisioning_status(&self) -> ProvisioningStatus {
        self.read().provisioning_status
    }

    pub fn organization_id(&self) -> Uuid {
        match self {
            Self::Project(p) => p.organization.organization_id,
            Self::Organization(o) => o.organization_id,
        }
    }

    pub fn project_id(&self) -> Option<Uuid> {
        match self {
            Self::Project(p) => Some(p.project_id),
            Self::Organization(_) => None,
        }
    }

    /// Stable composite key for CI/CD and cloud-tagging consumers.
    ///
    /// Built from the immutable `id`, never from the mutable name:
    /// `organizationId/projectId/id` or `organizationId/id`.
    pub fn composite_key(&self) -> String {
        match self.project_id() {
            Some(project_id) => {
                format!("{}/{}/{}", self.organization_id(), project_id, self.id())
            }
            None => format!("{}/{}", self.organization_id(), self.id()),
        }
    }
}
