//! Read/write projector — the only bridge between client payloads and
//! metadata records.
//!
//! `to_read_view` exposes every field, server-owned ones included.
//! `MutationIntent::from_write_view` accepts only the write schema and
//! carries nothing but `{name, description, tags}` plus the resolved
//! actor, so client input can never reach `id`, scope, audit, or
//! status by construction.

use crate::error::{MetadataError, MetadataResult};
use crate::metadata::{
    OrganizationScopedReadMetadata, ProjectScopedReadMetadata, ResourceMetadata,
    ResourceReadMetadata, ScopedReadMetadata, StaticResourceMetadata,
};
use crate::models::audit::ActorId;
use crate::models::name::ResourceName;
use crate::models::record::ResourceRecord;
use crate::models::tag::{merge_tags, Tag};

/// Caps applied to client-supplied write fields.
#[derive(Debug, Clone, Copy)]
pub struct WriteLimits {
    /// Maximum description length in bytes.
    pub max_description_length: usize,
    /// Maximum number of tags on one resource.
    pub max_tags: usize,
}

impl Default for WriteLimits {
    fn default() -> Self {
        Self {
            max_description_length: 1024,
            max_tags: 64,
        }
    }
}

/// Project a record into its scope-shaped read view.
pub fn to_read_view(record: &ResourceRecord) -> ScopedReadMetadata {
    let read = ResourceReadMetadata {
        base: StaticResourceMetadata {
            metadata: ResourceMetadata {
                name: record.name.as_str().to_owned(),
                description: record.description.clone(),
                tags: if record.tags.is_empty() {
                    None
                } else {
                    Some(record.tags.clone())
                },
            },
            id: record.id.as_str().to_owned(),
            creation_time: record.audit.creation_time,
            created_by: Some(record.audit.created_by.as_str().to_owned()),
            modified_time: Some(record.audit.modified_time),
            modified_by: Some(record.audit.modified_by.as_str().to_owned()),
        },
        deletion_time: record.deleted_at,
        provisioning_status: record.status,
    };
    let organization = OrganizationScopedReadMetadata {
        read,
        organization_id: record.scope.organization_id,
    };
    match record.scope.project_id {
        Some(project_id) => ScopedReadMetadata::Project(ProjectScopedReadMetadata {
            organization,
            project_id,
        }),
        None => ScopedReadMetadata::Organization(organization),
    }
}

/// A validated, allow-listed mutation derived from a write payload.
///
/// Constructed only by [`MutationIntent::from_write_view`]; there is no
/// path from a read-shaped object into an intent.
#[derive(Debug, Clone)]
pub struct MutationIntent {
    pub(crate) name: ResourceName,
    pub(crate) description: String,
    pub(crate) tags: Option<Vec<Tag>>,
    pub(crate) actor: ActorId,
}

impl MutationIntent {
    /// Validate a write payload and bind it to the resolved actor.
    pub fn from_write_view(
        payload: ResourceMetadata,
        actor: ActorId,
        limits: &WriteLimits,
    ) -> MetadataResult<Self> {
        let name = ResourceName::new(payload.name)?;
        if payload.description.len() > limits.max_description_length {
            return Err(MetadataError::Validation {
                message: format!(
                    "description exceeds {} bytes",
                    limits.max_description_length
                ),
            });
        }
        // The stored tag set is keyed by name: duplicate names within
        // one payload collapse last-write-wins before validation.
        let tags = payload.tags.map(|tags| merge_tags(&[], &tags));
        if let Some(tags) = &tags {
            if tags.len() > limits.max_tags {
                return Err(MetadataError::Validation {
                    message: format!("at most {} tags are allowed", limits.max_tags),
                });
            }
            if tags.iter().any(|t| t.name.is_empty()) {
                return Err(MetadataError::Validation {
                    message: "tag names must not be empty".into(),
                });
            }
        }
        Ok(Self {
            name,
            description: payload.description,
            tags,
            actor,
        })
    }

    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Apply this intent with full-replace semantics: the payload is
    /// the complete desired state of the mutable subset (absent tags
    /// clear the tag set). Re-stamps the modification pair.
    pub fn apply_replace(self, record: &mut ResourceRecord) {
        record.name = self.name;
        record.description = self.description;
        record.tags = self.tags.unwrap_or_default();
        record.audit.touch(&self.actor);
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        name: &str,
        description: &str,
        tags: Option<Vec<Tag>>,
        actor: ActorId,
    ) -> Self {
        Self {
            name: ResourceName::new(name).unwrap(),
            description: description.to_owned(),
            tags,
            actor,
        }
    }
}
