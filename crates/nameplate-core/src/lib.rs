//! Nameplate Core — domain models and contracts for the resource-metadata
//! subsystem.
//!
//! Every platform resource carries a nameplate: an immutable system-assigned
//! id, a mutable scope-unique name, free-form tags, an audit trail, and a
//! provisioning status, independent of the resource's own payload.
//!
//! This crate provides:
//! - Domain models ([`models`]): identifier, name, tags, scope, audit,
//!   lifecycle, and the aggregate record
//! - The read/write schema split ([`metadata`]) and the projector that
//!   enforces it ([`projector`])
//! - Collaborator traits ([`store`]) for the persistent store and the
//!   actor-identity provider
//! - Error types ([`MetadataError`], [`MetadataResult`])

pub mod error;
pub mod metadata;
pub mod models;
pub mod projector;
pub mod store;

pub use error::{MetadataError, MetadataResult};
