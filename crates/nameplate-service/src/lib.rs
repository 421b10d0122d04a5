//! Nameplate Service — request-scoped orchestration of the
//! resource-metadata subsystem.
//!
//! [`MetadataService`] wires the scope resolver, the identifier
//! allocator, the read/write projector, and the lifecycle tracker on
//! top of a [`ResourceStore`](nameplate_core::store::ResourceStore) and
//! an [`ActorProvider`](nameplate_core::store::ActorProvider).

pub mod config;
pub mod service;

pub use config::MetadataConfig;
pub use service::MetadataService;
