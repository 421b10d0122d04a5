//! Nameplate Store — in-memory reference implementation of the
//! [`ResourceStore`](nameplate_core::store::ResourceStore) contract.
//!
//! Provides the atomic conditional insert on `(scope, name)` and the
//! optimistic version-checked update the core contracts demand. The
//! production deployment binds these contracts to the platform's
//! persistent object store instead.

mod memory;

pub use memory::MemoryStore;
