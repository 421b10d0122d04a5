//! Domain models for Nameplate.
//!
//! These are the core types shared across all crates.

pub mod audit;
pub mod id;
pub mod lifecycle;
pub mod name;
pub mod record;
pub mod scope;
pub mod tag;
