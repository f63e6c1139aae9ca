//! Entity store module orchestrator.

mod core;

pub use core::{BackendError, EntityBackend, EntityState, EntityStore};
