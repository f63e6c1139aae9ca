//! Request model orchestrator.
//!
//! Public request types are re-exported here; the definitions live in the
//! private `core` module.

mod core;

pub use core::{PresentationClass, PresentationRequest, RequestId};
