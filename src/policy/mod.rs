//! Admission policy orchestrator.

mod core;

pub use core::{AdmissionDecision, AdmissionPolicy, OverlayPrecedencePolicy};
