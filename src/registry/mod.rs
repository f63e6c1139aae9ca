//! Active-instance registry orchestrator.

mod core;

pub use core::{ActiveInstance, ActiveRegistry, Occupancy};
