//! Queue module orchestrator.

mod core;

pub use core::RequestQueue;
