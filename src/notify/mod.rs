//! Lifecycle notification orchestrator.

mod core;

pub use core::{LifecycleNotifier, PresentationOutcome, ResultFuture};
