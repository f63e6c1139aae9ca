//! Presentation host seam orchestrator.

mod core;

pub use core::{HostCall, InstanceHandle, NullHost, PresentationHost, RecordingHost};
