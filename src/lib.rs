//! Foyer: a presentation scheduler for modal and overlay UI units.
//!
//! One [`PresentationScheduler`] owns two priority queues (one per
//! [`PresentationClass`]) and at most one active instance per class. Callers
//! submit a [`PresentationRequest`] with [`PresentationScheduler::open`] and
//! receive a [`ResultFuture`] that resolves exactly once with the unit's
//! outcome. Admission runs through a pluggable [`AdmissionPolicy`]; the stock
//! [`OverlayPrecedencePolicy`] lets an overlay sit above an active modal and
//! suspends the modal's interaction while it does.
//!
//! Actual display work goes through the [`PresentationHost`] seam, so the
//! scheduler stays independent of any particular UI toolkit.

pub mod error;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod policy;
pub mod queue;
pub mod registry;
pub mod request;
pub mod scheduler;
pub mod store;

pub use error::{Result, SchedulerError};
pub use host::{HostCall, InstanceHandle, NullHost, PresentationHost, RecordingHost};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, SchedulerMetrics};
pub use notify::{LifecycleNotifier, PresentationOutcome, ResultFuture};
pub use policy::{AdmissionDecision, AdmissionPolicy, OverlayPrecedencePolicy};
pub use queue::RequestQueue;
pub use registry::{ActiveInstance, ActiveRegistry, Occupancy};
pub use request::{PresentationClass, PresentationRequest, RequestId};
pub use scheduler::audit::{
    NullSchedulerAudit, SchedulerAudit, SchedulerAuditEvent, SchedulerAuditEventBuilder,
    SchedulerAuditStage,
};
pub use scheduler::diagnostics::{ActiveSnapshot, QueueEntrySnapshot, SchedulerSnapshot};
pub use scheduler::{OpenTicket, PresentationScheduler, SchedulerConfig};
pub use store::{BackendError, EntityBackend, EntityState, EntityStore};
