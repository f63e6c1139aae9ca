//! Scheduler lifecycle audit hooks.
//!
//! Lightweight instrumentation so callers can observe the major transitions
//! of `PresentationScheduler`. Records capture a stage identifier plus
//! structured metadata so downstream code can log, buffer, or visualize the
//! scheduler's progression without contorting the admission path.

use std::time::SystemTime;

use serde_json::Value;

/// Distinct lifecycle checkpoints emitted by `PresentationScheduler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerAuditStage {
    /// A new scheduler instance was constructed.
    SchedulerConstructed,
    /// A request entered its class queue.
    RequestEnqueued,
    /// A queued request moved into its class slot.
    RequestAdmitted,
    /// An active instance closed (host event or programmatic close).
    RequestClosed,
    /// A queued request was removed before it was ever admitted.
    RequestCancelled,
    /// The active modal was marked non-interactive under an overlay.
    ModalSuspended,
    /// The active modal became interactive again.
    ModalResumed,
    /// The host failed to present an admitted request.
    HostPresentFailed,
    /// `close_all` tore down all active instances and queues.
    SchedulerReset,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct SchedulerAuditEvent {
    pub timestamp: SystemTime,
    pub stage: SchedulerAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SchedulerAuditEvent {
    fn new(stage: SchedulerAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }
}

/// Builder helper to append fields ergonomically.
pub struct SchedulerAuditEventBuilder {
    event: SchedulerAuditEvent,
}

impl SchedulerAuditEventBuilder {
    pub fn new(stage: SchedulerAuditStage) -> Self {
        Self {
            event: SchedulerAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> SchedulerAuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait SchedulerAudit: Send + Sync {
    fn record(&self, event: SchedulerAuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullSchedulerAudit;

impl SchedulerAudit for NullSchedulerAudit {
    fn record(&self, _event: SchedulerAuditEvent) {}
}
