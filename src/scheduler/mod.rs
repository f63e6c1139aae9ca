//! The presentation scheduler: admission, suspension, and lifecycle
//! bookkeeping for modal and overlay units.
//!
//! One scheduler instance owns both class queues, both active slots, and the
//! pending result futures. It is an explicit object with a
//! constructor-injected host capability; create it at application start and
//! call [`PresentationScheduler::close_all`] at shutdown. All mutation is
//! single-threaded and event-driven: `open`, `close`, and host-reported
//! closure each run their admission re-evaluation synchronously before
//! returning.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{Value, json};

use crate::error::{Result, SchedulerError};
use crate::host::{InstanceHandle, PresentationHost};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::SchedulerMetrics;
use crate::notify::{LifecycleNotifier, PresentationOutcome, ResultFuture};
use crate::policy::{AdmissionDecision, AdmissionPolicy, OverlayPrecedencePolicy};
use crate::queue::RequestQueue;
use crate::registry::ActiveRegistry;
use crate::request::{PresentationClass, PresentationRequest, RequestId};

pub mod audit;
pub mod diagnostics;

use audit::{NullSchedulerAudit, SchedulerAudit, SchedulerAuditEventBuilder, SchedulerAuditStage};
use diagnostics::{ActiveSnapshot, QueueEntrySnapshot, SchedulerSnapshot};

const LOG_TARGET: &str = "foyer::scheduler";

/// Configuration knobs for the scheduler.
#[derive(Clone)]
pub struct SchedulerConfig {
    /// Optional structured logger for lifecycle events.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<SchedulerMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    /// Audit sink for lifecycle checkpoints.
    pub audit: Arc<dyn SchedulerAudit>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "foyer::scheduler.metrics".to_string(),
            audit: Arc::new(NullSchedulerAudit),
        }
    }
}

impl SchedulerConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SchedulerMetrics::new())));
        }
    }

    /// Disable metrics collection and prevent further snapshots.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SchedulerMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Returned from [`PresentationScheduler::open`]: the request id plus the
/// single-resolution future for its eventual outcome.
#[derive(Debug)]
pub struct OpenTicket {
    pub id: RequestId,
    pub result: ResultFuture,
}

pub struct PresentationScheduler {
    modal_queue: RequestQueue,
    overlay_queue: RequestQueue,
    registry: ActiveRegistry,
    notifier: LifecycleNotifier,
    policy: Box<dyn AdmissionPolicy>,
    host: Box<dyn PresentationHost>,
    config: SchedulerConfig,
    started_at: Instant,
    last_metrics_emit: Option<Instant>,
}

impl PresentationScheduler {
    /// Scheduler with the stock overlay-precedence policy.
    pub fn new(host: Box<dyn PresentationHost>) -> Self {
        Self::with_policy(host, Box::new(OverlayPrecedencePolicy))
    }

    pub fn with_policy(host: Box<dyn PresentationHost>, policy: Box<dyn AdmissionPolicy>) -> Self {
        Self::with_config(host, policy, SchedulerConfig::default())
    }

    pub fn with_config(
        host: Box<dyn PresentationHost>,
        policy: Box<dyn AdmissionPolicy>,
        config: SchedulerConfig,
    ) -> Self {
        let scheduler = Self {
            modal_queue: RequestQueue::new(),
            overlay_queue: RequestQueue::new(),
            registry: ActiveRegistry::new(),
            notifier: LifecycleNotifier::new(),
            policy,
            host,
            config,
            started_at: Instant::now(),
            last_metrics_emit: None,
        };
        scheduler.audit_record(SchedulerAuditStage::SchedulerConstructed, []);
        scheduler
    }

    pub fn config_mut(&mut self) -> &mut SchedulerConfig {
        &mut self.config
    }

    /// Enqueue a request and attempt admission for its class.
    ///
    /// Returns immediately with the id and the result future. Submitting an
    /// id that is already queued or active is a caller error.
    pub fn open(&mut self, request: PresentationRequest) -> Result<OpenTicket> {
        if self.notifier.is_pending(&request.id) {
            return Err(SchedulerError::DuplicateId(request.id));
        }

        let id = request.id.clone();
        let class = request.class;
        let priority = request.priority;
        let result = self.notifier.register(&id);
        self.queue_mut(class).enqueue(request);

        self.with_metrics(|m| m.record_open());
        self.log_event(
            LogLevel::Debug,
            "request_enqueued",
            [
                json_kv("id", json!(id)),
                json_kv("class", json!(class.label())),
                json_kv("priority", json!(priority)),
            ],
        );
        self.audit_record(
            SchedulerAuditStage::RequestEnqueued,
            [json_kv("id", json!(id)), json_kv("class", json!(class.label()))],
        );

        self.pump(class)?;
        self.maybe_emit_metrics();
        Ok(OpenTicket { id, result })
    }

    /// Host-reported closure event for a presented unit.
    ///
    /// Clears the slot, resolves the caller's future, and re-runs admission.
    /// Unknown handles are ignored so late events after `close_all` stay
    /// harmless.
    pub fn handle_closed(
        &mut self,
        handle: InstanceHandle,
        result: PresentationOutcome,
    ) -> Result<()> {
        let Some(class) = self.registry.class_of_handle(handle) else {
            return Ok(());
        };
        self.finish_active(class, result, false)
    }

    /// Close by id: dismisses the active instance, or cancels a queued
    /// request (resolving its future with no result). Unknown ids are a
    /// no-op.
    pub fn close(&mut self, id: &str, result: PresentationOutcome) -> Result<()> {
        for class in PresentationClass::ALL {
            if self.registry.active_id(class) == Some(id) {
                return self.finish_active(class, result, true);
            }
        }

        for class in PresentationClass::ALL {
            if let Some(request) = self.queue_mut(class).remove(id) {
                self.notifier.resolve(&request.id, None);
                self.with_metrics(|m| m.record_cancellation());
                self.log_event(
                    LogLevel::Debug,
                    "request_cancelled",
                    [
                        json_kv("id", json!(request.id)),
                        json_kv("class", json!(class.label())),
                    ],
                );
                self.audit_record(
                    SchedulerAuditStage::RequestCancelled,
                    [json_kv("id", json!(request.id))],
                );
                return Ok(());
            }
        }

        Ok(())
    }

    /// Close both active instances and clear both queues, resolving every
    /// pending future with no result.
    pub fn close_all(&mut self) {
        for class in PresentationClass::ALL {
            if let Some(instance) = self.registry.deactivate(class) {
                self.host.dismiss(instance.handle);
                self.notifier.resolve(&instance.request.id, None);
                self.with_metrics(|m| m.record_closure());
                self.log_event(
                    LogLevel::Info,
                    "request_closed",
                    [
                        json_kv("id", json!(instance.request.id)),
                        json_kv("class", json!(class.label())),
                        json_kv("had_result", json!(false)),
                    ],
                );
                self.audit_record(
                    SchedulerAuditStage::RequestClosed,
                    [json_kv("id", json!(instance.request.id))],
                );
            }
        }

        let queued: Vec<PresentationRequest> = self
            .modal_queue
            .drain()
            .into_iter()
            .chain(self.overlay_queue.drain())
            .collect();
        for request in queued {
            self.notifier.resolve(&request.id, None);
            self.with_metrics(|m| m.record_cancellation());
            self.audit_record(
                SchedulerAuditStage::RequestCancelled,
                [json_kv("id", json!(request.id))],
            );
        }

        self.log_event(LogLevel::Info, "scheduler_reset", std::iter::empty());
        self.audit_record(SchedulerAuditStage::SchedulerReset, []);
    }

    pub fn active_id(&self, class: PresentationClass) -> Option<&str> {
        self.registry.active_id(class)
    }

    pub fn active_handle(&self, class: PresentationClass) -> Option<InstanceHandle> {
        self.registry.current(class).map(|instance| instance.handle)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.registry.contains_id(id)
    }

    pub fn is_queued(&self, id: &str) -> bool {
        self.modal_queue.contains(id) || self.overlay_queue.contains(id)
    }

    /// Diagnostic dump of both queues and active instances. Read-only.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            active_modal: self
                .registry
                .current(PresentationClass::Modal)
                .map(ActiveSnapshot::from),
            active_overlay: self
                .registry
                .current(PresentationClass::Overlay)
                .map(ActiveSnapshot::from),
            modal_queue: self.modal_queue.iter().map(QueueEntrySnapshot::from).collect(),
            overlay_queue: self
                .overlay_queue
                .iter()
                .map(QueueEntrySnapshot::from)
                .collect(),
        }
    }

    fn queue(&self, class: PresentationClass) -> &RequestQueue {
        match class {
            PresentationClass::Modal => &self.modal_queue,
            PresentationClass::Overlay => &self.overlay_queue,
        }
    }

    fn queue_mut(&mut self, class: PresentationClass) -> &mut RequestQueue {
        match class {
            PresentationClass::Modal => &mut self.modal_queue,
            PresentationClass::Overlay => &mut self.overlay_queue,
        }
    }

    /// Admission loop for one class. Admits at most one request (the slot is
    /// then occupied); host failures are absorbed so a single bad descriptor
    /// cannot block the rest of the queue.
    fn pump(&mut self, class: PresentationClass) -> Result<()> {
        loop {
            if self.queue(class).is_empty() {
                return Ok(());
            }
            let decision = self.policy.decide(class, self.registry.occupancy());
            let AdmissionDecision::Admit { suspend_modal } = decision else {
                return Ok(());
            };
            let Some(request) = self.queue_mut(class).dequeue_highest() else {
                return Ok(());
            };

            match self.host.present(&request) {
                Ok(handle) => {
                    if suspend_modal {
                        self.suspend_modal();
                    }
                    let id = request.id.clone();
                    let priority = request.priority;
                    self.registry.activate(request, handle)?;
                    self.with_metrics(|m| m.record_admission());
                    self.log_event(
                        LogLevel::Info,
                        "request_admitted",
                        [
                            json_kv("id", json!(id)),
                            json_kv("class", json!(class.label())),
                            json_kv("priority", json!(priority)),
                        ],
                    );
                    self.audit_record(
                        SchedulerAuditStage::RequestAdmitted,
                        [json_kv("id", json!(id))],
                    );
                    return Ok(());
                }
                Err(err) => {
                    self.with_metrics(|m| m.record_host_failure());
                    self.log_event(
                        LogLevel::Warn,
                        "host_present_failed",
                        [
                            json_kv("id", json!(request.id)),
                            json_kv("error", json!(err.to_string())),
                        ],
                    );
                    self.audit_record(
                        SchedulerAuditStage::HostPresentFailed,
                        [json_kv("id", json!(request.id))],
                    );
                    self.notifier.resolve(&request.id, None);
                }
            }
        }
    }

    fn finish_active(
        &mut self,
        class: PresentationClass,
        outcome: PresentationOutcome,
        dismiss_via_host: bool,
    ) -> Result<()> {
        let Some(instance) = self.registry.deactivate(class) else {
            return Ok(());
        };
        if dismiss_via_host {
            self.host.dismiss(instance.handle);
        }
        let had_result = outcome.is_some();
        self.notifier.resolve(&instance.request.id, outcome);
        self.with_metrics(|m| m.record_closure());
        self.log_event(
            LogLevel::Info,
            "request_closed",
            [
                json_kv("id", json!(instance.request.id)),
                json_kv("class", json!(class.label())),
                json_kv("had_result", json!(had_result)),
            ],
        );
        self.audit_record(
            SchedulerAuditStage::RequestClosed,
            [json_kv("id", json!(instance.request.id))],
        );

        self.after_slot_freed()
    }

    /// Synchronous re-evaluation after a slot opened up: admit per policy
    /// order, then restore modal interaction if no overlay remains above it.
    fn after_slot_freed(&mut self) -> Result<()> {
        for class in self.policy.reevaluation_order() {
            self.pump(class)?;
        }
        if !self.registry.is_active(PresentationClass::Overlay) {
            self.resume_modal();
        }
        self.maybe_emit_metrics();
        Ok(())
    }

    fn suspend_modal(&mut self) {
        if let Some((id, handle)) = self
            .registry
            .set_suspended(PresentationClass::Modal, true)
        {
            self.host.set_interactive(handle, false);
            self.with_metrics(|m| m.record_suspension());
            self.log_event(
                LogLevel::Info,
                "modal_suspended",
                [json_kv("id", json!(id))],
            );
            self.audit_record(SchedulerAuditStage::ModalSuspended, [json_kv("id", json!(id))]);
        }
    }

    fn resume_modal(&mut self) {
        if let Some((id, handle)) = self
            .registry
            .set_suspended(PresentationClass::Modal, false)
        {
            self.host.set_interactive(handle, true);
            self.with_metrics(|m| m.record_resumption());
            self.log_event(LogLevel::Info, "modal_resumed", [json_kv("id", json!(id))]);
            self.audit_record(SchedulerAuditStage::ModalResumed, [json_kv("id", json!(id))]);
        }
    }

    fn log_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, LOG_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn with_metrics(&self, f: impl FnOnce(&mut SchedulerMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                f(&mut guard);
            }
        }
    }

    fn audit_record<I>(&self, stage: SchedulerAuditStage, details: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut builder = SchedulerAuditEventBuilder::new(stage);
        for (key, value) in details {
            builder.detail(key, value);
        }
        self.config.audit.record(builder.finish());
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() {
            return;
        }
        if self.config.metrics_interval == Duration::from_millis(0) {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => {
                return;
            }
            _ => {
                self.last_metrics_emit = Some(now);
            }
        }

        let uptime = now.duration_since(self.started_at);
        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(event);
            }
        }
    }
}
