//! Read-only diagnostic views of scheduler state.

use serde::Serialize;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::logging::{LogEvent, LogFields, LogLevel};
use crate::registry::ActiveInstance;
use crate::request::{PresentationClass, PresentationRequest, RequestId};

/// Summary of one queued request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueueEntrySnapshot {
    pub id: RequestId,
    pub class: PresentationClass,
    pub priority: i32,
}

impl From<&PresentationRequest> for QueueEntrySnapshot {
    fn from(request: &PresentationRequest) -> Self {
        Self {
            id: request.id.clone(),
            class: request.class,
            priority: request.priority,
        }
    }
}

/// Summary of one active instance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub id: RequestId,
    pub class: PresentationClass,
    pub priority: i32,
    pub suspended: bool,
    pub opened_at_ms: u64,
}

impl From<&ActiveInstance> for ActiveSnapshot {
    fn from(instance: &ActiveInstance) -> Self {
        Self {
            id: instance.request.id.clone(),
            class: instance.request.class,
            priority: instance.request.priority,
            suspended: instance.suspended,
            opened_at_ms: instance
                .opened_at
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        }
    }
}

/// Diagnostic dump of both queues and both active slots. Read-only; taking a
/// snapshot never mutates scheduler state.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SchedulerSnapshot {
    pub active_modal: Option<ActiveSnapshot>,
    pub active_overlay: Option<ActiveSnapshot>,
    pub modal_queue: Vec<QueueEntrySnapshot>,
    pub overlay_queue: Vec<QueueEntrySnapshot>,
}

impl SchedulerSnapshot {
    /// True when nothing is active and both queues are empty.
    pub fn is_empty(&self) -> bool {
        self.active_modal.is_none()
            && self.active_overlay.is_none()
            && self.modal_queue.is_empty()
            && self.overlay_queue.is_empty()
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert(
            "active_modal".to_string(),
            json!(self.active_modal.as_ref().map(|a| a.id.clone())),
        );
        map.insert(
            "active_overlay".to_string(),
            json!(self.active_overlay.as_ref().map(|a| a.id.clone())),
        );
        map.insert("modal_queued".to_string(), json!(self.modal_queue.len()));
        map.insert(
            "overlay_queued".to_string(),
            json!(self.overlay_queue.len()),
        );
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Debug,
            target.to_string(),
            "scheduler_snapshot".to_string(),
            self.as_fields(),
        )
    }
}

/// Timestamp helper shared with audit consumers.
pub fn system_time_ms(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_reports_empty() {
        let snapshot = SchedulerSnapshot::default();
        assert!(snapshot.is_empty());
        let fields = snapshot.as_fields();
        assert_eq!(fields["modal_queued"], json!(0));
        assert_eq!(fields["active_modal"], serde_json::Value::Null);
    }

    #[test]
    fn queue_entry_snapshot_copies_request_fields() {
        let request = PresentationRequest::overlay("alert", 4);
        let entry = QueueEntrySnapshot::from(&request);
        assert_eq!(entry.id, "alert");
        assert_eq!(entry.class, PresentationClass::Overlay);
        assert_eq!(entry.priority, 4);
    }
}
