use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Saturating counters for scheduler activity. Shared behind
/// `Arc<Mutex<..>>` when periodic snapshots are enabled in
/// [`SchedulerConfig`](crate::SchedulerConfig).
#[derive(Debug, Default, Clone)]
pub struct SchedulerMetrics {
    opens: u64,
    admissions: u64,
    closures: u64,
    cancellations: u64,
    suspensions: u64,
    resumptions: u64,
    host_failures: u64,
}

impl SchedulerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_open(&mut self) {
        self.opens = self.opens.saturating_add(1);
    }

    pub fn record_admission(&mut self) {
        self.admissions = self.admissions.saturating_add(1);
    }

    pub fn record_closure(&mut self) {
        self.closures = self.closures.saturating_add(1);
    }

    pub fn record_cancellation(&mut self) {
        self.cancellations = self.cancellations.saturating_add(1);
    }

    pub fn record_suspension(&mut self) {
        self.suspensions = self.suspensions.saturating_add(1);
    }

    pub fn record_resumption(&mut self) {
        self.resumptions = self.resumptions.saturating_add(1);
    }

    pub fn record_host_failure(&mut self) {
        self.host_failures = self.host_failures.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            opens: self.opens,
            admissions: self.admissions,
            closures: self.closures,
            cancellations: self.cancellations,
            suspensions: self.suspensions,
            resumptions: self.resumptions,
            host_failures: self.host_failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub opens: u64,
    pub admissions: u64,
    pub closures: u64,
    pub cancellations: u64,
    pub suspensions: u64,
    pub resumptions: u64,
    pub host_failures: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("opens".to_string(), json!(self.opens));
        map.insert("admissions".to_string(), json!(self.admissions));
        map.insert("closures".to_string(), json!(self.closures));
        map.insert("cancellations".to_string(), json!(self.cancellations));
        map.insert("suspensions".to_string(), json!(self.suspensions));
        map.insert("resumptions".to_string(), json!(self.resumptions));
        map.insert("host_failures".to_string(), json!(self.host_failures));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "scheduler_metrics".to_string(),
            self.as_fields(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_into_snapshot() {
        let mut metrics = SchedulerMetrics::new();
        metrics.record_open();
        metrics.record_open();
        metrics.record_admission();
        metrics.record_closure();
        metrics.record_cancellation();
        metrics.record_suspension();
        metrics.record_resumption();
        metrics.record_host_failure();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.opens, 2);
        assert_eq!(snapshot.admissions, 1);
        assert_eq!(snapshot.closures, 1);
        assert_eq!(snapshot.cancellations, 1);
        assert_eq!(snapshot.suspensions, 1);
        assert_eq!(snapshot.resumptions, 1);
        assert_eq!(snapshot.host_failures, 1);
    }

    #[test]
    fn snapshot_log_event_carries_all_fields() {
        let metrics = SchedulerMetrics::new();
        let event = metrics
            .snapshot(Duration::ZERO)
            .to_log_event("foyer::scheduler.metrics");
        assert_eq!(event.message, "scheduler_metrics");
        assert_eq!(event.fields.len(), 8);
    }
}
