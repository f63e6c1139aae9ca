use std::sync::{Arc, Mutex};

use crate::error::{Result, SchedulerError};
use crate::request::{PresentationRequest, RequestId};

/// Opaque handle minted by a [`PresentationHost`] for a presented unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability the surrounding UI framework exposes to the scheduler.
///
/// The scheduler hands the host an admitted request and expects closure to be
/// reported back later as a discrete event
/// ([`PresentationScheduler::handle_closed`](crate::PresentationScheduler::handle_closed)).
/// Descriptor contents are never inspected on this side of the seam.
pub trait PresentationHost: Send {
    /// Display a unit. A returned error frees the slot as if the unit closed
    /// without a result; the scheduler keeps draining the queue.
    fn present(&mut self, request: &PresentationRequest) -> Result<InstanceHandle>;

    /// Programmatically dismiss a presented unit.
    fn dismiss(&mut self, handle: InstanceHandle);

    /// Toggle user interaction, used to suspend/resume a modal while an
    /// overlay sits above it. Purely advisory visual state.
    fn set_interactive(&mut self, handle: InstanceHandle, interactive: bool);
}

/// Host that presents nothing and accepts everything. Useful as a default in
/// wiring code and benchmarks.
#[derive(Debug, Default)]
pub struct NullHost {
    next_handle: u64,
}

impl NullHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationHost for NullHost {
    fn present(&mut self, _request: &PresentationRequest) -> Result<InstanceHandle> {
        self.next_handle += 1;
        Ok(InstanceHandle::from_raw(self.next_handle))
    }

    fn dismiss(&mut self, _handle: InstanceHandle) {}

    fn set_interactive(&mut self, _handle: InstanceHandle, _interactive: bool) {}
}

/// One observed host interaction, recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Present(RequestId),
    Dismiss(InstanceHandle),
    SetInteractive(InstanceHandle, bool),
}

#[derive(Debug, Default)]
struct RecordingInner {
    next_handle: u64,
    fail_next_present: bool,
    calls: Vec<HostCall>,
}

/// Test double that records every call and can be primed to fail the next
/// `present`. Clones share state, so keep one handle around after boxing the
/// other into a scheduler.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    inner: Arc<Mutex<RecordingInner>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `present` call return an error.
    pub fn fail_next(&self) {
        self.inner.lock().expect("host mutex poisoned").fail_next_present = true;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().expect("host mutex poisoned").calls.clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut self.inner.lock().expect("host mutex poisoned").calls)
    }
}

impl PresentationHost for RecordingHost {
    fn present(&mut self, request: &PresentationRequest) -> Result<InstanceHandle> {
        let mut inner = self.inner.lock().expect("host mutex poisoned");
        if inner.fail_next_present {
            inner.fail_next_present = false;
            return Err(SchedulerError::Host(format!(
                "failed to present `{}`",
                request.id
            )));
        }
        inner.next_handle += 1;
        let handle = InstanceHandle::from_raw(inner.next_handle);
        inner.calls.push(HostCall::Present(request.id.clone()));
        Ok(handle)
    }

    fn dismiss(&mut self, handle: InstanceHandle) {
        self.inner
            .lock()
            .expect("host mutex poisoned")
            .calls
            .push(HostCall::Dismiss(handle));
    }

    fn set_interactive(&mut self, handle: InstanceHandle, interactive: bool) {
        self.inner
            .lock()
            .expect("host mutex poisoned")
            .calls
            .push(HostCall::SetInteractive(handle, interactive));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PresentationRequest;

    #[test]
    fn null_host_mints_distinct_handles() {
        let mut host = NullHost::new();
        let a = host.present(&PresentationRequest::modal("a", 0)).unwrap();
        let b = host.present(&PresentationRequest::modal("b", 0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn recording_host_shares_state_across_clones() {
        let observer = RecordingHost::new();
        let mut host = observer.clone();
        let handle = host.present(&PresentationRequest::overlay("o", 1)).unwrap();
        host.set_interactive(handle, false);
        host.dismiss(handle);
        assert_eq!(
            observer.take_calls(),
            vec![
                HostCall::Present("o".to_string()),
                HostCall::SetInteractive(handle, false),
                HostCall::Dismiss(handle),
            ]
        );
        assert!(observer.calls().is_empty());
    }

    #[test]
    fn fail_next_fails_exactly_once() {
        let mut host = RecordingHost::new();
        host.fail_next();
        assert!(host.present(&PresentationRequest::modal("x", 0)).is_err());
        assert!(host.present(&PresentationRequest::modal("x", 0)).is_ok());
    }
}
