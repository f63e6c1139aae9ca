use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_channel::oneshot;
use serde_json::Value;

use crate::request::RequestId;

/// Value delivered back to the caller when a unit closes. `None` means the
/// unit was dismissed (or cancelled, or failed to present) without a result.
pub type PresentationOutcome = Option<Value>;

/// Single-resolution future handed back from `open`.
///
/// Resolves exactly once for every request that was ever opened: with the
/// closure result, or with `None` on dismissal, cancellation, host failure,
/// or scheduler teardown. Dropping the scheduler drops the sending half,
/// which this future also reads as "closed without result", so a caller can
/// never be left hanging.
#[derive(Debug)]
pub struct ResultFuture {
    receiver: oneshot::Receiver<PresentationOutcome>,
}

impl ResultFuture {
    /// Non-blocking probe for cooperative single-threaded callers and tests.
    ///
    /// Returns `None` while unresolved, `Some(outcome)` once resolved. The
    /// outcome is consumed; probe again only after a `Some`.
    pub fn try_resolve(&mut self) -> Option<PresentationOutcome> {
        match self.receiver.try_recv() {
            Ok(Some(outcome)) => Some(outcome),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(None),
        }
    }
}

impl Future for ResultFuture {
    type Output = PresentationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Tracks the pending futures of every queued-or-active request.
///
/// Resolution is event-driven: the scheduler resolves at admission-closure
/// time or at cancellation time. There is no polling loop that could miss a
/// request cancelled before it was ever admitted.
#[derive(Debug, Default)]
pub struct LifecycleNotifier {
    pending: HashMap<RequestId, oneshot::Sender<PresentationOutcome>>,
}

impl LifecycleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the future for a freshly opened request. The id must not
    /// already be pending; the scheduler checks this before enqueueing.
    pub fn register(&mut self, id: &RequestId) -> ResultFuture {
        let (sender, receiver) = oneshot::channel();
        self.pending.insert(id.clone(), sender);
        ResultFuture { receiver }
    }

    /// Resolve the future for `id`. Returns `false` when nothing was pending
    /// (already resolved or never registered), which keeps double-close
    /// idempotent.
    pub fn resolve(&mut self, id: &str, outcome: PresentationOutcome) -> bool {
        match self.pending.remove(id) {
            Some(sender) => {
                // The caller may have dropped its future; that is fine.
                let _ = sender.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Whether `id` still awaits a resolution, i.e. is queued or active.
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_with_value_once() {
        let mut notifier = LifecycleNotifier::new();
        let id = "req".to_string();
        let mut future = notifier.register(&id);

        assert!(future.try_resolve().is_none());
        assert!(notifier.resolve("req", Some(json!({"saved": true}))));
        assert_eq!(
            future.try_resolve(),
            Some(Some(json!({"saved": true})))
        );
        // Second resolve finds nothing pending.
        assert!(!notifier.resolve("req", None));
    }

    #[test]
    fn resolves_with_none_on_dismissal() {
        let mut notifier = LifecycleNotifier::new();
        let id = "req".to_string();
        let mut future = notifier.register(&id);
        notifier.resolve("req", None);
        assert_eq!(future.try_resolve(), Some(None));
    }

    #[test]
    fn dropping_the_notifier_resolves_none() {
        let mut notifier = LifecycleNotifier::new();
        let id = "orphan".to_string();
        let mut future = notifier.register(&id);
        drop(notifier);
        assert_eq!(future.try_resolve(), Some(None));
    }

    #[test]
    fn pending_tracks_queued_or_active_set() {
        let mut notifier = LifecycleNotifier::new();
        let a = "a".to_string();
        let b = "b".to_string();
        let _fa = notifier.register(&a);
        let _fb = notifier.register(&b);
        assert_eq!(notifier.pending_len(), 2);
        assert!(notifier.is_pending("a"));
        notifier.resolve("a", None);
        assert!(!notifier.is_pending("a"));
        assert!(notifier.is_pending("b"));
    }
}
