use crate::request::PresentationRequest;

/// Ordered sequence of pending requests for one presentation class.
///
/// Entries are kept priority-descending with arrival-stable ties: a new
/// request with an equal priority lands *after* existing equal-priority
/// entries, so two requests never swap places retroactively.
#[derive(Debug, Default)]
pub struct RequestQueue {
    entries: Vec<PresentationRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert maintaining priority-descending, arrival-stable order.
    pub fn enqueue(&mut self, request: PresentationRequest) {
        let at = self
            .entries
            .iter()
            .position(|entry| entry.priority < request.priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, request);
    }

    /// Remove and return the front element, or `None` when empty.
    pub fn dequeue_highest(&mut self) -> Option<PresentationRequest> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Delete a not-yet-active entry by id. Returns the removed request, or
    /// `None` if the id is absent.
    pub fn remove(&mut self, id: &str) -> Option<PresentationRequest> {
        let at = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(at))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresentationRequest> {
        self.entries.iter()
    }

    /// Empty the queue, yielding the removed entries in queue order.
    pub fn drain(&mut self) -> Vec<PresentationRequest> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PresentationRequest;

    fn modal(id: &str, priority: i32) -> PresentationRequest {
        PresentationRequest::modal(id, priority)
    }

    fn ids(queue: &RequestQueue) -> Vec<&str> {
        queue.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn orders_by_priority_descending() {
        let mut queue = RequestQueue::new();
        queue.enqueue(modal("low", 1));
        queue.enqueue(modal("high", 9));
        queue.enqueue(modal("mid", 5));
        assert_eq!(ids(&queue), vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_priority_preserves_arrival_order() {
        let mut queue = RequestQueue::new();
        queue.enqueue(modal("first", 2));
        queue.enqueue(modal("second", 2));
        queue.enqueue(modal("third", 2));
        queue.enqueue(modal("front", 7));
        assert_eq!(ids(&queue), vec!["front", "first", "second", "third"]);
    }

    #[test]
    fn dequeue_returns_front_then_empty() {
        let mut queue = RequestQueue::new();
        queue.enqueue(modal("only", 0));
        assert_eq!(queue.dequeue_highest().map(|r| r.id), Some("only".into()));
        assert!(queue.dequeue_highest().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_by_id_is_noop_when_absent() {
        let mut queue = RequestQueue::new();
        queue.enqueue(modal("keep", 1));
        assert!(queue.remove("missing").is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.remove("keep").is_some());
        assert!(!queue.contains("keep"));
    }

    #[test]
    fn drain_empties_in_queue_order() {
        let mut queue = RequestQueue::new();
        queue.enqueue(modal("a", 1));
        queue.enqueue(modal("b", 3));
        let drained: Vec<_> = queue.drain().into_iter().map(|r| r.id).collect();
        assert_eq!(drained, vec!["b".to_string(), "a".to_string()]);
        assert!(queue.is_empty());
    }
}
