use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied identifier for a presentation request. Unique among all
/// requests that are currently queued or active.
pub type RequestId = String;

/// Presentation class a request belongs to. Each class owns one active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationClass {
    /// Focused, exclusive interaction; never stacks with another modal.
    Modal,
    /// Transient interruption; takes precedence over an active modal.
    Overlay,
}

impl PresentationClass {
    /// Both classes, in overlay-precedence order.
    pub const ALL: [Self; 2] = [Self::Overlay, Self::Modal];

    pub fn label(self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for PresentationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A request to present a single dialog unit.
///
/// The `descriptor` identifies what to present and with what input data. It
/// is owned by the caller and treated as inert: the scheduler never inspects
/// its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationRequest {
    pub id: RequestId,
    pub class: PresentationClass,
    /// Higher value is served first within the class queue. Priorities are
    /// never compared across classes.
    pub priority: i32,
    pub descriptor: Value,
}

impl PresentationRequest {
    pub fn new(
        id: impl Into<RequestId>,
        class: PresentationClass,
        priority: i32,
        descriptor: Value,
    ) -> Self {
        Self {
            id: id.into(),
            class,
            priority,
            descriptor,
        }
    }

    /// Convenience constructor for a modal request without input data.
    pub fn modal(id: impl Into<RequestId>, priority: i32) -> Self {
        Self::new(id, PresentationClass::Modal, priority, Value::Null)
    }

    /// Convenience constructor for an overlay request without input data.
    pub fn overlay(id: impl Into<RequestId>, priority: i32) -> Self {
        Self::new(id, PresentationClass::Overlay, priority, Value::Null)
    }

    pub fn with_descriptor(mut self, descriptor: Value) -> Self {
        self.descriptor = descriptor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_labels() {
        assert_eq!(PresentationClass::Modal.label(), "modal");
        assert_eq!(PresentationClass::Overlay.to_string(), "overlay");
    }

    #[test]
    fn builders_set_class_and_descriptor() {
        let request = PresentationRequest::modal("profile", 3)
            .with_descriptor(json!({"user": "ada"}));
        assert_eq!(request.class, PresentationClass::Modal);
        assert_eq!(request.priority, 3);
        assert_eq!(request.descriptor["user"], "ada");

        let overlay = PresentationRequest::overlay("confirm", 0);
        assert_eq!(overlay.class, PresentationClass::Overlay);
        assert!(overlay.descriptor.is_null());
    }
}
