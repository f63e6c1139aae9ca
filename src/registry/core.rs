use std::time::SystemTime;

use crate::error::{Result, SchedulerError};
use crate::host::InstanceHandle;
use crate::request::{PresentationClass, PresentationRequest, RequestId};

/// A request that currently occupies its class slot.
#[derive(Debug, Clone)]
pub struct ActiveInstance {
    /// Ownership of the request transfers here for the duration of activity.
    pub request: PresentationRequest,
    /// Handle minted by the presentation host.
    pub handle: InstanceHandle,
    /// Diagnostic only; never used for scheduling decisions.
    pub opened_at: SystemTime,
    /// Advisory flag set while a cross-class rule blocks interaction.
    pub suspended: bool,
}

/// Cheap copyable view of slot occupancy handed to admission policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub modal_active: bool,
    pub overlay_active: bool,
}

impl Occupancy {
    pub fn is_active(self, class: PresentationClass) -> bool {
        match class {
            PresentationClass::Modal => self.modal_active,
            PresentationClass::Overlay => self.overlay_active,
        }
    }
}

/// Holds zero or one [`ActiveInstance`] per presentation class.
///
/// The admission step is the only caller of [`activate`](Self::activate);
/// activating an occupied slot is a programming-contract violation and
/// surfaces as [`SchedulerError::InvariantViolation`].
#[derive(Debug, Default)]
pub struct ActiveRegistry {
    modal: Option<ActiveInstance>,
    overlay: Option<ActiveInstance>,
}

impl ActiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, class: PresentationClass) -> &Option<ActiveInstance> {
        match class {
            PresentationClass::Modal => &self.modal,
            PresentationClass::Overlay => &self.overlay,
        }
    }

    fn slot_mut(&mut self, class: PresentationClass) -> &mut Option<ActiveInstance> {
        match class {
            PresentationClass::Modal => &mut self.modal,
            PresentationClass::Overlay => &mut self.overlay,
        }
    }

    /// Occupy the slot for the request's class.
    pub fn activate(
        &mut self,
        request: PresentationRequest,
        handle: InstanceHandle,
    ) -> Result<&ActiveInstance> {
        let class = request.class;
        if self.slot(class).is_some() {
            return Err(SchedulerError::InvariantViolation(format!(
                "activate called while {class} slot is occupied"
            )));
        }
        let instance = ActiveInstance {
            request,
            handle,
            opened_at: SystemTime::now(),
            suspended: false,
        };
        Ok(self.slot_mut(class).insert(instance))
    }

    /// Clear the slot, returning the evicted instance if one was active.
    pub fn deactivate(&mut self, class: PresentationClass) -> Option<ActiveInstance> {
        self.slot_mut(class).take()
    }

    pub fn is_active(&self, class: PresentationClass) -> bool {
        self.slot(class).is_some()
    }

    pub fn current(&self, class: PresentationClass) -> Option<&ActiveInstance> {
        self.slot(class).as_ref()
    }

    pub fn active_id(&self, class: PresentationClass) -> Option<&str> {
        self.slot(class)
            .as_ref()
            .map(|instance| instance.request.id.as_str())
    }

    /// Which class, if any, a host handle belongs to.
    pub fn class_of_handle(&self, handle: InstanceHandle) -> Option<PresentationClass> {
        PresentationClass::ALL
            .into_iter()
            .find(|&class| self.slot(class).as_ref().map(|i| i.handle) == Some(handle))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        PresentationClass::ALL
            .into_iter()
            .any(|class| self.active_id(class) == Some(id))
    }

    /// Flip the advisory suspension flag. Returns the affected instance's id
    /// and handle only when the flag actually changed, so callers can skip
    /// redundant host calls.
    pub fn set_suspended(
        &mut self,
        class: PresentationClass,
        suspended: bool,
    ) -> Option<(RequestId, InstanceHandle)> {
        let instance = self.slot_mut(class).as_mut()?;
        if instance.suspended == suspended {
            return None;
        }
        instance.suspended = suspended;
        Some((instance.request.id.clone(), instance.handle))
    }

    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            modal_active: self.modal.is_some(),
            overlay_active: self.overlay.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::PresentationRequest;

    fn handle(raw: u64) -> InstanceHandle {
        InstanceHandle::from_raw(raw)
    }

    #[test]
    fn activate_then_deactivate_round_trip() {
        let mut registry = ActiveRegistry::new();
        registry
            .activate(PresentationRequest::modal("m", 1), handle(1))
            .unwrap();
        assert!(registry.is_active(PresentationClass::Modal));
        assert_eq!(registry.active_id(PresentationClass::Modal), Some("m"));

        let evicted = registry.deactivate(PresentationClass::Modal).unwrap();
        assert_eq!(evicted.request.id, "m");
        assert!(!registry.is_active(PresentationClass::Modal));
    }

    #[test]
    fn double_activate_violates_contract() {
        let mut registry = ActiveRegistry::new();
        registry
            .activate(PresentationRequest::modal("first", 1), handle(1))
            .unwrap();
        let err = registry
            .activate(PresentationRequest::modal("second", 1), handle(2))
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvariantViolation(_)));
        // Occupant untouched.
        assert_eq!(registry.active_id(PresentationClass::Modal), Some("first"));
    }

    #[test]
    fn both_classes_may_be_active_at_once() {
        let mut registry = ActiveRegistry::new();
        registry
            .activate(PresentationRequest::modal("m", 1), handle(1))
            .unwrap();
        registry
            .activate(PresentationRequest::overlay("o", 1), handle(2))
            .unwrap();
        let occupancy = registry.occupancy();
        assert!(occupancy.modal_active && occupancy.overlay_active);
    }

    #[test]
    fn set_suspended_reports_changes_only() {
        let mut registry = ActiveRegistry::new();
        registry
            .activate(PresentationRequest::modal("m", 1), handle(7))
            .unwrap();

        let changed = registry.set_suspended(PresentationClass::Modal, true);
        assert_eq!(changed, Some(("m".to_string(), handle(7))));
        // Second call with the same value is a no-op.
        assert!(registry.set_suspended(PresentationClass::Modal, true).is_none());
        assert!(registry.current(PresentationClass::Modal).unwrap().suspended);

        let resumed = registry.set_suspended(PresentationClass::Modal, false);
        assert_eq!(resumed, Some(("m".to_string(), handle(7))));
    }

    #[test]
    fn class_of_handle_finds_owner() {
        let mut registry = ActiveRegistry::new();
        registry
            .activate(PresentationRequest::overlay("o", 1), handle(3))
            .unwrap();
        assert_eq!(
            registry.class_of_handle(handle(3)),
            Some(PresentationClass::Overlay)
        );
        assert!(registry.class_of_handle(handle(9)).is_none());
    }
}
