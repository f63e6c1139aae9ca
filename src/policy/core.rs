use crate::registry::Occupancy;
use crate::request::PresentationClass;

/// Verdict for the head of a class queue given current slot occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Move the request into its class slot. `suspend_modal` asks the
    /// scheduler to mark the active modal non-interactive for the duration.
    Admit { suspend_modal: bool },
    /// Leave the request queued.
    Hold,
}

/// Strategy seam deciding when a queued request may become active.
///
/// Policies see only occupancy, never queue contents or priorities; ordering
/// within a class is the queue's concern, and cross-class priorities are
/// deliberately never compared.
pub trait AdmissionPolicy: Send {
    fn decide(&self, class: PresentationClass, occupancy: Occupancy) -> AdmissionDecision;

    /// Order in which classes are re-evaluated after a slot frees up.
    /// Overlay-first by default so a backlog of overlays cannot be starved
    /// by a long-lived modal.
    fn reevaluation_order(&self) -> [PresentationClass; 2] {
        [PresentationClass::Overlay, PresentationClass::Modal]
    }
}

/// The stock policy: overlays model urgent interruptions and always take
/// precedence.
///
/// * Overlay admits whenever the overlay slot is idle; an active modal is
///   suspended in place rather than requeued.
/// * Modal admits only when both slots are idle.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayPrecedencePolicy;

impl AdmissionPolicy for OverlayPrecedencePolicy {
    fn decide(&self, class: PresentationClass, occupancy: Occupancy) -> AdmissionDecision {
        match class {
            PresentationClass::Overlay => {
                if occupancy.overlay_active {
                    AdmissionDecision::Hold
                } else {
                    AdmissionDecision::Admit {
                        suspend_modal: occupancy.modal_active,
                    }
                }
            }
            PresentationClass::Modal => {
                if occupancy.modal_active || occupancy.overlay_active {
                    AdmissionDecision::Hold
                } else {
                    AdmissionDecision::Admit {
                        suspend_modal: false,
                    }
                }
            }
        }
    }
}
