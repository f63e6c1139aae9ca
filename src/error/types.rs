use thiserror::Error;

use crate::request::RequestId;

/// Unified result type for the scheduler crate.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors surfaced by the presentation scheduler.
///
/// Unknown ids on `close` are deliberately *not* represented here; a close on
/// an untracked id is an idempotent no-op so double-close races stay silent.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `open` was called with an id that is already queued or active.
    #[error("request `{0}` is already queued or active")]
    DuplicateId(RequestId),
    /// Internal contract breach, e.g. activating an occupied slot. Never
    /// observable from correct use of the public operations.
    #[error("scheduler invariant violated: {0}")]
    InvariantViolation(String),
    /// The presentation host refused or failed to present a unit.
    #[error("presentation host failure: {0}")]
    Host(String),
}
