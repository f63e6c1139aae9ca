//! Small observable state store for a single backend-managed entity.
//!
//! Companion to the scheduler for screens that edit one record at a time:
//! load it, track edits against the persisted baseline, save or run a
//! backend process on it. Subscribers are notified only when the state
//! actually changed, so wiring a redraw to [`EntityStore::subscribe`] is
//! cheap even for chatty callers.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure reported by an [`EntityBackend`] operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Persistence seam for one entity type.
pub trait EntityBackend<T> {
    fn load(&mut self) -> Result<T, BackendError>;
    fn save(&mut self, entity: &T) -> Result<T, BackendError>;
    fn process(&mut self, entity: &T) -> Result<T, BackendError>;
}

/// Observable state for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityState<T> {
    pub entity: Option<T>,
    pub loading: bool,
    pub processing: bool,
    /// True when the working copy differs from the last persisted value.
    pub saveable: bool,
    pub error: Option<String>,
}

impl<T> EntityState<T> {
    pub fn initial() -> Self {
        Self {
            entity: None,
            loading: false,
            processing: false,
            saveable: false,
            error: None,
        }
    }
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

type Listener<T> = Box<dyn FnMut(&EntityState<T>)>;

/// Store around an [`EntityBackend`], with change-deduplicated
/// notifications.
pub struct EntityStore<T, B> {
    backend: B,
    state: EntityState<T>,
    /// Serialized form of the last loaded/saved entity, used for the
    /// saveable comparison.
    baseline: Option<Value>,
    listeners: Vec<Listener<T>>,
}

impl<T, B> EntityStore<T, B>
where
    T: Clone + PartialEq + Serialize,
    B: EntityBackend<T>,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: EntityState::initial(),
            baseline: None,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &EntityState<T> {
        &self.state
    }

    /// Register a callback invoked after every observable state change. The
    /// callback fires immediately with the current state.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&EntityState<T>) + 'static) {
        listener(&self.state);
        self.listeners.push(Box::new(listener));
    }

    /// Fetch the entity from the backend, replacing the working copy and the
    /// saveable baseline.
    pub fn load_entity(&mut self) -> Result<(), BackendError> {
        self.mutate(|state| {
            state.loading = true;
            state.error = None;
        });

        let loaded = self.backend.load();
        match loaded {
            Ok(entity) => {
                self.baseline = serialize_entity(&entity);
                self.mutate(|state| {
                    state.entity = Some(entity);
                    state.loading = false;
                    state.saveable = false;
                });
                Ok(())
            }
            Err(err) => {
                self.mutate(|state| {
                    state.loading = false;
                    state.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    /// Persist the working copy. The backend's returned entity becomes both
    /// the working copy and the new baseline.
    pub fn save_entity(&mut self) -> Result<(), BackendError> {
        let Some(entity) = self.state.entity.clone() else {
            return Ok(());
        };
        self.mutate(|state| {
            state.processing = true;
            state.error = None;
        });

        match self.backend.save(&entity) {
            Ok(saved) => {
                self.baseline = serialize_entity(&saved);
                self.mutate(|state| {
                    state.entity = Some(saved);
                    state.processing = false;
                    state.saveable = false;
                });
                Ok(())
            }
            Err(err) => {
                self.mutate(|state| {
                    state.processing = false;
                    state.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    /// Run the backend's processing step on the working copy. The result
    /// replaces the working copy but does not move the baseline, so the
    /// outcome counts as an unsaved edit.
    pub fn process_entity(&mut self) -> Result<(), BackendError> {
        let Some(entity) = self.state.entity.clone() else {
            return Ok(());
        };
        self.mutate(|state| {
            state.processing = true;
            state.error = None;
        });

        match self.backend.process(&entity) {
            Ok(processed) => {
                let saveable = self.differs_from_baseline(&processed);
                self.mutate(|state| {
                    state.entity = Some(processed);
                    state.processing = false;
                    state.saveable = saveable;
                });
                Ok(())
            }
            Err(err) => {
                self.mutate(|state| {
                    state.processing = false;
                    state.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    /// Replace the working copy with an edited value and recompute whether it
    /// differs from the persisted baseline.
    pub fn update_entity(&mut self, entity: T) {
        let saveable = self.differs_from_baseline(&entity);
        self.mutate(|state| {
            state.entity = Some(entity);
            state.saveable = saveable;
        });
    }

    /// Recompute the saveable flag against the baseline without changing the
    /// working copy.
    pub fn update_saveable(&mut self) {
        let saveable = match self.state.entity.as_ref() {
            Some(entity) => self.differs_from_baseline(entity),
            None => false,
        };
        self.mutate(|state| {
            state.saveable = saveable;
        });
    }

    fn differs_from_baseline(&self, entity: &T) -> bool {
        serialize_entity(entity) != self.baseline
    }

    /// Apply a state edit and notify listeners only if something changed.
    fn mutate(&mut self, edit: impl FnOnce(&mut EntityState<T>)) {
        let before = self.state.clone();
        edit(&mut self.state);
        if self.state != before {
            for listener in &mut self.listeners {
                listener(&self.state);
            }
        }
    }
}

fn serialize_entity<T: Serialize>(entity: &T) -> Option<Value> {
    serde_json::to_value(entity).ok()
}
