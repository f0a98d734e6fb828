//! Create/edit screen controller.
//!
//! Holds the form value for one entity, validates it, and dispatches a save to
//! `create` or `update` depending on whether the form carries an id. Only one
//! save may be in flight per controller; a second `save()` is rejected with
//! `ClientError::InFlight` without issuing a request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::entities::{EntityApi, InFlightGuard};
use crate::errors::ClientError;
use crate::models::{Entity, FieldViolation, Form, FormError, Validate};
use crate::routes::Navigator;

/// Result of one `save()`.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    /// The server accepted the entity; carries the saved state it returned.
    Saved(T),
    /// The form failed validation and was not submitted.
    Invalid(Vec<FieldViolation>),
    Failed(ClientError),
}

impl<T> SaveOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

pub struct UpdateController<T: Entity> {
    api: Arc<dyn EntityApi<T>>,
    navigator: Arc<dyn Navigator>,
    form: Mutex<T>,
    saving: AtomicBool,
}

impl<T: Entity + Form + Validate> UpdateController<T> {
    pub fn new(api: Arc<dyn EntityApi<T>>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            navigator,
            form: Mutex::new(T::default()),
            saving: AtomicBool::new(false),
        }
    }

    /// Populates the form from the entity the resolver supplied.
    pub fn init(&self, resolved: T) {
        *self.form() = resolved;
    }

    pub fn form_value(&self) -> T {
        self.form().clone()
    }

    pub fn set_field(&self, field: &str, value: Option<&str>) -> Result<(), FormError> {
        self.form().set_field(field, value)
    }

    pub fn validate(&self) -> Vec<FieldViolation> {
        self.form().validate()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn previous_state(&self) {
        self.navigator.back();
    }

    pub async fn save(&self) -> SaveOutcome<T> {
        let violations = self.validate();
        if !violations.is_empty() {
            return SaveOutcome::Invalid(violations);
        }

        let Some(guard) = InFlightGuard::try_acquire(&self.saving) else {
            warn!("Save of {} ignored: another save is in flight", T::ROUTE);
            return SaveOutcome::Failed(ClientError::InFlight);
        };

        let entity = self.form_value();
        let result = match entity.id() {
            Some(_) => self.api.update(&entity).await,
            None => self.api.create(&entity).await,
        };
        drop(guard);

        match result {
            Ok(response) => {
                info!("Saved {} id={:?}", T::ROUTE, response.body.as_ref().and_then(Entity::id));
                self.previous_state();
                SaveOutcome::Saved(response.body.unwrap_or(entity))
            }
            Err(e) => {
                warn!("Save of {} failed: {e}", T::ROUTE);
                SaveOutcome::Failed(e)
            }
        }
    }

    fn form(&self) -> MutexGuard<'_, T> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
