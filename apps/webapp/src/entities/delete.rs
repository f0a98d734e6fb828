use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::entities::{EntityApi, InFlightGuard};
use crate::errors::ClientError;
use crate::models::Entity;

/// How a delete dialog was closed. `Deleted` tells the caller to refresh its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogResult {
    Deleted,
    Cancelled,
}

/// Confirmation dialog for deleting one entity.
pub struct DeleteDialog<T: Entity> {
    api: Arc<dyn EntityApi<T>>,
    entity: T,
    deleting: AtomicBool,
}

impl<T: Entity> DeleteDialog<T> {
    pub fn new(api: Arc<dyn EntityApi<T>>, entity: T) -> Self {
        Self {
            api,
            entity,
            deleting: AtomicBool::new(false),
        }
    }

    /// The entity the dialog asks about.
    pub fn entity(&self) -> &T {
        &self.entity
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::Acquire)
    }

    pub fn cancel(&self) -> DialogResult {
        DialogResult::Cancelled
    }

    /// Issues the delete and closes with `Deleted` once the server answers.
    /// On error the dialog stays open and the error is returned as-is.
    pub async fn confirm_delete(&self, id: i64) -> Result<DialogResult, ClientError> {
        let Some(_guard) = InFlightGuard::try_acquire(&self.deleting) else {
            warn!("Delete of {} {id} ignored: already in flight", T::ROUTE);
            return Err(ClientError::InFlight);
        };

        self.api.delete(id).await?;
        info!("{} {id} deleted", T::ROUTE);
        Ok(DialogResult::Deleted)
    }
}
