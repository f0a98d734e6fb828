use std::sync::Arc;

use tracing::{debug, warn};

use crate::entities::EntityApi;
use crate::errors::ClientError;
use crate::models::Entity;
use crate::routes::{Navigator, RouteSnapshot, NOT_FOUND_ROUTE};

/// Pre-navigation hook: supplies the entity an edit or view screen renders.
pub struct EntityResolver<T: Entity> {
    api: Arc<dyn EntityApi<T>>,
    navigator: Arc<dyn Navigator>,
}

impl<T: Entity> EntityResolver<T> {
    pub fn new(api: Arc<dyn EntityApi<T>>, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator }
    }

    /// - no `id` on the route: a fresh empty entity, without a request;
    /// - `id` found: the entity from the server;
    /// - `id` answered with an empty body: navigates to `404` and yields `None`.
    ///
    /// Transport and server errors propagate unchanged.
    pub async fn resolve(&self, route: &RouteSnapshot) -> Result<Option<T>, ClientError> {
        let Some(id) = route.id else {
            debug!("No id on route '{}', resolving new {}", route.path, T::ROUTE);
            return Ok(Some(T::default()));
        };

        let response = self.api.find(id).await?;
        match response.body {
            Some(entity) => Ok(Some(entity)),
            None => {
                warn!("{} {id} not found, redirecting to {NOT_FOUND_ROUTE}", T::ROUTE);
                self.navigator.navigate(NOT_FOUND_ROUTE);
                Ok(None)
            }
        }
    }
}
