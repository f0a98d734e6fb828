use std::sync::Arc;

use tracing::debug;

use crate::entities::{DialogResult, EntityApi};
use crate::errors::ClientError;
use crate::models::Entity;
use crate::rest_client::RequestOptions;

/// List screen controller: one page of entities plus the server's total count.
pub struct ListController<T: Entity> {
    api: Arc<dyn EntityApi<T>>,
    options: RequestOptions,
    items: Vec<T>,
    total_items: Option<u64>,
}

impl<T: Entity> ListController<T> {
    pub fn new(api: Arc<dyn EntityApi<T>>, options: RequestOptions) -> Self {
        Self {
            api,
            options,
            items: Vec::new(),
            total_items: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    pub fn track_id(item: &T) -> Option<i64> {
        item.id()
    }

    /// Fetches the configured page. On error the previous items are kept.
    pub async fn load(&mut self) -> Result<&[T], ClientError> {
        let response = self.api.query(&self.options).await?;
        self.items = response.body.unwrap_or_default();
        self.total_items = response.total_count;
        debug!(
            "Loaded {} {} (total {:?})",
            self.items.len(),
            T::ROUTE,
            self.total_items
        );
        Ok(&self.items)
    }

    /// Reacts to a closed delete dialog: reloads after a delete, otherwise
    /// leaves the list alone. Returns whether a reload happened.
    pub async fn on_dialog_closed(&mut self, result: DialogResult) -> Result<bool, ClientError> {
        match result {
            DialogResult::Deleted => {
                self.load().await?;
                Ok(true)
            }
            DialogResult::Cancelled => Ok(false),
        }
    }
}
