//! Entity service: typed CRUD calls against `api/{entity}`.
//!
//! Errors are passed through from the REST client untouched. No retries.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use crate::errors::ClientError;
use crate::models::Entity;
use crate::rest_client::{EntityResponse, RequestOptions, RestClient, MERGE_PATCH_JSON};

/// The entity API seam. Controllers hold an `Arc<dyn EntityApi<T>>` so tests
/// can swap the HTTP-backed service for a recording double.
#[async_trait]
pub trait EntityApi<T: Entity>: Send + Sync {
    /// POST `api/{entity}`. The response body carries the server-assigned id.
    async fn create(&self, entity: &T) -> Result<EntityResponse<T>, ClientError>;

    /// PUT `api/{entity}/{id}`, full replacement. Fails with
    /// `MissingIdentifier` when the entity has no id.
    async fn update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError>;

    /// PATCH `api/{entity}/{id}` with only the fields that are set.
    async fn partial_update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError>;

    /// GET `api/{entity}/{id}`. A `null` body means not found.
    async fn find(&self, id: i64) -> Result<EntityResponse<T>, ClientError>;

    /// GET `api/{entity}` with the options flattened into query parameters.
    async fn query(&self, options: &RequestOptions)
        -> Result<EntityResponse<Vec<T>>, ClientError>;

    /// GET `api/{entity}/count` with the criteria of `options`. An empty body
    /// is an error, not zero.
    async fn count(&self, options: &RequestOptions) -> Result<u64, ClientError>;

    /// DELETE `api/{entity}/{id}`. Status only.
    async fn delete(&self, id: i64) -> Result<EntityResponse<()>, ClientError>;
}

/// HTTP-backed entity service. Holds nothing but the shared client, so one
/// instance per entity type is built at startup and shared.
pub struct EntityService<T> {
    client: RestClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> EntityService<T> {
    pub fn new(client: RestClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}", T::RESOURCE_PATH, id)
    }
}

#[async_trait]
impl<T: Entity> EntityApi<T> for EntityService<T> {
    async fn create(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        let response: EntityResponse<T> = self
            .client
            .send(Method::POST, T::RESOURCE_PATH, entity, None)
            .await?;
        info!(
            "Created {} id={:?}",
            T::ROUTE,
            response.body.as_ref().and_then(Entity::id)
        );
        Ok(response)
    }

    async fn update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        let id = entity.id().ok_or(ClientError::MissingIdentifier)?;
        let response = self
            .client
            .send(Method::PUT, &Self::item_path(id), entity, None)
            .await?;
        info!("Updated {} id={id}", T::ROUTE);
        Ok(response)
    }

    async fn partial_update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        let id = entity.id().ok_or(ClientError::MissingIdentifier)?;
        let body = merge_patch_body(entity)?;
        let response = self
            .client
            .send(
                Method::PATCH,
                &Self::item_path(id),
                &body,
                Some(MERGE_PATCH_JSON),
            )
            .await?;
        info!("Partially updated {} id={id}", T::ROUTE);
        Ok(response)
    }

    async fn find(&self, id: i64) -> Result<EntityResponse<T>, ClientError> {
        self.client.get(&Self::item_path(id), &[]).await
    }

    async fn query(
        &self,
        options: &RequestOptions,
    ) -> Result<EntityResponse<Vec<T>>, ClientError> {
        self.client
            .get(T::RESOURCE_PATH, &options.to_query_pairs())
            .await
    }

    async fn count(&self, options: &RequestOptions) -> Result<u64, ClientError> {
        let path = format!("{}/count", T::RESOURCE_PATH);
        let response: EntityResponse<u64> =
            self.client.get(&path, &options.criteria_pairs()).await?;
        response.body.ok_or_else(|| ClientError::Status {
            status: response.status,
            message: format!("{path} answered without a count"),
        })
    }

    async fn delete(&self, id: i64) -> Result<EntityResponse<()>, ClientError> {
        let response = self.client.delete(&Self::item_path(id)).await?;
        info!("Deleted {} id={id}", T::ROUTE);
        Ok(response)
    }
}

/// Body for a partial update: the entity with every unset (`null`) field removed.
fn merge_patch_body<T: Entity>(entity: &T) -> Result<Value, ClientError> {
    let mut body = serde_json::to_value(entity)?;
    if let Value::Object(fields) = &mut body {
        fields.retain(|_, v| !v.is_null());
    }
    Ok(body)
}
