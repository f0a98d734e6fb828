//! Test doubles: an in-process axum backend speaking the entity REST API, a
//! recording `EntityApi`, and a recording `Navigator`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::entities::EntityApi;
use crate::errors::ClientError;
use crate::models::Entity;
use crate::rest_client::{EntityResponse, RequestOptions, RestClient};
use crate::routes::Navigator;

// ────────────────────────────────────────────────────────────────────────────
// Mock REST backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct BackendState {
    resources: BTreeMap<String, BTreeMap<i64, Value>>,
    requests: Vec<RecordedRequest>,
    next_id: i64,
    fail_with: Option<u16>,
    blank_count: bool,
}

type Shared = Arc<Mutex<BackendState>>;

/// Entity REST API served from memory on an ephemeral local port.
///
/// Unknown ids answer `200` with a `null` body.
pub struct MockBackend {
    base_url: String,
    state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            next_id: 1000,
            ..BackendState::default()
        }));
        let app = Router::new()
            .route("/api/:resource", any(collection_handler))
            .route("/api/:resource/:id", any(item_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}/"),
            state,
        }
    }

    pub fn client(&self) -> RestClient {
        RestClient::new(self.base_url.clone(), std::time::Duration::from_secs(5))
    }

    pub fn insert(&self, resource: &str, entity: Value) {
        let id = entity["id"].as_i64().expect("seeded entity needs an id");
        self.lock()
            .resources
            .entry(resource.to_string())
            .or_default()
            .insert(id, entity);
    }

    pub fn stored(&self, resource: &str) -> Vec<Value> {
        self.lock()
            .resources
            .get(resource)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Every later request answers with this status.
    pub fn fail_with(&self, status: u16) {
        self.lock().fail_with = Some(status);
    }

    /// The count endpoint answers `200` with an empty body.
    pub fn blank_count_body(&self) {
        self.lock().blank_count = true;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().expect("mock backend state")
    }
}

fn record(
    state: &mut BackendState,
    method: &Method,
    path: String,
    query: Option<String>,
    headers: &HeaderMap,
    body: &Bytes,
) -> Value {
    let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path,
        query,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });
    body
}

fn failure(status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({"title": "Mock failure", "detail": format!("forced {}", status.as_u16())})),
    )
        .into_response()
}

async fn collection_handler(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock().expect("mock backend state");
    let body = record(
        &mut state,
        &method,
        format!("/api/{resource}"),
        query,
        &headers,
        &body,
    );
    if let Some(status) = state.fail_with {
        return failure(status);
    }

    match method {
        Method::GET => {
            let items: Vec<Value> = state
                .resources
                .get(&resource)
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default();
            let total = items.len().to_string();
            ([("x-total-count", total)], Json(items)).into_response()
        }
        Method::POST => {
            state.next_id += 1;
            let id = state.next_id;
            let mut created = body;
            created["id"] = json!(id);
            state
                .resources
                .entry(resource.clone())
                .or_default()
                .insert(id, created.clone());
            (
                StatusCode::CREATED,
                [("x-pruebaapp-alert", format!("pruebaApp.{resource}.created"))],
                Json(created),
            )
                .into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn item_handler(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut state = state.lock().expect("mock backend state");
    let body = record(
        &mut state,
        &method,
        format!("/api/{resource}/{id}"),
        query,
        &headers,
        &body,
    );
    if let Some(status) = state.fail_with {
        return failure(status);
    }

    if id == "count" && method == Method::GET && state.blank_count {
        return StatusCode::OK.into_response();
    }
    let store = state.resources.entry(resource).or_default();
    if id == "count" && method == Method::GET {
        return Json(store.len() as u64).into_response();
    }
    let Ok(id) = id.parse::<i64>() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match method {
        Method::GET => Json(store.get(&id).cloned().unwrap_or(Value::Null)).into_response(),
        Method::PUT => {
            store.insert(id, body.clone());
            Json(body).into_response()
        }
        Method::PATCH => {
            let Some(existing) = store.get_mut(&id) else {
                return StatusCode::NOT_FOUND.into_response();
            };
            if let (Value::Object(target), Value::Object(patch)) = (existing, body) {
                for (k, v) in patch {
                    if !v.is_null() {
                        target.insert(k, v);
                    }
                }
            }
            Json(store.get(&id).cloned().unwrap_or(Value::Null)).into_response()
        }
        Method::DELETE => {
            store.remove(&id);
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording EntityApi
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall<T> {
    Create(T),
    Update(T),
    PartialUpdate(T),
    Find(i64),
    Query(RequestOptions),
    Count(RequestOptions),
    Delete(i64),
}

/// `EntityApi` double: records every call, echoes entities back, and can be
/// told to fail or to hold each response until its `Notify` is signalled.
pub struct MockApi<T> {
    calls: Mutex<Vec<ApiCall<T>>>,
    find_body: Mutex<Option<T>>,
    list: Mutex<Vec<T>>,
    fail: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl<T: Entity> MockApi<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            find_body: Mutex::new(None),
            list: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            gate: None,
        }
    }

    /// Every response waits for one `Notify` permit.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        let api = Self::new();
        api.fail.store(true, Ordering::SeqCst);
        api
    }

    pub fn set_find_body(&self, body: Option<T>) {
        *self.find_body.lock().expect("mock api") = body;
    }

    pub fn set_list(&self, items: Vec<T>) {
        *self.list.lock().expect("mock api") = items;
    }

    pub fn calls(&self) -> Vec<ApiCall<T>> {
        self.calls.lock().expect("mock api").clone()
    }

    async fn respond<B>(&self, call: ApiCall<T>, body: Option<B>) -> Result<EntityResponse<B>, ClientError> {
        self.calls.lock().expect("mock api").push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: "mock failure".to_string(),
            });
        }
        Ok(EntityResponse::ok(body))
    }
}

#[async_trait]
impl<T: Entity> EntityApi<T> for MockApi<T> {
    async fn create(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        self.respond(ApiCall::Create(entity.clone()), Some(entity.clone()))
            .await
    }

    async fn update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        self.respond(ApiCall::Update(entity.clone()), Some(entity.clone()))
            .await
    }

    async fn partial_update(&self, entity: &T) -> Result<EntityResponse<T>, ClientError> {
        self.respond(ApiCall::PartialUpdate(entity.clone()), Some(entity.clone()))
            .await
    }

    async fn find(&self, id: i64) -> Result<EntityResponse<T>, ClientError> {
        let body = self.find_body.lock().expect("mock api").clone();
        self.respond(ApiCall::Find(id), body).await
    }

    async fn query(
        &self,
        options: &RequestOptions,
    ) -> Result<EntityResponse<Vec<T>>, ClientError> {
        let items = self.list.lock().expect("mock api").clone();
        let total = items.len() as u64;
        let mut response = self.respond(ApiCall::Query(options.clone()), Some(items)).await?;
        response.total_count = Some(total);
        Ok(response)
    }

    async fn count(&self, options: &RequestOptions) -> Result<u64, ClientError> {
        let total = self.list.lock().expect("mock api").len() as u64;
        self.respond::<()>(ApiCall::Count(options.clone()), None)
            .await
            .map(|_| total)
    }

    async fn delete(&self, id: i64) -> Result<EntityResponse<()>, ClientError> {
        self.respond(ApiCall::Delete(id), None).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording Navigator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Navigate(String),
    Back,
}

#[derive(Default)]
pub struct RecordingNavigator {
    events: Mutex<Vec<NavEvent>>,
}

impl RecordingNavigator {
    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().expect("navigator").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.events
            .lock()
            .expect("navigator")
            .push(NavEvent::Navigate(route.to_string()));
    }

    fn back(&self) {
        self.events.lock().expect("navigator").push(NavEvent::Back);
    }
}
