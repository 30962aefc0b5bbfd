#![allow(dead_code)]

use std::sync::Arc;

use agency_backoffice::{
    database::{memory::MemoryStore, Table},
    error::Result,
    routes,
    services::ai_service::{AIService, CompletionClient},
    utils::id::SequentialIds,
    AppState,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mockall::mock;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

mock! {
    pub Completion {}

    #[async_trait]
    impl CompletionClient for Completion {
        async fn complete(&self, prompt: &str, json_output: bool) -> Result<String>;
    }
}

pub fn state_with(completion: impl CompletionClient + 'static) -> AppState {
    AppState::new(
        AIService::new(Arc::new(completion)),
        Arc::new(SequentialIds::new("id")),
        None,
    )
}

/// A session connected to `store`, with an AI client that must not be called.
pub async fn connected(store: &MemoryStore) -> (AppState, Router) {
    connected_with(store, MockCompletion::new()).await
}

pub async fn connected_with(
    store: &MemoryStore,
    completion: impl CompletionClient + 'static,
) -> (AppState, Router) {
    let state = state_with(completion);
    state
        .attach(Arc::new(store.clone()))
        .await
        .expect("initial load");
    let app = routes::app(state.clone());
    (state, app)
}

pub async fn seed_candidate(store: &MemoryStore, id: &str, name: &str) {
    store
        .seed(
            Table::Candidates,
            json!({
                "id": id,
                "full_name": name,
                "mobile": "9800000000",
                "address": "Pokhara",
                "skills": "Customer service",
                "experience": "2 years retail",
                "education": "+2",
                "status": "ACTIVE",
                "created_at": "2024-01-05T10:00:00+00:00",
                "is_ai_enhanced": false
            }),
        )
        .await;
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            JsonValue::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
