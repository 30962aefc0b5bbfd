mod common;

use std::sync::Arc;

use agency_backoffice::{
    database::{memory::MemoryStore, Table},
    error::Result,
    services::ai_service::CompletionClient,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use tokio::sync::Notify;

use common::{connected, connected_with, seed_candidate, send, MockCompletion};

/// Completion that parks until released, so a request can be overtaken.
struct HeldCompletion {
    started: Arc<Notify>,
    release: Arc<Notify>,
    reply: String,
}

#[async_trait]
impl CompletionClient for HeldCompletion {
    async fn complete(&self, _prompt: &str, _json_output: bool) -> Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

#[tokio::test]
async fn polish_merges_summary_experiences_and_skills() {
    let store = MemoryStore::new();
    seed_candidate(&store, "c1", "Bishnu Adhikari").await;
    let mut completion = MockCompletion::new();
    completion.expect_complete().times(1).returning(|prompt, json_output| {
        assert!(json_output);
        assert!(prompt.contains("Bishnu Adhikari"));
        Ok(json!({
            "summary": "Hospitality professional with a record of guest satisfaction.",
            "experiences": [{
                "company": "Temple Tree Resort",
                "role": "Front Desk Supervisor",
                "startDate": "2021-04",
                "endDate": "",
                "isCurrent": true,
                "responsibilities": "Led a team of four receptionists."
            }],
            "skills": ["Go", "Rust"]
        })
        .to_string())
    });
    let (_state, app) = connected_with(&store, completion).await;

    send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c1"}))).await;
    let (_, created) = send(&app, "POST", "/api/studio/experiences", None).await;
    let entry_id = created["id"].as_str().unwrap().to_string();
    send(
        &app,
        "PATCH",
        &format!("/api/studio/experiences/{}", entry_id),
        Some(json!({"field": "location", "value": "Pokhara"})),
    )
    .await;

    let (status, studio) = send(&app, "POST", "/api/studio/polish", None).await;
    assert_eq!(status, StatusCode::OK, "{}", studio);

    let doc = &studio["document"];
    assert_eq!(doc["skills"], "Go, Rust");
    assert_eq!(doc["summary"], "Hospitality professional with a record of guest satisfaction.");
    assert_eq!(doc["experiences"].as_array().unwrap().len(), 1);
    assert_eq!(doc["experiences"][0]["id"], entry_id.as_str());
    assert_eq!(doc["experiences"][0]["location"], "Pokhara");
    assert_eq!(doc["experiences"][0]["role"], "Front Desk Supervisor");
    assert_eq!(doc["experiences"][0]["isCurrent"], true);
}

#[tokio::test]
async fn malformed_polish_leaves_document_untouched() {
    let store = MemoryStore::new();
    seed_candidate(&store, "c1", "Bishnu Adhikari").await;
    let mut completion = MockCompletion::new();
    completion
        .expect_complete()
        .returning(|_, _| Ok(r#"{"summary": ["not", "text"]}"#.to_string()));
    let (_state, app) = connected_with(&store, completion).await;

    let (_, before) = send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c1"}))).await;

    let (status, body) = send(&app, "POST", "/api/studio/polish", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "AI service error");

    let (_, after) = send(&app, "GET", "/api/studio", None).await;
    assert_eq!(after["document"], before["document"]);
}

#[tokio::test]
async fn polish_result_is_dropped_when_document_was_replaced() {
    let store = MemoryStore::new();
    seed_candidate(&store, "c1", "Bishnu Adhikari").await;
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let completion = HeldCompletion {
        started: started.clone(),
        release: release.clone(),
        reply: json!({"summary": "Late rewrite", "skills": "Late"}).to_string(),
    };
    let (_state, app) = connected_with(&store, completion).await;

    send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c1"}))).await;

    let polishing = {
        let app = app.clone();
        tokio::spawn(async move { send(&app, "POST", "/api/studio/polish", None).await })
    };
    started.notified().await;

    let (_, blank) = send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": null}))).await;
    release.notify_one();

    let (status, _) = polishing.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, studio) = send(&app, "GET", "/api/studio", None).await;
    assert_eq!(studio["document"], blank["document"]);
    assert_ne!(studio["document"]["summary"], "Late rewrite");
}

#[tokio::test]
async fn polish_result_is_dropped_after_reconnecting() {
    let first = MemoryStore::new();
    seed_candidate(&first, "c1", "Bishnu Adhikari").await;
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let completion = HeldCompletion {
        started: started.clone(),
        release: release.clone(),
        reply: json!({"summary": "Stale rewrite"}).to_string(),
    };
    let (state, app) = connected_with(&first, completion).await;

    send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c1"}))).await;
    let polishing = {
        let app = app.clone();
        tokio::spawn(async move { send(&app, "POST", "/api/studio/polish", None).await })
    };
    started.notified().await;

    let (status, _) = send(&app, "DELETE", "/api/connection", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let second = MemoryStore::new();
    seed_candidate(&second, "c2", "Rita Karki").await;
    state.attach(Arc::new(second)).await.unwrap();
    let (_, selected) = send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c2"}))).await;
    release.notify_one();

    let (status, _) = polishing.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, studio) = send(&app, "GET", "/api/studio", None).await;
    assert_eq!(studio["candidateId"], "c2");
    assert_eq!(studio["document"], selected["document"]);
    assert_ne!(studio["document"]["summary"], "Stale rewrite");
}

#[tokio::test]
async fn education_entries_are_edited_and_rendered_by_rank() {
    let store = MemoryStore::new();
    let (_state, app) = connected(&store).await;

    send(&app, "POST", "/api/studio/select", Some(json!({}))).await;
    let (status, first) = send(&app, "POST", "/api/studio/educations", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = send(&app, "POST", "/api/studio/educations", None).await;
    let first = first["id"].as_str().unwrap().to_string();
    let second = second["id"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    for (id, field, value) in [
        (&first, "degree", json!("Science")),
        (&first, "level", json!("Plus2")),
        (&second, "degree", json!("MBA")),
        (&second, "level", json!("Masters")),
        (&second, "board", json!("Tribhuvan University")),
    ] {
        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/studio/educations/{}", id),
            Some(json!({"field": field, "value": value})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, studio) = send(&app, "GET", "/api/studio", None).await;
    let educations = studio["document"]["educations"].as_array().unwrap();
    assert_eq!(educations[0]["degree"], "Science");
    assert_eq!(educations[1]["level"], "Masters");

    let (status, html) = send(&app, "GET", "/api/studio/render", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = html.as_str().unwrap();
    let mba = html.find("MBA").unwrap();
    let science = html.find("Science").unwrap();
    assert!(mba < science);
    assert!(html.contains("Tribhuvan University"));

    let (_, studio) = send(&app, "DELETE", &format!("/api/studio/educations/{}", first), None).await;
    assert_eq!(studio["document"]["educations"].as_array().unwrap().len(), 1);
    let (status, studio) = send(&app, "DELETE", "/api/studio/educations/missing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(studio["document"]["educations"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/studio/educations/{}", second),
        Some(json!({"field": "isEquivalent", "value": "yes"})),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn saving_writes_document_back_to_candidate() {
    let store = MemoryStore::new();
    seed_candidate(&store, "c1", "Bishnu Adhikari").await;
    let (_state, app) = connected(&store).await;

    send(&app, "POST", "/api/studio/select", Some(json!({"candidateId": "c1"}))).await;
    send(
        &app,
        "PATCH",
        "/api/studio/profile",
        Some(json!({"field": "summary", "value": "Reliable and punctual."})),
    )
    .await;
    let (_, created) = send(&app, "POST", "/api/studio/experiences", None).await;
    let id = created["id"].as_str().unwrap();
    for (field, value) in [("role", "Waiter"), ("company", "Moondance")] {
        send(
            &app,
            "PATCH",
            &format!("/api/studio/experiences/{}", id),
            Some(json!({"field": field, "value": value})),
        )
        .await;
    }

    let (status, candidate) = send(&app, "POST", "/api/studio/save", None).await;
    assert_eq!(status, StatusCode::OK, "{}", candidate);
    assert_eq!(candidate["id"], "c1");
    assert_eq!(candidate["experience"], "Waiter at Moondance");

    let rows = store.rows(Table::Candidates).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cv_data"]["summary"], "Reliable and punctual.");
    assert_eq!(rows[0]["experience"], "Waiter at Moondance");
}

#[tokio::test]
async fn enhancing_a_candidate_replaces_skills() {
    let store = MemoryStore::new();
    seed_candidate(&store, "c1", "Bishnu Adhikari").await;
    let mut completion = MockCompletion::new();
    completion.expect_complete().times(1).returning(|_, _| {
        Ok(json!({
            "headline": "Hospitality specialist",
            "summary": "Five years serving guests.",
            "skills": ["Guest relations", "Cash handling"]
        })
        .to_string())
    });
    let (_state, app) = connected_with(&store, completion).await;

    let (status, body) = send(&app, "POST", "/api/candidates/c1/enhance", None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["enhancement"]["headline"], "Hospitality specialist");
    assert_eq!(body["candidate"]["skills"], "Guest relations, Cash handling");
    assert_eq!(body["candidate"]["isAiEnhanced"], true);

    let rows = store.rows(Table::Candidates).await;
    assert_eq!(rows[0]["is_ai_enhanced"], true);

    let (status, _) = send(&app, "POST", "/api/candidates/ghost/enhance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
