//! Form → submission page → HTTP → mock backend → rendered result.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use client_core::{
    form::SubmissionForm,
    pages::{SubmissionPage, SubmissionState},
    render::ResultView,
    EsClient, Settings,
};
use serde_json::{json, Value};
use shared::domain::{Industry, QuestionType};
use tokio::{net::TcpListener, sync::Mutex};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn handle_analyze(
    State(captured): State<Captured>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    captured.lock().await.push(body.clone());
    let mut analysis = json!({
        "id": 1,
        "es_entry_id": 1,
        "logic_score": 80.0,
        "specificity_score": 79.999,
        "readability_score": 59.0,
        "structure_type": "PREP",
        "structure_evaluation": "構成は明確です",
        "improvement_points": [],
        "improved_content": "改善版",
        "created_at": "2024-06-01T10:00:02Z"
    });
    if body["industry"].as_str().is_some_and(|s| !s.is_empty()) {
        analysis["consistency_score"] = json!(66.0);
    }
    let entry = json!({
        "id": 1,
        "question_type": body["question_type"],
        "question_text": body["question_text"],
        "content": body["content"],
        "word_count": body["word_count"],
        "company_name": body["company_name"],
        "industry": body["industry"],
        "created_at": "2024-06-01T10:00:00Z"
    });
    (
        StatusCode::CREATED,
        Json(json!({ "es_entry": entry, "analysis": analysis })),
    )
}

async fn spawn_backend() -> (String, Captured) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/es/analyze", post(handle_analyze))
        .with_state(captured.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/api"), captured)
}

fn page_for(base_url: &str) -> SubmissionPage {
    let settings = Settings::default()
        .with_base_url(base_url)
        .validated()
        .expect("settings");
    SubmissionPage::new(Arc::new(EsClient::new(&settings).expect("client")))
}

fn draft(industry: Option<Industry>) -> SubmissionForm {
    let mut form = SubmissionForm::new();
    form.set_question_type(QuestionType::Gakuchika);
    form.set_question_text("Q");
    form.set_content("A".repeat(250));
    if let Some(industry) = industry {
        form.toggle_industry(industry);
    }
    form
}

#[tokio::test]
async fn industry_submission_posts_word_count_and_renders_four_cards() {
    let (base_url, captured) = spawn_backend().await;
    let page = page_for(&base_url);

    page.submit(&draft(Some(Industry::ItEngineering)))
        .await
        .expect("valid form");

    let bodies = captured.lock().await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["word_count"], 250);
    assert_eq!(bodies[0]["question_type"], "ガクチカ");
    assert_eq!(bodies[0]["industry"], "IT・エンジニア");

    let SubmissionState::Success(record) = page.state().await else {
        panic!("expected success");
    };
    let view = ResultView::from_record(&record);
    assert_eq!(view.score_cards.len(), 4);
    let labels: Vec<&str> = view.score_cards.iter().map(|c| c.grade.label()).collect();
    assert_eq!(labels, ["excellent", "good", "needs improvement", "good"]);
}

#[tokio::test]
async fn submission_without_industry_renders_three_cards() {
    let (base_url, captured) = spawn_backend().await;
    let page = page_for(&base_url);

    page.submit(&draft(None)).await.expect("valid form");

    assert_eq!(captured.lock().await[0]["industry"], Value::Null);
    let SubmissionState::Success(record) = page.state().await else {
        panic!("expected success");
    };
    assert_eq!(ResultView::from_record(&record).score_cards.len(), 3);
}

#[tokio::test]
async fn whitespace_question_is_rejected_before_any_request() {
    let (base_url, captured) = spawn_backend().await;
    let page = page_for(&base_url);
    let mut form = draft(None);
    form.set_question_text("   ");

    assert!(page.submit(&form).await.is_err());
    assert!(captured.lock().await.is_empty());
    assert_eq!(page.state().await, SubmissionState::Idle);
}
