use axum::{Json, Router, extract::State, routing::post};
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{
        CollectContactRequest, CollectRequirementsRequest, CompleteRequest, CompleteResponse,
        EstimateResponse, GenerateEstimateRequest, StartResponse, StepResponse,
    },
    service::ConversationService,
};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConversationService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/start", post(start_conversation))
        .route("/collect-requirements", post(collect_requirements))
        .route("/generate-estimate", post(generate_estimate))
        .route("/collect-contact", post(collect_contact))
        .route("/complete", post(complete_conversation))
        .with_state(state)
}

pub async fn start_conversation(State(state): State<AppState>) -> Json<StartResponse> {
    Json(state.service.start().await)
}

pub async fn collect_requirements(
    State(state): State<AppState>,
    Json(body): Json<CollectRequirementsRequest>,
) -> Result<Json<StepResponse>, AppError> {
    tracing::info!("🎯 Collecting requirements for conversation {}", body.conversation_id);
    let response = state.service.collect_requirements(&body.conversation_id, &body.user_input).await?;
    Ok(Json(response))
}

pub async fn generate_estimate(
    State(state): State<AppState>,
    Json(body): Json<GenerateEstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    tracing::info!("🎯 Generating estimate for conversation {}", body.conversation_id);
    Ok(Json(state.service.generate_estimate(&body.conversation_id).await?))
}

pub async fn collect_contact(
    State(state): State<AppState>,
    Json(body): Json<CollectContactRequest>,
) -> Result<Json<StepResponse>, AppError> {
    tracing::info!("🎯 Collecting contact for conversation {}", body.conversation_id);
    Ok(Json(state.service.collect_contact(&body.conversation_id, body.contact).await?))
}

pub async fn complete_conversation(
    State(state): State<AppState>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, AppError> {
    tracing::info!("🎯 Completing conversation {}", body.conversation_id);
    let response = state.service.complete(&body.conversation_id, body.final_notes.as_deref()).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        archive::LeadArchive,
        generator::CannedGenerator,
        service::tests::{FailingArchive, MemoryArchive},
        store::InMemoryStore,
    };
    use axum::{body::{Body, to_bytes}, http::{Request, StatusCode, header}};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app_with(archive: Arc<dyn LeadArchive>) -> Router {
        let service = ConversationService::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(CannedGenerator),
            archive,
        );
        router(AppState { service: Arc::new(service) })
    }

    fn app() -> (Router, Arc<MemoryArchive>) {
        let archive = Arc::new(MemoryArchive::default());
        (app_with(archive.clone()), archive)
    }

    fn contact_body(id: &Value, name: &str) -> Value {
        json!({
            "conversation_id": id,
            "contact": {"name": name, "email": "jane@example.com", "phone": "+15551234567"}
        })
    }

    async fn post_json(app: &Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let request = match body {
            Some(v) => request.body(Body::from(v.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    #[tokio::test]
    async fn start_returns_id_and_greeting() {
        let (app, _) = app();
        let (status, body) = post_json(&app, "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], "greeting");
        assert!(body["conversation_id"].as_str().is_some_and(|id| uuid::Uuid::parse_str(id).is_ok()));
        assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Hi there!")));
    }

    #[tokio::test]
    async fn unknown_conversation_is_404_with_detail() {
        let (app, _) = app();
        let (status, body) = post_json(
            &app,
            "/collect-requirements",
            Some(json!({"conversation_id": "does-not-exist", "user_input": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Conversation not found");
    }

    #[tokio::test]
    async fn malformed_phone_is_422() {
        let (app, _) = app();
        let (_, started) = post_json(&app, "/start", None).await;
        let (status, body) = post_json(
            &app,
            "/collect-contact",
            Some(json!({
                "conversation_id": started["conversation_id"],
                "contact": {"name": "Jane Doe", "email": "jane@example.com", "phone": "123"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("phone"));
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let (app, _) = app();
        let (status, _) = post_json(&app, "/collect-requirements", Some(json!({"user_input": "hi"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn full_flow_over_http() {
        let (app, archive) = app();
        let (_, started) = post_json(&app, "/start", None).await;
        let id = started["conversation_id"].clone();

        let (status, body) = post_json(
            &app,
            "/collect-requirements",
            Some(json!({"conversation_id": id, "user_input": "I need a website"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], "collecting_requirements");
        assert!(body["message"].as_str().unwrap().contains("e-commerce"));

        let (_, body) = post_json(&app, "/generate-estimate", Some(json!({"conversation_id": id}))).await;
        assert_eq!(body["current_step"], "collecting_contact");
        assert_eq!(body["estimate"]["timeline"], "8-12 weeks");
        assert_eq!(body["estimate"]["budget_range"], "$15,000-$25,000");
        assert_eq!(body["estimate"]["complexity"], "Medium");

        let (status, body) = post_json(
            &app,
            "/collect-contact",
            Some(json!({
                "conversation_id": id,
                "contact": {"name": "Jane Doe", "email": "jane@example.com", "phone": "+1 (555) 123-4567"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], "confirmation");

        let (status, body) = post_json(
            &app,
            "/complete",
            Some(json!({"conversation_id": id, "final_notes": "Thanks!"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "completed");
        assert_eq!(archive.records.lock().len(), 1);

        let (status, _) = post_json(&app, "/complete", Some(json!({"conversation_id": id}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(archive.records.lock().len(), 1);
    }

    #[tokio::test]
    async fn second_contact_submission_is_409() {
        let (app, _) = app();
        let (_, started) = post_json(&app, "/start", None).await;
        let id = started["conversation_id"].clone();

        let (status, _) = post_json(&app, "/collect-contact", Some(contact_body(&id, "Jane Doe"))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(&app, "/collect-contact", Some(contact_body(&id, "John Roe"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Contact information has already been submitted");
    }

    #[tokio::test]
    async fn archive_failure_is_500_and_conversation_survives() {
        let app = app_with(Arc::new(FailingArchive));
        let (_, started) = post_json(&app, "/start", None).await;
        let id = started["conversation_id"].clone();

        let (status, body) = post_json(&app, "/complete", Some(json!({"conversation_id": id}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"detail": "Failed to save conversation"}));

        let (status, _) = post_json(
            &app,
            "/collect-requirements",
            Some(json!({"conversation_id": id, "user_input": "still here"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
