//! End-to-end webhook contract tests over the assembled router: every
//! dispatch outcome answers 200 with a `fulfillmentText` body.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use reliefline_db::repositories::{
    AidRequestRepository, InMemoryAidRequestRepository, InMemoryInsuranceClaimRepository,
    RepositoryError,
};
use reliefline_server::webhook::{self, WebhookState};

struct UnavailableAidRepository;

#[async_trait::async_trait]
impl AidRequestRepository for UnavailableAidRepository {
    async fn insert(
        &self,
        _record: reliefline_core::AidRequest,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Decode("storage collaborator unavailable".to_string()))
    }

    async fn list(&self) -> Result<Vec<reliefline_core::AidRequest>, RepositoryError> {
        Ok(Vec::new())
    }
}

fn in_memory_state() -> (WebhookState, Arc<InMemoryAidRequestRepository>) {
    let aid = Arc::new(InMemoryAidRequestRepository::default());
    let state = WebhookState {
        aid_requests: aid.clone(),
        insurance_claims: Arc::new(InMemoryInsuranceClaimRepository::default()),
        session_project_id: Some("relief-agent".to_string()),
    };
    (state, aid)
}

fn webhook_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.expect("body should collect");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn aid_request_round_trip_matches_platform_contract() {
    let (state, aid) = in_memory_state();
    let router = webhook::router(state);

    let body = json!({
        "session": "projects/relief-agent/agent/sessions/abc-123",
        "queryResult": {
            "intent": { "displayName": "Financial Aid Request" },
            "parameters": { "user_name": "Asha", "disaster_id": 7, "aid_amount": 5000 }
        }
    });
    let response = router.oneshot(webhook_request(&body)).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "fulfillmentText": "✅ Your aid request for ₹5000 has been submitted." })
    );
    assert_eq!(aid.list().await.expect("list").len(), 1);
}

#[tokio::test]
async fn insurance_claim_round_trip_names_damage_type() {
    let (state, _aid) = in_memory_state();
    let router = webhook::router(state);

    let body = json!({
        "queryResult": {
            "intent": { "displayName": "Insurance Claim" },
            "parameters": {
                "user_name": "Ravi",
                "policy_number": 221,
                "disaster_id": 7,
                "damage_type": "flood"
            }
        }
    });
    let response = router.oneshot(webhook_request(&body)).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = response_json(response).await;
    let text = payload["fulfillmentText"].as_str().expect("fulfillment text");
    assert!(text.contains("flood"));
}

#[tokio::test]
async fn unknown_intent_answers_the_exact_fallback_text() {
    let (state, aid) = in_memory_state();
    let router = webhook::router(state);

    let body = json!({
        "queryResult": {
            "intent": { "displayName": "Weather Inquiry" },
            "parameters": {}
        }
    });
    let response = router.oneshot(webhook_request(&body)).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({ "fulfillmentText": "I couldn't process your request. Please try again." })
    );
    assert!(aid.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn storage_outage_keeps_the_transport_contract() {
    let state = WebhookState {
        aid_requests: Arc::new(UnavailableAidRepository),
        insurance_claims: Arc::new(InMemoryInsuranceClaimRepository::default()),
        session_project_id: None,
    };
    let router = webhook::router(state);

    let body = json!({
        "queryResult": {
            "intent": { "displayName": "Financial Aid Request" },
            "parameters": { "user_name": "Asha", "disaster_id": 7, "aid_amount": 5000 }
        }
    });
    let response = router.oneshot(webhook_request(&body)).await.expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({
            "fulfillmentText":
                "❌ There was an error processing your request. Please try again later."
        })
    );
}

#[tokio::test]
async fn missing_query_result_is_mapped_to_generic_error() {
    let (state, aid) = in_memory_state();
    let router = webhook::router(state);

    let response = router
        .oneshot(webhook_request(&json!({ "session": "abc-123" })))
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await,
        json!({
            "fulfillmentText":
                "❌ There was an error processing your request. Please try again later."
        })
    );
    assert!(aid.list().await.expect("list").is_empty());
}
