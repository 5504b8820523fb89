//! The intent fulfillment webhook.
//!
//! One route, `POST /webhook`. Each call is independent: match the intent
//! display name, validate the parameter bag into a typed record, write it
//! once, and answer with fulfillment text. The transport status is 200 on
//! every path; validation and persistence failures are reported only through
//! the text payload and structured logs.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use reliefline_core::{
    aid_confirmation, aid_request_from_params, claim_confirmation, dialogflow,
    insurance_claim_from_params, intent::QueryResult, IntentError, WebhookRequest,
    WebhookResponse, FALLBACK_TEXT, FINANCIAL_AID_INTENT, INSURANCE_CLAIM_INTENT,
    PROCESSING_ERROR_TEXT,
};
use reliefline_db::repositories::{
    AidRequestRepository, InsuranceClaimRepository, RepositoryError,
};

/// Storage handles are injected rather than reached through a process global
/// so tests can substitute doubles.
#[derive(Clone)]
pub struct WebhookState {
    pub aid_requests: Arc<dyn AidRequestRepository>,
    pub insurance_claims: Arc<dyn InsuranceClaimRepository>,
    /// Conversational-AI project id, when configured. Only used to render
    /// the session resource path in logs.
    pub session_project_id: Option<String>,
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Intent(#[from] IntentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/webhook", post(handle)).with_state(state)
}

pub async fn handle(
    State(state): State<WebhookState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<WebhookResponse>) {
    let correlation_id = Uuid::new_v4().simple().to_string();
    let text = dispatch(&state, body, &correlation_id).await;
    (StatusCode::OK, Json(WebhookResponse { fulfillment_text: text }))
}

async fn dispatch(state: &WebhookState, body: Value, correlation_id: &str) -> String {
    let request: WebhookRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(parse_error) => {
            warn!(
                event_name = "webhook.malformed",
                correlation_id,
                error = %parse_error,
                "webhook body is not an intent envelope"
            );
            return PROCESSING_ERROR_TEXT.to_string();
        }
    };

    log_session_context(state, &request, correlation_id);

    let Some(intent) = request.intent_name().map(str::to_owned) else {
        warn!(
            event_name = "webhook.malformed",
            correlation_id,
            "webhook envelope carries no intent display name"
        );
        return PROCESSING_ERROR_TEXT.to_string();
    };
    let query_result = request.query_result.unwrap_or_default();

    info!(
        event_name = "webhook.received",
        correlation_id,
        intent = %intent,
        parameters = %serde_json::Value::Object(query_result.parameters.clone().into_iter().collect()),
        "intent notification received"
    );

    let mut response_text = FALLBACK_TEXT.to_string();
    let mut matched = false;

    // The two intent checks are deliberately independent rather than arms of
    // one match: the original contract allows both to fire in sequence, with
    // the later confirmation overwriting the earlier response text.
    if intent == FINANCIAL_AID_INTENT {
        matched = true;
        response_text = match record_aid_request(state, &query_result).await {
            Ok(text) => text,
            Err(dispatch_error) => {
                log_failure(&intent, correlation_id, &dispatch_error);
                PROCESSING_ERROR_TEXT.to_string()
            }
        };
        info_if_recorded(&intent, correlation_id, &response_text, "webhook.dispatch.aid_recorded");
    }

    if intent == INSURANCE_CLAIM_INTENT {
        matched = true;
        response_text = match record_insurance_claim(state, &query_result).await {
            Ok(text) => text,
            Err(dispatch_error) => {
                log_failure(&intent, correlation_id, &dispatch_error);
                PROCESSING_ERROR_TEXT.to_string()
            }
        };
        info_if_recorded(&intent, correlation_id, &response_text, "webhook.dispatch.claim_recorded");
    }

    if !matched {
        info!(
            event_name = "webhook.dispatch.no_match",
            correlation_id,
            intent = %intent,
            "unrecognized intent, returning fallback text"
        );
    }

    response_text
}

async fn record_aid_request(
    state: &WebhookState,
    query_result: &QueryResult,
) -> Result<String, DispatchError> {
    let record = aid_request_from_params(&query_result.parameters)?;
    let amount = record.aid_amount;
    state.aid_requests.insert(record).await?;
    Ok(aid_confirmation(&amount))
}

async fn record_insurance_claim(
    state: &WebhookState,
    query_result: &QueryResult,
) -> Result<String, DispatchError> {
    let record = insurance_claim_from_params(&query_result.parameters)?;
    let damage_type = record.damage_type.clone();
    state.insurance_claims.insert(record).await?;
    Ok(claim_confirmation(&damage_type))
}

fn log_session_context(state: &WebhookState, request: &WebhookRequest, correlation_id: &str) {
    let (Some(project_id), Some(session)) = (&state.session_project_id, &request.session) else {
        return;
    };
    info!(
        event_name = "webhook.session",
        correlation_id,
        session_path = %dialogflow::session_path(project_id, session),
        "conversational session context"
    );
}

fn info_if_recorded(intent: &str, correlation_id: &str, response_text: &str, event_name: &str) {
    if response_text != PROCESSING_ERROR_TEXT {
        info!(event_name, correlation_id, intent = %intent, "submission recorded");
    }
}

fn log_failure(intent: &str, correlation_id: &str, dispatch_error: &DispatchError) {
    error!(
        event_name = "webhook.dispatch.failed",
        correlation_id,
        intent = %intent,
        error = %dispatch_error,
        "request could not be processed, no record written"
    );
}
