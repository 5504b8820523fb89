//! Webhook payload types and intent parameter validation.
//!
//! The conversational-AI platform posts a `queryResult` envelope carrying an
//! intent display name and a flat map of extracted parameters. This module
//! turns that loosely-typed map into the typed records of [`crate::domain`]
//! before anything reaches storage, and owns the fulfillment text templates.

use std::collections::BTreeMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::aid::AidRequest;
use crate::domain::claim::InsuranceClaim;

/// Intent display names the dispatcher recognizes. Anything else falls
/// through to [`FALLBACK_TEXT`] with no write.
pub const FINANCIAL_AID_INTENT: &str = "Financial Aid Request";
pub const INSURANCE_CLAIM_INTENT: &str = "Insurance Claim";

/// Returned when no known intent matched.
pub const FALLBACK_TEXT: &str = "I couldn't process your request. Please try again.";

/// Returned when a matched intent failed validation or persistence. The
/// transport status stays 200 in every case; this text is the only failure
/// signal the caller sees.
pub const PROCESSING_ERROR_TEXT: &str =
    "❌ There was an error processing your request. Please try again later.";

pub fn aid_confirmation(amount: &Decimal) -> String {
    format!("✅ Your aid request for ₹{amount} has been submitted.")
}

pub fn claim_confirmation(damage_type: &str) -> String {
    format!("✅ Your insurance claim for {damage_type} has been submitted.")
}

/// Inbound webhook envelope. Fields are optional so that a structurally
/// incomplete body deserializes instead of failing at the transport layer;
/// the handler maps the gaps to the generic error text.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<IntentInfo>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("missing parameter `{name}`")]
    MissingParameter { name: &'static str },
    #[error("parameter `{name}` is not a valid {expected}")]
    InvalidParameter { name: &'static str, expected: &'static str },
}

impl WebhookRequest {
    /// Intent display name, if the envelope carried one.
    pub fn intent_name(&self) -> Option<&str> {
        self.query_result
            .as_ref()
            .and_then(|qr| qr.intent.as_ref())
            .map(|intent| intent.display_name.as_str())
    }

    pub fn parameters(&self) -> Option<&BTreeMap<String, Value>> {
        self.query_result.as_ref().map(|qr| &qr.parameters)
    }
}

/// Validate and map the parameter bag of a "Financial Aid Request" intent.
pub fn aid_request_from_params(params: &BTreeMap<String, Value>) -> Result<AidRequest, IntentError> {
    Ok(AidRequest {
        user_name: string_param(params, "user_name")?,
        disaster_id: integer_param(params, "disaster_id")?,
        aid_amount: decimal_param(params, "aid_amount")?,
    })
}

/// Validate and map the parameter bag of an "Insurance Claim" intent.
pub fn insurance_claim_from_params(
    params: &BTreeMap<String, Value>,
) -> Result<InsuranceClaim, IntentError> {
    Ok(InsuranceClaim {
        user_name: string_param(params, "user_name")?,
        policy_number: integer_param(params, "policy_number")?,
        disaster_id: integer_param(params, "disaster_id")?,
        damage_type: string_param(params, "damage_type")?,
    })
}

fn required<'a>(
    params: &'a BTreeMap<String, Value>,
    name: &'static str,
) -> Result<&'a Value, IntentError> {
    match params.get(name) {
        Some(Value::Null) | None => Err(IntentError::MissingParameter { name }),
        Some(value) => Ok(value),
    }
}

fn string_param(params: &BTreeMap<String, Value>, name: &'static str) -> Result<String, IntentError> {
    match required(params, name)? {
        Value::String(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(IntentError::InvalidParameter { name, expected: "string" }),
    }
}

/// Integers arrive either as JSON numbers (the platform serializes all
/// numeric entities as doubles) or as numeric strings.
fn integer_param(params: &BTreeMap<String, Value>, name: &'static str) -> Result<i64, IntentError> {
    let invalid = IntentError::InvalidParameter { name, expected: "integer" };
    match required(params, name)? {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                return Ok(integer);
            }
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
                    Ok(float as i64)
                }
                _ => Err(invalid),
            }
        }
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid),
        _ => Err(invalid),
    }
}

fn decimal_param(
    params: &BTreeMap<String, Value>,
    name: &'static str,
) -> Result<Decimal, IntentError> {
    let invalid = IntentError::InvalidParameter { name, expected: "number" };
    let decimal = match required(params, name)? {
        Value::Number(number) => {
            if let Some(integer) = number.as_i64() {
                Decimal::from(integer)
            } else {
                // `from_f64` rounds to the shortest decimal representation of
                // the double, so `2500.1` stays `2500.1` instead of carrying
                // the binary expansion into the reply and the stored record.
                number.as_f64().and_then(Decimal::from_f64).ok_or(invalid)?
            }
        }
        Value::String(text) => text.trim().parse::<Decimal>().map_err(|_| invalid)?,
        _ => return Err(invalid),
    };
    // `5000.0` from the platform should render as `₹5000` in the reply.
    Ok(decimal.normalize())
}
