pub mod config;
pub mod dialogflow;
pub mod domain;
pub mod intent;

pub use domain::aid::AidRequest;
pub use domain::claim::InsuranceClaim;
pub use intent::{
    aid_confirmation, aid_request_from_params, claim_confirmation, insurance_claim_from_params,
    IntentError, WebhookRequest, WebhookResponse, FALLBACK_TEXT, FINANCIAL_AID_INTENT,
    INSURANCE_CLAIM_INTENT, PROCESSING_ERROR_TEXT,
};
