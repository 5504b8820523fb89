use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request for financial assistance tied to a disaster event.
///
/// Append-only: built fully in memory from one matched webhook call, written
/// once, never updated or deleted by this service. Duplicates are permitted;
/// there is no idempotency key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AidRequest {
    pub user_name: String,
    pub disaster_id: i64,
    pub aid_amount: Decimal,
}
