use serde::{Deserialize, Serialize};

/// A claim against an insurance policy for damage from a disaster event.
///
/// Same lifecycle as [`crate::domain::aid::AidRequest`]: one successful
/// dispatch produces exactly one stored record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceClaim {
    pub user_name: String,
    pub policy_number: i64,
    pub disaster_id: i64,
    pub damage_type: String,
}
