use chrono::Utc;
use sqlx::Row;

use reliefline_core::InsuranceClaim;

use super::{InsuranceClaimRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInsuranceClaimRepository {
    pool: DbPool,
}

impl SqlInsuranceClaimRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_claim(row: &sqlx::sqlite::SqliteRow) -> Result<InsuranceClaim, RepositoryError> {
    let user_name: String =
        row.try_get("user_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let policy_number: i64 =
        row.try_get("policy_number").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let disaster_id: i64 =
        row.try_get("disaster_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let damage_type: String =
        row.try_get("damage_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(InsuranceClaim { user_name, policy_number, disaster_id, damage_type })
}

#[async_trait::async_trait]
impl InsuranceClaimRepository for SqlInsuranceClaimRepository {
    async fn insert(&self, record: InsuranceClaim) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO insurance_claims \
             (user_name, policy_number, disaster_id, damage_type, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&record.user_name)
        .bind(record.policy_number)
        .bind(record.disaster_id)
        .bind(&record.damage_type)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<InsuranceClaim>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT user_name, policy_number, disaster_id, damage_type \
             FROM insurance_claims ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_claim).collect()
    }
}
