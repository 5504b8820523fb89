use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use reliefline_core::AidRequest;

use super::{AidRequestRepository, RepositoryError};
use crate::DbPool;

pub struct SqlAidRequestRepository {
    pool: DbPool,
}

impl SqlAidRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_aid_request(row: &sqlx::sqlite::SqliteRow) -> Result<AidRequest, RepositoryError> {
    let user_name: String =
        row.try_get("user_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let disaster_id: i64 =
        row.try_get("disaster_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let aid_amount_raw: String =
        row.try_get("aid_amount").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let aid_amount = aid_amount_raw.parse::<Decimal>().map_err(|e| {
        RepositoryError::Decode(format!("aid_amount `{aid_amount_raw}` is not a decimal: {e}"))
    })?;

    Ok(AidRequest { user_name, disaster_id, aid_amount })
}

#[async_trait::async_trait]
impl AidRequestRepository for SqlAidRequestRepository {
    async fn insert(&self, record: AidRequest) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO aid_requests (user_name, disaster_id, aid_amount, created_at) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&record.user_name)
        .bind(record.disaster_id)
        // Decimal is stored as text to keep amounts lossless in SQLite.
        .bind(record.aid_amount.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<AidRequest>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT user_name, disaster_id, aid_amount FROM aid_requests ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_aid_request).collect()
    }
}
