//! In-memory repositories for tests and local doubles.

use tokio::sync::RwLock;

use reliefline_core::{AidRequest, InsuranceClaim};

use super::{AidRequestRepository, InsuranceClaimRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryAidRequestRepository {
    records: RwLock<Vec<AidRequest>>,
}

#[async_trait::async_trait]
impl AidRequestRepository for InMemoryAidRequestRepository {
    async fn insert(&self, record: AidRequest) -> Result<(), RepositoryError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AidRequest>, RepositoryError> {
        Ok(self.records.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryInsuranceClaimRepository {
    records: RwLock<Vec<InsuranceClaim>>,
}

#[async_trait::async_trait]
impl InsuranceClaimRepository for InMemoryInsuranceClaimRepository {
    async fn insert(&self, record: InsuranceClaim) -> Result<(), RepositoryError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InsuranceClaim>, RepositoryError> {
        Ok(self.records.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use reliefline_core::{AidRequest, InsuranceClaim};

    use crate::repositories::{
        AidRequestRepository, InMemoryAidRequestRepository, InMemoryInsuranceClaimRepository,
        InsuranceClaimRepository,
    };

    #[tokio::test]
    async fn in_memory_aid_repo_appends_in_order() {
        let repo = InMemoryAidRequestRepository::default();
        let first = AidRequest {
            user_name: "Asha".to_string(),
            disaster_id: 7,
            aid_amount: Decimal::from(5000),
        };
        let second = AidRequest { disaster_id: 8, ..first.clone() };

        repo.insert(first.clone()).await.expect("insert first");
        repo.insert(second.clone()).await.expect("insert second");

        assert_eq!(repo.list().await.expect("list"), vec![first, second]);
    }

    #[tokio::test]
    async fn in_memory_claim_repo_round_trip() {
        let repo = InMemoryInsuranceClaimRepository::default();
        let record = InsuranceClaim {
            user_name: "Ravi".to_string(),
            policy_number: 221,
            disaster_id: 7,
            damage_type: "flood".to_string(),
        };

        repo.insert(record.clone()).await.expect("insert");
        assert_eq!(repo.list().await.expect("list"), vec![record]);
    }
}
