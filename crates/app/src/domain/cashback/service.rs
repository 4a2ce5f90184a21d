//! Cashback service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use storefront::cashback::CashbackPolicy;
use tracing::info;

use crate::{
    database::Db,
    domain::cashback::{
        errors::CashbackServiceError, records::CashbackPolicyRecord,
        repository::PgCashbackRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCashbackService {
    db: Db,
    repository: PgCashbackRepository,
}

impl PgCashbackService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCashbackRepository::new(),
        }
    }
}

#[async_trait]
impl CashbackService for PgCashbackService {
    async fn get_policy(&self) -> Result<Option<CashbackPolicyRecord>, CashbackServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let policy = self.repository.get_policy(&mut tx).await?;

        tx.commit().await?;

        Ok(policy)
    }

    #[tracing::instrument(
        name = "cashback.service.set_policy",
        skip(self),
        fields(
            redemption_rate = %policy.redemption_rate,
            minimum_balance_to_redeem = %policy.minimum_balance_to_redeem
        ),
        err
    )]
    async fn set_policy(
        &self,
        policy: CashbackPolicy,
    ) -> Result<CashbackPolicyRecord, CashbackServiceError> {
        if policy.minimum_balance_to_redeem < Decimal::ZERO {
            return Err(CashbackServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.upsert_policy(&mut tx, policy).await?;

        tx.commit().await?;

        info!("updated cashback policy");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait CashbackService: Send + Sync {
    /// The configured policy, or `None` when cashback is switched off.
    async fn get_policy(&self) -> Result<Option<CashbackPolicyRecord>, CashbackServiceError>;

    /// Creates or replaces the single policy record.
    async fn set_policy(
        &self,
        policy: CashbackPolicy,
    ) -> Result<CashbackPolicyRecord, CashbackServiceError>;
}
