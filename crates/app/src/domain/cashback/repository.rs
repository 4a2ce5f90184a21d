//! Cashback Policy Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::cashback::CashbackPolicy;

use crate::{database::try_get_percent, domain::cashback::records::CashbackPolicyRecord};

const GET_POLICY_SQL: &str = include_str!("sql/get_policy.sql");
const UPSERT_POLICY_SQL: &str = include_str!("sql/upsert_policy.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCashbackRepository;

impl PgCashbackRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_policy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<CashbackPolicyRecord>, sqlx::Error> {
        query_as::<Postgres, CashbackPolicyRecord>(GET_POLICY_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_policy(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        policy: CashbackPolicy,
    ) -> Result<CashbackPolicyRecord, sqlx::Error> {
        query_as::<Postgres, CashbackPolicyRecord>(UPSERT_POLICY_SQL)
            .bind(i16::from(policy.redemption_rate.value()))
            .bind(policy.minimum_balance_to_redeem)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CashbackPolicyRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            policy: CashbackPolicy {
                redemption_rate: try_get_percent(row, "redemption_rate")?,
                minimum_balance_to_redeem: row.try_get("minimum_balance_to_redeem")?,
            },
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
