//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::users::{
    data::NewUser,
    records::{UserRecord, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const LIST_DIGEST_SUBSCRIBERS_SQL: &str = include_str!("sql/list_digest_subscribers.sql");
const LOCK_USER_SQL: &str = include_str!("sql/lock_user.sql");
const SET_WEEKLY_DISCOUNT_DIGEST_SQL: &str = include_str!("sql/set_weekly_discount_digest.sql");
const UPDATE_CASHBACK_BALANCE_SQL: &str = include_str!("sql/update_cashback_balance.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUser,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.email)
            .bind(user.name)
            .bind(user.weekly_discount_digest)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_digest_subscribers(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<UserRecord>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LIST_DIGEST_SUBSCRIBERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_weekly_discount_digest(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        enabled: bool,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(SET_WEEKLY_DISCOUNT_DIGEST_SQL)
            .bind(user.into_uuid())
            .bind(enabled)
            .fetch_one(&mut **tx)
            .await
    }

    /// Reads the user and holds its row lock until `tx` ends.
    pub(crate) async fn lock_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(LOCK_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_cashback_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        balance: Decimal,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CASHBACK_BALANCE_SQL)
            .bind(user.into_uuid())
            .bind(balance)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            cashback_balance: row.try_get("cashback_balance")?,
            weekly_discount_digest: row.try_get("weekly_discount_digest")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
