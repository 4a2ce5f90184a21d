//! Promocodes Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_get_percent,
    domain::promocodes::{
        data::NewPromocode,
        records::{PromocodeRecord, PromocodeUuid},
    },
};

const CREATE_PROMOCODE_SQL: &str = include_str!("sql/create_promocode.sql");
const GET_PROMOCODE_BY_NAME_SQL: &str = include_str!("sql/get_promocode_by_name.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromocodesRepository;

impl PgPromocodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_promocode(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promocode: NewPromocode,
    ) -> Result<PromocodeRecord, sqlx::Error> {
        query_as::<Postgres, PromocodeRecord>(CREATE_PROMOCODE_SQL)
            .bind(promocode.uuid.into_uuid())
            .bind(promocode.name.trim())
            .bind(i16::from(promocode.percent.value()))
            .bind(SqlxDate::from(promocode.expires_on))
            .bind(promocode.stackable)
            .fetch_one(&mut **tx)
            .await
    }

    /// Looks a promocode up by its exact name.
    pub(crate) async fn find_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<PromocodeRecord>, sqlx::Error> {
        query_as::<Postgres, PromocodeRecord>(GET_PROMOCODE_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PromocodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PromocodeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            percent: try_get_percent(row, "percent")?,
            expires_on: row.try_get::<SqlxDate, _>("expires_on")?.to_jiff(),
            stackable: row.try_get("stackable")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
