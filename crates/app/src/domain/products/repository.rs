//! Products Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount, try_get_percent},
    domain::products::{
        data::{NewDiscount, NewProduct},
        records::{DiscountRecord, DiscountUuid, ProductRecord, ProductUuid},
    },
};

const CREATE_DISCOUNT_SQL: &str = include_str!("sql/create_discount.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const FIND_PRODUCTS_SQL: &str = include_str!("sql/find_products.sql");
const LIST_DISCOUNTED_PRODUCTS_SQL: &str = include_str!("sql/list_discounted_products.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: NewDiscount,
    ) -> Result<DiscountRecord, sqlx::Error> {
        query(CREATE_DISCOUNT_SQL)
            .bind(discount.uuid.into_uuid())
            .bind(i16::from(discount.percent.value()))
            .bind(SqlxTimestamp::from(discount.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(DiscountRecord {
            uuid: discount.uuid,
            percent: discount.percent,
            expires_at: discount.expires_at,
        })
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
        discount: Option<DiscountRecord>,
    ) -> Result<ProductRecord, sqlx::Error> {
        let price_i64 = amount_to_i64(product.price, "price")?;

        let (created_uuid, created_at, updated_at, deleted_at): (
            Uuid,
            SqlxTimestamp,
            SqlxTimestamp,
            Option<SqlxTimestamp>,
        ) = query_as(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(price_i64)
            .bind(discount.map(|discount| discount.uuid.into_uuid()))
            .fetch_one(&mut **tx)
            .await?;

        Ok(ProductRecord {
            uuid: ProductUuid::from_uuid(created_uuid),
            name: product.name,
            price: product.price,
            discount,
            created_at: created_at.to_jiff(),
            updated_at: updated_at.to_jiff(),
            deleted_at: deleted_at.map(SqlxTimestamp::to_jiff),
        })
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Live products whose discount is still running at `point_in_time`, deepest first.
    pub(crate) async fn list_discounted_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_DISCOUNTED_PRODUCTS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Products among `products` that exist at `point_in_time`; unknown ids are left out.
    pub(crate) async fn find_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[Uuid],
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        query_as::<Postgres, ProductRecord>(FIND_PRODUCTS_SQL)
            .bind(products)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount = match row.try_get::<Option<Uuid>, _>("discount_uuid")? {
            Some(uuid) => Some(DiscountRecord {
                uuid: DiscountUuid::from_uuid(uuid),
                percent: try_get_percent(row, "discount_percent")?,
                expires_at: row
                    .try_get::<SqlxTimestamp, _>("discount_expires_at")?
                    .to_jiff(),
            }),
            None => None,
        };

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            discount,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
