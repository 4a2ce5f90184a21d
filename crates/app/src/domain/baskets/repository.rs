//! Basket Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{quantity_to_i32, try_get_quantity},
    domain::{
        baskets::{data::NewBasketItem, records::BasketItemRecord},
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const LIST_ITEMS_SQL: &str = include_str!("sql/list_items.sql");
const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const DELETE_ITEM_SQL: &str = include_str!("sql/delete_item.sql");
const UPDATE_QUANTITY_SQL: &str = include_str!("sql/update_quantity.sql");
const ITEM_EXISTS_SQL: &str = include_str!("sql/item_exists.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBasketsRepository;

impl PgBasketsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<BasketItemRecord>, sqlx::Error> {
        query_as::<Postgres, BasketItemRecord>(LIST_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        item: NewBasketItem,
    ) -> Result<BasketItemRecord, sqlx::Error> {
        query_as::<Postgres, BasketItemRecord>(CREATE_ITEM_SQL)
            .bind(user.into_uuid())
            .bind(item.product.into_uuid())
            .bind(quantity_to_i32(item.quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Compare-and-set on the stored quantity. `None` when nothing matched.
    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        expected: u32,
        quantity: u32,
    ) -> Result<Option<BasketItemRecord>, sqlx::Error> {
        query_as::<Postgres, BasketItemRecord>(UPDATE_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity_to_i32(expected)?)
            .bind(quantity_to_i32(quantity)?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn item_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ITEM_EXISTS_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for BasketItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
