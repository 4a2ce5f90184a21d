//! Orders Repository

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use storefront::pricing::{PricedLine, PricedOrder};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, quantity_to_i32, try_get_amount, try_get_quantity},
    domain::{
        orders::{
            data::PlaceOrder,
            delivery::{DeliveryStatus, NotificationLead},
            records::{OrderItemRecord, OrderRecord, OrderUuid},
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const LIST_DUE_DELIVERY_REMINDERS_SQL: &str =
    include_str!("sql/list_due_delivery_reminders.sql");
const LOCK_DELIVERY_NOTIFICATION_SQL: &str = include_str!("sql/lock_delivery_notification.sql");
const MARK_DELIVERY_NOTIFICATION_SENT_SQL: &str =
    include_str!("sql/mark_delivery_notification_sent.sql");
const RESET_DELIVERY_NOTIFICATION_SENT_SQL: &str =
    include_str!("sql/reset_delivery_notification_sent.sql");
const UPDATE_DELIVERY_STATUS_SQL: &str = include_str!("sql/update_delivery_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    #[tracing::instrument(
        name = "orders.repository.create_order",
        skip(self, tx, order, priced),
        fields(order_uuid = %order.uuid, line_count = priced.lines.len()),
        err
    )]
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &PlaceOrder,
        priced: &PricedOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let (cashback_spent, cashback_earned) =
            priced
                .cashback
                .map_or((Decimal::ZERO, Decimal::ZERO), |settlement| {
                    (settlement.points_spent, settlement.points_earned)
                });

        let delivery = &order.delivery;

        let mut record = query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(amount_to_i64(priced.total_price, "total_price")?)
            .bind(amount_to_i64(priced.total_item_count, "total_item_count")?)
            .bind(priced.amount)
            .bind(priced.promocode.applied_name())
            .bind(cashback_spent)
            .bind(cashback_earned)
            .bind(delivery.delivery_method.as_str())
            .bind(delivery.payment_method.as_str())
            .bind(delivery.payment_status.as_str())
            .bind(DeliveryStatus::InProcess.as_str())
            .bind(&delivery.delivery_address)
            .bind(&delivery.comment)
            .bind(delivery.delivery_date.map(SqlxTimestamp::from))
            .bind(delivery.delivery_notification.map(NotificationLead::hours))
            .fetch_one(&mut **tx)
            .await?;

        record.items = self
            .create_order_items(tx, order.uuid, &priced.lines)
            .await?;

        Ok(record)
    }

    async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: &[PricedLine],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let items = lines
            .iter()
            .map(|line| OrderItemRecord {
                product: ProductUuid::from_uuid(line.product),
                quantity: line.quantity,
                unit_price: line.unit_price,
                effective_unit_price: line.effective_unit_price,
                discount_applied: line.discount_applied,
            })
            .collect::<Vec<_>>();

        let products: Vec<Uuid> = items.iter().map(|item| item.product.into_uuid()).collect();
        let effective_unit_prices: Vec<Decimal> =
            items.iter().map(|item| item.effective_unit_price).collect();
        let discounts_applied: Vec<bool> = items.iter().map(|item| item.discount_applied).collect();

        let quantities = items
            .iter()
            .map(|item| quantity_to_i32(item.quantity))
            .collect::<Result<Vec<_>, _>>()?;

        let unit_prices = items
            .iter()
            .map(|item| amount_to_i64(item.unit_price, "unit_price"))
            .collect::<Result<Vec<_>, _>>()?;

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(&products)
            .bind(&quantities)
            .bind(&unit_prices)
            .bind(&effective_unit_prices)
            .bind(&discounts_applied)
            .execute(&mut **tx)
            .await?;

        Ok(items)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.items = self
            .list_order_items(tx, &[order.into_uuid()])
            .await?
            .remove(&order.into_uuid())
            .unwrap_or_default();

        Ok(record)
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, &mut orders).await?;

        Ok(orders)
    }

    /// Orders whose delivery reminder is due at `now` but has not gone out, soonest delivery
    /// first. Orders already delivered by `now` are left out.
    pub(crate) async fn list_due_delivery_reminders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        let mut orders = query_as::<Postgres, OrderRecord>(LIST_DUE_DELIVERY_REMINDERS_SQL)
            .bind(SqlxTimestamp::from(now))
            .bind(limit)
            .fetch_all(&mut **tx)
            .await?;

        self.attach_items(tx, &mut orders).await?;

        Ok(orders)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let mut items = self.list_order_items(tx, &uuids).await?;

        for order in orders {
            order.items = items.remove(&order.uuid.into_uuid()).unwrap_or_default();
        }

        Ok(())
    }

    async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[Uuid],
    ) -> Result<FxHashMap<Uuid, Vec<OrderItemRecord>>, sqlx::Error> {
        let mut items: FxHashMap<Uuid, Vec<OrderItemRecord>> = FxHashMap::default();

        if orders.is_empty() {
            return Ok(items);
        }

        let rows = query(LIST_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await?;

        for row in &rows {
            let order: Uuid = row.try_get("order_uuid")?;

            items
                .entry(order)
                .or_default()
                .push(OrderItemRecord::from_row(row)?);
        }

        Ok(items)
    }

    /// Locks the order row and reports whether its reminder has gone out.
    pub(crate) async fn lock_delivery_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(LOCK_DELIVERY_NOTIFICATION_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_delivery_notification_sent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_DELIVERY_NOTIFICATION_SENT_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn reset_delivery_notification_sent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESET_DELIVERY_NOTIFICATION_SENT_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_delivery_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: DeliveryStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, OrderRecord>(UPDATE_DELIVERY_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        record.items = self
            .list_order_items(tx, &[order.into_uuid()])
            .await?
            .remove(&order.into_uuid())
            .unwrap_or_default();

        Ok(record)
    }
}

fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let delivery_notification = row
            .try_get::<Option<i16>, _>("delivery_notification_hours")?
            .map(NotificationLead::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "delivery_notification_hours".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user: UserUuid::from_uuid(row.try_get("user_uuid")?),
            items: Vec::new(),
            total_price: try_get_amount(row, "total_price")?,
            total_item_count: try_get_amount(row, "total_item_count")?,
            amount: row.try_get("amount")?,
            promocode: row.try_get("promocode")?,
            cashback_spent: row.try_get("cashback_spent")?,
            cashback_earned: row.try_get("cashback_earned")?,
            delivery_method: try_get_parsed(row, "delivery_method")?,
            payment_method: try_get_parsed(row, "payment_method")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            delivery_status: try_get_parsed(row, "delivery_status")?,
            delivery_address: row.try_get("delivery_address")?,
            comment: row.try_get("comment")?,
            delivery_date: row
                .try_get::<Option<SqlxTimestamp>, _>("delivery_date")?
                .map(SqlxTimestamp::to_jiff),
            delivery_notification,
            delivery_notification_sent: row.try_get("delivery_notification_sent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
            effective_unit_price: row.try_get("effective_unit_price")?,
            discount_applied: row.try_get("discount_applied")?,
        })
    }
}
