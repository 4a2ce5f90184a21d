//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use storefront::{
    catalog::ProductLine,
    pricing::{PricingInputs, PricingRequest, price_order},
    promocodes::{PromocodeOutcome, requested_name},
};
use tracing::{Span, info, warn};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        cashback::repository::PgCashbackRepository,
        orders::{
            data::PlaceOrder,
            delivery::DeliveryStatus,
            errors::{OrderValidationError, OrdersServiceError},
            notify::dispatch_order_notifications,
            records::{OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
        },
        products::{records::ProductRecord, repository::PgProductsRepository},
        promocodes::{records::PromocodeRecord, repository::PgPromocodesRepository},
        users::{records::UserUuid, repository::PgUsersRepository},
    },
    notifications::NotificationDispatcher,
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    users: PgUsersRepository,
    products: PgProductsRepository,
    promocodes: PgPromocodesRepository,
    cashback: PgCashbackRepository,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            users: PgUsersRepository::new(),
            products: PgProductsRepository::new(),
            promocodes: PgPromocodesRepository::new(),
            cashback: PgCashbackRepository::new(),
            dispatcher,
        }
    }
}

fn validate(order: &PlaceOrder) -> Result<(), OrderValidationError> {
    if order.basket.is_empty() {
        return Err(OrderValidationError::EmptyBasket);
    }

    if order.delivery.delivery_notification.is_some() && order.delivery.delivery_date.is_none() {
        return Err(OrderValidationError::MissingDeliveryDate);
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            user_uuid = %order.user,
            requested_products = order.basket.len(),
            redeem_cashback = order.redeem_cashback,
            total_price = tracing::field::Empty,
            promocode = tracing::field::Empty
        ),
        err
    )]
    async fn place_order(
        &self,
        order: PlaceOrder,
        point_in_time: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError> {
        validate(&order)?;

        let today = point_in_time.to_zoned(TimeZone::UTC).date();

        let mut tx = self.db.begin_transaction().await?;

        let user = self
            .users
            .lock_user(&mut tx, order.user)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => OrdersServiceError::UserNotFound,
                error => error.into(),
            })?;

        let requested: Vec<Uuid> = order.basket.products().collect();

        let lines: Vec<ProductLine> = self
            .products
            .find_products(&mut tx, &requested, point_in_time)
            .await?
            .iter()
            .map(ProductRecord::to_product_line)
            .collect();

        let promocode_name = requested_name(order.promocode.as_deref());

        let promocode = match promocode_name {
            Some(name) => self
                .promocodes
                .find_by_name(&mut tx, name)
                .await?
                .as_ref()
                .map(PromocodeRecord::to_promocode),
            None => None,
        };

        let policy = self
            .cashback
            .get_policy(&mut tx)
            .await?
            .map(|record| record.policy);

        let priced = price_order(
            &PricingRequest {
                basket: &order.basket,
                promocode: promocode_name,
                redeem_cashback: order.redeem_cashback,
            },
            &PricingInputs {
                lines: &lines,
                promocode: promocode.as_ref(),
                cashback_policy: policy.as_ref(),
                cashback_balance: user.cashback_balance,
                now: point_in_time,
                today,
            },
        )?;

        if priced.lines.is_empty() {
            return Err(OrderValidationError::NoKnownProducts.into());
        }

        if !priced.unresolved.is_empty() {
            warn!(
                unresolved = ?priced.unresolved,
                "skipping products missing from the catalog"
            );
        }

        match &priced.promocode {
            PromocodeOutcome::NotStackable { name } => {
                info!(promocode = %name, "promocode does not stack with product discounts, ignored");
            }
            PromocodeOutcome::Expired { name } => {
                info!(promocode = %name, "promocode has expired, ignored");
            }
            PromocodeOutcome::NotRequested | PromocodeOutcome::Applied { .. } => {}
        }

        let record = self.orders.create_order(&mut tx, &order, &priced).await?;

        if priced.cashback.is_some() {
            self.users
                .update_cashback_balance(
                    &mut tx,
                    user.uuid,
                    priced.cashback_balance_after(user.cashback_balance),
                )
                .await?;
        }

        tx.commit().await?;

        let span = Span::current();

        span.record("total_price", record.total_price);

        if let Some(name) = &record.promocode {
            span.record("promocode", tracing::field::display(name));
        }

        info!(
            order_uuid = %record.uuid,
            total_price = record.total_price,
            cashback_spent = %record.cashback_spent,
            cashback_earned = %record.cashback_earned,
            "placed order"
        );

        dispatch_order_notifications(self.dispatcher.as_ref(), &record);

        Ok(record)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let order = self.orders.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_orders(&mut tx, user).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.mark_delivery_notification_sent",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn mark_delivery_notification_sent(
        &self,
        order: OrderUuid,
    ) -> Result<bool, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        if self.orders.lock_delivery_notification(&mut tx, order).await? {
            return Ok(false);
        }

        self.orders
            .mark_delivery_notification_sent(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn due_delivery_reminders(
        &self,
        now: Timestamp,
        limit: u32,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self
            .orders
            .list_due_delivery_reminders(&mut tx, now, i64::from(limit))
            .await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.reset_delivery_notification_sent",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn reset_delivery_notification_sent(
        &self,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        if self
            .orders
            .reset_delivery_notification_sent(&mut tx, order)
            .await?
            == 0
        {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "orders.service.update_delivery_status",
        skip(self),
        fields(order_uuid = %order, delivery_status = %status),
        err
    )]
    async fn update_delivery_status(
        &self,
        order: OrderUuid,
        status: DeliveryStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .orders
            .update_delivery_status(&mut tx, order, status)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, delivery_status = %status, "updated delivery status");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Prices and persists an order, updating the user's cashback balance.
    ///
    /// Nothing is written unless every step succeeds. Notifications are queued after the
    /// order is committed; failing to queue them does not fail the order.
    async fn place_order(
        &self,
        order: PlaceOrder,
        point_in_time: Timestamp,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// A user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Claims the delivery reminder by flagging it as sent. Returns `false` if another
    /// sender already holds it.
    async fn mark_delivery_notification_sent(
        &self,
        order: OrderUuid,
    ) -> Result<bool, OrdersServiceError>;

    /// Up to `limit` orders whose reminder is due at `now` and not yet sent.
    async fn due_delivery_reminders(
        &self,
        now: Timestamp,
        limit: u32,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Releases a claimed reminder after its email could not be sent.
    async fn reset_delivery_notification_sent(
        &self,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError>;

    /// Moves an order along its delivery lifecycle.
    async fn update_delivery_status(
        &self,
        order: OrderUuid,
        status: DeliveryStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, ToSpan, Unit, civil::date};
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use storefront::{basket::BasketRequest, cashback::CashbackPolicy, percent::Percent};
    use testresult::TestResult;

    use crate::{
        domain::{
            cashback::CashbackService,
            orders::delivery::{DeliveryMethod, NotificationLead},
            promocodes::{
                PromocodesService, data::NewPromocode, records::PromocodeUuid,
            },
            users::UsersService,
        },
        notifications::{MockNotificationDispatcher, NotificationKind},
        test::{
            TestContext,
            helpers::{
                create_discounted_product, create_product, create_user, place_order,
                set_cashback_balance,
            },
        },
    };

    use super::*;

    /// A service whose pool never connects; only usable for checks that run before any I/O.
    fn offline_service() -> TestResult<PgOrdersService> {
        let pool = PgPool::connect_lazy("postgres://storefront@localhost/unused")?;

        Ok(PgOrdersService::new(
            Db::new(pool),
            Arc::new(MockNotificationDispatcher::new()),
        ))
    }

    /// Kettle at 1000 with a live 20% discount.
    async fn discounted_kettle(ctx: &TestContext) -> TestResult<ProductRecord> {
        let expires_at = Timestamp::now().round(Unit::Second)?.checked_add(48.hours())?;

        Ok(create_discounted_product(ctx, "Kettle", 1000, Percent::new(20)?, expires_at).await?)
    }

    async fn save10(ctx: &TestContext, stackable: bool) -> TestResult {
        ctx.promocodes
            .create_promocode(NewPromocode {
                uuid: PromocodeUuid::new(),
                name: "SAVE10".to_string(),
                percent: Percent::new(10)?,
                expires_on: date(2099, 12, 31),
                stackable,
            })
            .await?;

        Ok(())
    }

    fn two_of(product: &ProductRecord) -> TestResult<BasketRequest> {
        Ok(BasketRequest::try_from_iter([(product.uuid.into_uuid(), 2)])?)
    }

    #[tokio::test]
    async fn empty_basket_is_rejected_before_touching_the_database() -> TestResult {
        let service = offline_service()?;
        let order = place_order(UserUuid::new(), BasketRequest::default());

        let result = service.place_order(order, Timestamp::now()).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(OrderValidationError::EmptyBasket))
            ),
            "expected EmptyBasket, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reminder_without_delivery_date_is_rejected() -> TestResult {
        let service = offline_service()?;
        let basket = BasketRequest::try_from_iter([(Uuid::now_v7(), 1)])?;

        let mut order = place_order(UserUuid::new(), basket);
        order.delivery.delivery_notification = Some(NotificationLead::OneHour);

        let result = service.place_order(order, Timestamp::now()).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(
                    OrderValidationError::MissingDeliveryDate
                ))
            ),
            "expected MissingDeliveryDate, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn active_discount_prices_the_order() -> TestResult {
        let mut ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        let order = ctx
            .orders
            .place_order(place_order(user.uuid, two_of(&kettle)?), Timestamp::now())
            .await?;

        assert_eq!(order.total_price, 1600);
        assert_eq!(order.total_item_count, 2);
        assert_eq!(order.items.len(), 1);
        assert!(order.items[0].discount_applied);
        assert_eq!(order.items[0].effective_unit_price, Decimal::from(800));

        let notifications = ctx.drain_notifications();

        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::OrderPlaced);
        assert_eq!(notifications[0].order, order.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn expired_discount_charges_full_price() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let expired_at = Timestamp::now().round(Unit::Second)?.checked_sub(1.hour())?;
        let kettle =
            create_discounted_product(&ctx, "Kettle", 1000, Percent::new(20)?, expired_at).await?;

        let order = ctx
            .orders
            .place_order(
                place_order(
                    user.uuid,
                    BasketRequest::try_from_iter([(kettle.uuid.into_uuid(), 1)])?,
                ),
                Timestamp::now(),
            )
            .await?;

        assert_eq!(order.total_price, 1000);
        assert!(!order.items[0].discount_applied);

        Ok(())
    }

    #[tokio::test]
    async fn cashback_redemption_updates_the_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        ctx.cashback
            .set_policy(CashbackPolicy {
                redemption_rate: Percent::new(90)?,
                minimum_balance_to_redeem: Decimal::from(500),
            })
            .await?;

        set_cashback_balance(&ctx, user.uuid, Decimal::from(2000)).await?;

        let mut request = place_order(user.uuid, two_of(&kettle)?);
        request.redeem_cashback = true;

        let order = ctx.orders.place_order(request, Timestamp::now()).await?;

        assert_eq!(order.total_price, 1);
        assert_eq!(order.cashback_spent, Decimal::from(1599));
        assert_eq!(order.cashback_earned, Decimal::new(1, 1));

        let user = ctx.users.get_user(user.uuid).await?;

        assert_eq!(user.cashback_balance, Decimal::new(4011, 1));

        Ok(())
    }

    #[tokio::test]
    async fn stackable_promocode_is_applied_and_recorded() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        save10(&ctx, true).await?;

        let mut request = place_order(user.uuid, two_of(&kettle)?);
        request.promocode = Some(" SAVE10 ".to_string());

        let order = ctx.orders.place_order(request, Timestamp::now()).await?;

        assert_eq!(order.total_price, 1440);
        assert_eq!(order.promocode.as_deref(), Some("SAVE10"));

        Ok(())
    }

    #[tokio::test]
    async fn non_stackable_promocode_is_ignored() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        save10(&ctx, false).await?;

        let mut request = place_order(user.uuid, two_of(&kettle)?);
        request.promocode = Some("SAVE10".to_string());

        let order = ctx.orders.place_order(request, Timestamp::now()).await?;

        assert_eq!(order.total_price, 1600);
        assert_eq!(order.promocode, None);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_promocode_leaves_no_trace() -> TestResult {
        let mut ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        ctx.cashback
            .set_policy(CashbackPolicy {
                redemption_rate: Percent::new(90)?,
                minimum_balance_to_redeem: Decimal::ZERO,
            })
            .await?;

        set_cashback_balance(&ctx, user.uuid, Decimal::from(2000)).await?;

        let mut request = place_order(user.uuid, two_of(&kettle)?);
        request.promocode = Some("SAVE10".to_string());
        request.redeem_cashback = true;

        let result = ctx.orders.place_order(request, Timestamp::now()).await;

        assert!(
            matches!(&result, Err(OrdersServiceError::PromocodeNotFound(name)) if name == "SAVE10"),
            "expected PromocodeNotFound, got {result:?}"
        );

        assert!(ctx.orders.list_orders(user.uuid).await?.is_empty());
        assert_eq!(
            ctx.users.get_user(user.uuid).await?.cashback_balance,
            Decimal::from(2000)
        );
        assert!(ctx.drain_notifications().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_products_count_but_are_not_charged() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let mug = create_product(&ctx, "Mug", 500).await?;

        let basket =
            BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 2), (Uuid::now_v7(), 3)])?;

        let order = ctx
            .orders
            .place_order(place_order(user.uuid, basket), Timestamp::now())
            .await?;

        assert_eq!(order.total_price, 1000);
        assert_eq!(order.total_item_count, 5);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product, mug.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn basket_of_only_unknown_products_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;

        let basket = BasketRequest::try_from_iter([(Uuid::now_v7(), 1)])?;

        let result = ctx
            .orders
            .place_order(place_order(user.uuid, basket), Timestamp::now())
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Validation(OrderValidationError::NoKnownProducts))
            ),
            "expected NoKnownProducts, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_returns_user_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let mug = create_product(&ctx, "Mug", 500).await?;

        let basket = BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 1)])?;

        let result = ctx
            .orders
            .place_order(place_order(UserUuid::new(), basket), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::UserNotFound)),
            "expected UserNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delivery_reminder_is_scheduled_and_marked_once() -> TestResult {
        let mut ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let mug = create_product(&ctx, "Mug", 500).await?;
        let delivery_date: Timestamp = "2099-06-02T18:00:00Z".parse()?;

        let mut request = place_order(
            user.uuid,
            BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 1)])?,
        );
        request.delivery.delivery_method = DeliveryMethod::Courier;
        request.delivery.delivery_address = "1 Main St".to_string();
        request.delivery.delivery_date = Some(delivery_date);
        request.delivery.delivery_notification = Some(NotificationLead::OneDay);

        let order = ctx.orders.place_order(request, Timestamp::now()).await?;

        let notifications = ctx.drain_notifications();

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[1].kind, NotificationKind::DeliveryReminder);
        assert_eq!(
            notifications[1].scheduled_at,
            Some(delivery_date.checked_sub(SignedDuration::from_hours(24))?)
        );

        assert!(ctx.orders.mark_delivery_notification_sent(order.uuid).await?);
        assert!(!ctx.orders.mark_delivery_notification_sent(order.uuid).await?);
        assert!(ctx.orders.get_order(order.uuid).await?.delivery_notification_sent);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_orders_settle_cashback_as_if_placed_one_after_another() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let mug = create_product(&ctx, "Mug", 600).await?;

        ctx.cashback
            .set_policy(CashbackPolicy {
                redemption_rate: Percent::new(90)?,
                minimum_balance_to_redeem: Decimal::ZERO,
            })
            .await?;

        set_cashback_balance(&ctx, user.uuid, Decimal::from(1000)).await?;

        let request = || -> TestResult<PlaceOrder> {
            let mut request = place_order(
                user.uuid,
                BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 1)])?,
            );
            request.redeem_cashback = true;

            Ok(request)
        };

        let (first, second) = tokio::join!(
            ctx.orders.place_order(request()?, Timestamp::now()),
            ctx.orders.place_order(request()?, Timestamp::now()),
        );

        let (first, second) = (first?, second?);

        // One after the other: 1000 covers 599 of the first mug and leaves 401 + 0.1 earned,
        // which the second mug spends in full before earning 10% of the remaining 198.9.
        let mut spent = [first.cashback_spent, second.cashback_spent];
        spent.sort();

        assert_eq!(spent, [Decimal::new(4011, 1), Decimal::from(599)]);

        let user = ctx.users.get_user(user.uuid).await?;

        assert_eq!(user.cashback_balance, Decimal::new(1989, 2));

        Ok(())
    }

    #[tokio::test]
    async fn due_reminders_are_listed_until_claimed() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let mug = create_product(&ctx, "Mug", 500).await?;
        let now = Timestamp::now().round(Unit::Second)?;

        let reminded = |delivery_date: Timestamp| -> TestResult<PlaceOrder> {
            let mut request = place_order(
                user.uuid,
                BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 1)])?,
            );
            request.delivery.delivery_date = Some(delivery_date);
            request.delivery.delivery_notification = Some(NotificationLead::OneDay);

            Ok(request)
        };

        let due = ctx
            .orders
            .place_order(reminded(now.checked_add(2.hours())?)?, now)
            .await?;

        ctx.orders
            .place_order(reminded("2099-06-02T18:00:00Z".parse()?)?, now)
            .await?;

        ctx.orders
            .place_order(
                place_order(
                    user.uuid,
                    BasketRequest::try_from_iter([(mug.uuid.into_uuid(), 1)])?,
                ),
                now,
            )
            .await?;

        let listed = ctx.orders.due_delivery_reminders(now, 10).await?;

        assert_eq!(listed, vec![due.clone()]);

        assert!(ctx.orders.mark_delivery_notification_sent(due.uuid).await?);
        assert!(ctx.orders.due_delivery_reminders(now, 10).await?.is_empty());

        ctx.orders.reset_delivery_notification_sent(due.uuid).await?;

        let listed = ctx.orders.due_delivery_reminders(now, 10).await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].uuid, due.uuid);
        assert!(!listed[0].delivery_notification_sent);

        Ok(())
    }

    #[tokio::test]
    async fn reset_unknown_reminder_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .reset_delivery_notification_sent(OrderUuid::new())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_order_returns_stored_totals_and_items() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        let placed = ctx
            .orders
            .place_order(place_order(user.uuid, two_of(&kettle)?), Timestamp::now())
            .await?;

        let fetched = ctx.orders.get_order(placed.uuid).await?;

        assert_eq!(fetched, placed);
        assert_eq!(ctx.orders.list_orders(user.uuid).await?, vec![placed]);

        Ok(())
    }

    #[tokio::test]
    async fn update_delivery_status_keeps_totals() -> TestResult {
        let ctx = TestContext::new().await;
        let user = create_user(&ctx, "ada@example.com").await?;
        let kettle = discounted_kettle(&ctx).await?;

        let placed = ctx
            .orders
            .place_order(place_order(user.uuid, two_of(&kettle)?), Timestamp::now())
            .await?;

        let updated = ctx
            .orders
            .update_delivery_status(placed.uuid, DeliveryStatus::OnTheWay)
            .await?;

        assert_eq!(updated.delivery_status, DeliveryStatus::OnTheWay);
        assert_eq!(updated.total_price, placed.total_price);
        assert_eq!(updated.items, placed.items);

        Ok(())
    }

    #[tokio::test]
    async fn get_order_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.get_order(OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
