use std::time::Duration;

use clap::Args;
use jiff::Timestamp;
use storefront::basket::BasketRequest;
use storefront_app::{
    config::{DatabaseConfig, NotificationConfig},
    context::AppContext,
    domain::{
        baskets::records::basket_request,
        orders::{
            data::{DeliveryDetails, PlaceOrder},
            delivery::{DeliveryMethod, NotificationLead, PaymentMethod, PaymentStatus},
            records::{OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    },
};
use tokio::sync::oneshot;
use tracing::warn;

#[derive(Debug, Args)]
pub(crate) struct PlaceOrderArgs {
    /// Customer placing the order
    #[arg(long)]
    user_uuid: UserUuid,

    /// Requested product as PRODUCT_UUID=QUANTITY; repeat for more products
    #[arg(long = "item", value_name = "PRODUCT_UUID=QUANTITY", required_unless_present = "from_basket")]
    items: Vec<String>,

    /// Order whatever is in the user's stored basket
    #[arg(long, conflicts_with = "items")]
    from_basket: bool,

    /// Promocode to apply
    #[arg(long)]
    promocode: Option<String>,

    /// Spend cashback points on this order
    #[arg(long)]
    redeem_cashback: bool,

    /// pickup or courier
    #[arg(long, default_value = "pickup")]
    delivery_method: DeliveryMethod,

    /// card or cash
    #[arg(long, default_value = "card")]
    payment_method: PaymentMethod,

    /// paid or waiting
    #[arg(long, default_value = "waiting")]
    payment_status: PaymentStatus,

    #[arg(long, default_value = "")]
    delivery_address: String,

    #[arg(long, default_value = "")]
    comment: String,

    /// Requested delivery instant, e.g. 2024-06-02T18:00:00Z
    #[arg(long)]
    delivery_date: Option<Timestamp>,

    /// Reminder lead time before delivery: 1h, 6h or 24h
    #[arg(long, requires = "delivery_date")]
    delivery_notification: Option<NotificationLead>,

    /// Optional order UUID; generated when omitted
    #[arg(long)]
    order_uuid: Option<OrderUuid>,

    /// Seconds to wait for confirmation emails before exiting
    #[arg(long, default_value_t = 30)]
    drain_timeout_seconds: u64,

    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    notifications: NotificationConfig,
}

fn parse_items(items: &[String]) -> Result<BasketRequest, String> {
    let pairs = items
        .iter()
        .map(|item| {
            item.split_once('=')
                .ok_or_else(|| format!("expected PRODUCT_UUID=QUANTITY, got `{item}`"))
        })
        .collect::<Result<Vec<_>, String>>()?;

    BasketRequest::parse(pairs).map_err(|error| error.to_string())
}

fn print_order(order: &OrderRecord) {
    println!("order_uuid: {}", order.uuid);
    println!("total_price: {}", order.total_price);
    println!("total_item_count: {}", order.total_item_count);

    if let Some(promocode) = &order.promocode {
        println!("promocode: {promocode}");
    }

    println!("cashback_spent: {}", order.cashback_spent);
    println!("cashback_earned: {}", order.cashback_earned);

    for item in &order.items {
        println!(
            "item: {} x{} at {} (discounted: {})",
            item.product, item.quantity, item.effective_unit_price, item.discount_applied
        );
    }
}

pub(crate) async fn run(args: PlaceOrderArgs) -> Result<(), String> {
    let (context, worker) =
        AppContext::from_database_url(&args.database.database_url, &args.notifications)
            .await
            .map_err(|error| format!("failed to initialise application: {error}"))?;

    let (shutdown, signal) = oneshot::channel();
    let worker = tokio::spawn(worker.run(signal));

    let basket = if args.from_basket {
        let items = context
            .baskets
            .list_items(args.user_uuid)
            .await
            .map_err(|error| format!("failed to load basket: {error}"))?;

        basket_request(&items).map_err(|error| error.to_string())?
    } else {
        parse_items(&args.items)?
    };

    let placed = context
        .orders
        .place_order(
            PlaceOrder {
                uuid: args.order_uuid.unwrap_or_default(),
                user: args.user_uuid,
                basket,
                promocode: args.promocode,
                redeem_cashback: args.redeem_cashback,
                delivery: DeliveryDetails {
                    delivery_method: args.delivery_method,
                    payment_method: args.payment_method,
                    payment_status: args.payment_status,
                    delivery_address: args.delivery_address,
                    comment: args.comment,
                    delivery_date: args.delivery_date,
                    delivery_notification: args.delivery_notification,
                },
            },
            Timestamp::now(),
        )
        .await;

    _ = shutdown.send(());

    let drain = Duration::from_secs(args.drain_timeout_seconds);

    if tokio::time::timeout(drain, worker).await.is_err() {
        warn!(?drain, "timed out waiting for notifications to be delivered");
    }

    let order = placed.map_err(|error| format!("failed to place order: {error}"))?;

    print_order(&order);

    Ok(())
}
