use clap::Args;
use jiff::Timestamp;
use storefront::percent::Percent;
use storefront_app::{
    config::DatabaseConfig,
    domain::products::{
        PgProductsService, ProductsService,
        data::{NewDiscount, NewProduct},
        records::{DiscountUuid, ProductUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Product display name
    #[arg(long)]
    name: String,

    /// Unit price in minor units
    #[arg(long)]
    price: u64,

    /// Discount percentage (0-100)
    #[arg(long, requires = "discount_expires_at")]
    discount_percent: Option<u8>,

    /// Instant the discount stops applying, e.g. 2024-12-31T23:59:59Z
    #[arg(long, requires = "discount_percent")]
    discount_expires_at: Option<Timestamp>,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<ProductUuid>,

    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let discount = match (args.discount_percent, args.discount_expires_at) {
        (Some(percent), Some(expires_at)) => Some(NewDiscount {
            uuid: DiscountUuid::new(),
            percent: Percent::new(percent).map_err(|error| error.to_string())?,
            expires_at,
        }),
        _ => None,
    };

    let db = crate::cli::connect(&args.database.database_url).await?;

    let product = PgProductsService::new(db)
        .create_product(NewProduct {
            uuid: args.product_uuid.unwrap_or_default(),
            name: args.name,
            price: args.price,
            discount,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("product_price: {}", product.price);

    if let Some(discount) = product.discount {
        println!("discount: {} until {}", discount.percent, discount.expires_at);
    }

    Ok(())
}
