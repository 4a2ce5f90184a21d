//! Test Helpers

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::{basket::BasketRequest, percent::Percent};

use crate::{
    domain::{
        orders::{
            data::{DeliveryDetails, PlaceOrder},
            records::OrderUuid,
        },
        products::{
            ProductsService, ProductsServiceError,
            data::{NewDiscount, NewProduct},
            records::{DiscountUuid, ProductRecord, ProductUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{UserRecord, UserUuid},
        },
    },
    test::TestContext,
};

pub(crate) fn new_user(email: &str) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        email: email.to_string(),
        name: "Ada".to_string(),
        weekly_discount_digest: false,
    }
}

pub(crate) fn new_product(name: &str, price: u64) -> NewProduct {
    NewProduct {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        price,
        discount: None,
    }
}

pub(crate) async fn create_user(
    ctx: &TestContext,
    email: &str,
) -> Result<UserRecord, UsersServiceError> {
    ctx.users.create_user(new_user(email)).await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products.create_product(new_product(name, price)).await
}

pub(crate) async fn create_discounted_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
    percent: Percent,
    expires_at: Timestamp,
) -> Result<ProductRecord, ProductsServiceError> {
    let mut product = new_product(name, price);

    product.discount = Some(NewDiscount {
        uuid: DiscountUuid::new(),
        percent,
        expires_at,
    });

    ctx.products.create_product(product).await
}

/// Balances only move through order placement, so tests seed them directly.
pub(crate) async fn set_cashback_balance(
    ctx: &TestContext,
    user: UserUuid,
    balance: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET cashback_balance = $2 WHERE uuid = $1")
        .bind(user.into_uuid())
        .bind(balance)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}

pub(crate) fn place_order(user: UserUuid, basket: BasketRequest) -> PlaceOrder {
    PlaceOrder {
        uuid: OrderUuid::new(),
        user,
        basket,
        promocode: None,
        redeem_cashback: false,
        delivery: DeliveryDetails::default(),
    }
}
