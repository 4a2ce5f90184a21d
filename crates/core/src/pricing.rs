//! Order Pricing Engine
//!
//! Turns a basket request plus snapshots of everything it depends on into a priced order.
//! The steps run in a fixed order and each consumes the previous step's output:
//!
//! 1. resolve requested products against catalog snapshots
//! 2. sum discounted line totals
//! 3. apply the promocode
//! 4. redeem cashback
//! 5. accrue cashback
//! 6. truncate the grand total
//!
//! [`price_order`] is a pure function of its inputs.

use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    basket::BasketRequest,
    cashback::{self, CashbackPolicy, CashbackSettlement},
    catalog::ProductLine,
    discounts::effective_price,
    promocodes::{Promocode, PromocodeError, PromocodeOutcome, apply_promocode},
};

/// Errors that abort pricing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Promocode evaluation failed.
    #[error(transparent)]
    Promocode(#[from] PromocodeError),

    /// A line total or the grand total exceeded the representable range.
    #[error("order total overflowed")]
    Overflow,
}

/// What the customer asked for.
#[derive(Debug, Clone, Copy)]
pub struct PricingRequest<'a> {
    /// Requested products and quantities.
    pub basket: &'a BasketRequest,

    /// Promocode name, if one was entered.
    pub promocode: Option<&'a str>,

    /// Whether cashback points should be redeemed against this order.
    pub redeem_cashback: bool,
}

/// Snapshots of every external fact pricing depends on.
#[derive(Debug, Clone, Copy)]
pub struct PricingInputs<'a> {
    /// Catalog snapshots for (a subset of) the requested products.
    pub lines: &'a [ProductLine],

    /// The promocode looked up by the requested name, if found.
    pub promocode: Option<&'a Promocode>,

    /// The cashback policy, if one is configured.
    pub cashback_policy: Option<&'a CashbackPolicy>,

    /// The user's current cashback balance.
    pub cashback_balance: Decimal,

    /// Instant used to evaluate product discounts.
    pub now: Timestamp,

    /// Calendar day used to evaluate promocode expiry.
    pub today: Date,
}

/// A single priced basket line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Product identifier.
    pub product: Uuid,

    /// Requested quantity.
    pub quantity: u32,

    /// Catalog unit price.
    pub unit_price: u64,

    /// Unit price after the product discount.
    pub effective_unit_price: Decimal,

    /// Whether the product discount was active.
    pub discount_applied: bool,

    /// `effective_unit_price * quantity`.
    pub line_total: Decimal,
}

/// The result of pricing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Lines that resolved against the catalog.
    pub lines: Vec<PricedLine>,

    /// Requested products with no catalog snapshot.
    pub unresolved: Vec<Uuid>,

    /// Sum of line totals.
    pub subtotal: Decimal,

    /// What happened to the requested promocode.
    pub promocode: PromocodeOutcome,

    /// Cashback redemption and accrual, when a policy is configured.
    pub cashback: Option<CashbackSettlement>,

    /// Fully adjusted amount before truncation.
    pub amount: Decimal,

    /// Amount charged, truncated to whole minor units.
    pub total_price: u64,

    /// Sum of all requested quantities, resolved or not.
    pub total_item_count: u64,
}

impl PricedOrder {
    /// Resolved `(product, quantity)` pairs, the subset of the request that was priced.
    pub fn items(&self) -> BTreeMap<Uuid, u32> {
        self.lines
            .iter()
            .map(|line| (line.product, line.quantity))
            .collect()
    }

    /// Cashback balance after the order, or `balance` unchanged when no policy applies.
    pub fn cashback_balance_after(&self, balance: Decimal) -> Decimal {
        self.cashback
            .as_ref()
            .map_or(balance, |settlement| settlement.balance_after)
    }
}

/// Prices an order.
///
/// # Errors
///
/// - [`PricingError::Promocode`]: a promocode was requested but not found.
/// - [`PricingError::Overflow`]: totals exceeded the representable range.
pub fn price_order(
    request: &PricingRequest<'_>,
    inputs: &PricingInputs<'_>,
) -> Result<PricedOrder, PricingError> {
    let catalog: FxHashMap<Uuid, &ProductLine> = inputs
        .lines
        .iter()
        .map(|line| (line.product, line))
        .collect();

    let mut lines = Vec::with_capacity(request.basket.len());
    let mut unresolved = Vec::new();
    let mut subtotal = Decimal::ZERO;

    for (product, quantity) in request.basket.iter() {
        let Some(line) = catalog.get(&product) else {
            unresolved.push(product);
            continue;
        };

        let price = effective_price(line, inputs.now);

        let line_total = price
            .unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(PricingError::Overflow)?;

        subtotal = subtotal
            .checked_add(line_total)
            .ok_or(PricingError::Overflow)?;

        lines.push(PricedLine {
            product,
            quantity,
            unit_price: line.unit_price,
            effective_unit_price: price.unit_price,
            discount_applied: price.discount_applied,
            line_total,
        });
    }

    let (amount, promocode) = apply_promocode(
        request.promocode,
        inputs.promocode,
        inputs.today,
        subtotal,
    )?;

    let cashback = inputs
        .cashback_policy
        .map(|policy| {
            cashback::settle(
                amount,
                inputs.cashback_balance,
                request.redeem_cashback,
                policy,
            )
            .ok_or(PricingError::Overflow)
        })
        .transpose()?;

    let amount = cashback.as_ref().map_or(amount, |settlement| settlement.price);

    Ok(PricedOrder {
        lines,
        unresolved,
        subtotal,
        promocode,
        cashback,
        amount,
        total_price: truncate_total(amount)?,
        total_item_count: request.basket.item_count(),
    })
}

/// Truncates a fully adjusted amount to whole minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the amount does not fit in a `u64`.
pub fn truncate_total(amount: Decimal) -> Result<u64, PricingError> {
    amount
        .max(Decimal::ZERO)
        .trunc()
        .to_u64()
        .ok_or(PricingError::Overflow)
}
