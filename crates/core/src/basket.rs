//! Basket requests
//!
//! A [`BasketRequest`] is the validated form of "these products, in these quantities". It is
//! built once at the boundary; everything downstream can rely on every quantity being
//! positive and every product id being well-formed.

use std::{collections::BTreeMap, num::ParseIntError};

use thiserror::Error;
use uuid::Uuid;

/// Errors raised while validating a basket request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasketError {
    /// The product id could not be parsed.
    #[error("invalid product id `{id}`")]
    InvalidProductId {
        /// Raw product id.
        id: String,

        /// Parse failure.
        #[source]
        source: uuid::Error,
    },

    /// The quantity was not a whole number.
    #[error("invalid quantity `{quantity}` for product {product}")]
    InvalidQuantity {
        /// Product the quantity was given for.
        product: Uuid,

        /// Raw quantity value.
        quantity: String,

        /// Parse failure.
        #[source]
        source: ParseIntError,
    },

    /// The quantity was zero or negative.
    #[error("quantity for product {product} must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// Product the quantity was given for.
        product: Uuid,

        /// Offending quantity.
        quantity: i64,
    },

    /// Summing duplicate entries for a product overflowed.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(Uuid),
}

/// Requested products and their positive quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasketRequest {
    quantities: BTreeMap<Uuid, u32>,
}

impl BasketRequest {
    /// Builds a request from typed `(product, quantity)` pairs.
    ///
    /// Repeated products have their quantities summed.
    ///
    /// # Errors
    ///
    /// - [`BasketError::NonPositiveQuantity`]: a quantity was zero or negative.
    /// - [`BasketError::QuantityOverflow`]: a quantity does not fit in a `u32`.
    pub fn try_from_iter<I>(pairs: I) -> Result<Self, BasketError>
    where
        I: IntoIterator<Item = (Uuid, i64)>,
    {
        let mut quantities = BTreeMap::new();

        for (product, quantity) in pairs {
            if quantity <= 0 {
                return Err(BasketError::NonPositiveQuantity { product, quantity });
            }

            let quantity = u32::try_from(quantity)
                .ok()
                .ok_or(BasketError::QuantityOverflow(product))?;

            let entry: &mut u32 = quantities.entry(product).or_default();

            *entry = entry
                .checked_add(quantity)
                .ok_or(BasketError::QuantityOverflow(product))?;
        }

        Ok(Self { quantities })
    }

    /// Builds a request from raw `(product id, quantity)` strings.
    ///
    /// # Errors
    ///
    /// - [`BasketError::InvalidProductId`]: a product id is not a UUID.
    /// - [`BasketError::InvalidQuantity`]: a quantity is not a whole number.
    /// - Any error from [`BasketRequest::try_from_iter`].
    pub fn parse<'a, I>(pairs: I) -> Result<Self, BasketError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let typed = pairs
            .into_iter()
            .map(|(product, quantity)| {
                let product = Uuid::parse_str(product.trim()).map_err(|source| {
                    BasketError::InvalidProductId {
                        id: product.to_string(),
                        source,
                    }
                })?;

                let quantity = quantity.trim().parse::<i64>().map_err(|source| {
                    BasketError::InvalidQuantity {
                        product,
                        quantity: quantity.to_string(),
                        source,
                    }
                })?;

                Ok((product, quantity))
            })
            .collect::<Result<Vec<_>, BasketError>>()?;

        Self::try_from_iter(typed)
    }

    /// Quantity requested for `product`, if any.
    pub fn quantity(&self, product: Uuid) -> Option<u32> {
        self.quantities.get(&product).copied()
    }

    /// Requested products in a stable order.
    pub fn products(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.quantities.keys().copied()
    }

    /// Requested `(product, quantity)` pairs in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Uuid, u32)> + '_ {
        self.quantities
            .iter()
            .map(|(product, quantity)| (*product, *quantity))
    }

    /// Sum of all requested quantities.
    pub fn item_count(&self) -> u64 {
        self.quantities.values().map(|quantity| u64::from(*quantity)).sum()
    }

    /// Number of distinct products requested.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Whether nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}
