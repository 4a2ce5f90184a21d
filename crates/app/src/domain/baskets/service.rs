//! Baskets service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        baskets::{
            data::{NewBasketItem, QuantityUpdate},
            errors::BasketsServiceError,
            records::BasketItemRecord,
            repository::PgBasketsRepository,
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgBasketsService {
    db: Db,
    repository: PgBasketsRepository,
}

impl PgBasketsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBasketsRepository::new(),
        }
    }
}

#[async_trait]
impl BasketsService for PgBasketsService {
    async fn list_items(&self, user: UserUuid) -> Result<Vec<BasketItemRecord>, BasketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items = self.repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(items)
    }

    #[tracing::instrument(
        name = "baskets.service.add_item",
        skip(self, item),
        fields(
            user_uuid = %user,
            product_uuid = %item.product,
            quantity = item.quantity
        ),
        err
    )]
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewBasketItem,
    ) -> Result<BasketItemRecord, BasketsServiceError> {
        if item.quantity == 0 {
            return Err(BasketsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_item(&mut tx, user, item).await?;

        tx.commit().await?;

        info!(user_uuid = %user, product_uuid = %created.product, "added basket item");

        Ok(created)
    }

    #[tracing::instrument(
        name = "baskets.service.remove_item",
        skip(self),
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), BasketsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_item(&mut tx, user, product).await?;

        if rows_affected == 0 {
            return Err(BasketsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "baskets.service.update_quantity",
        skip(self, update),
        fields(
            user_uuid = %user,
            product_uuid = %product,
            expected = update.expected,
            quantity = update.quantity
        ),
        err
    )]
    async fn update_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        update: QuantityUpdate,
    ) -> Result<BasketItemRecord, BasketsServiceError> {
        if update.quantity == 0 {
            return Err(BasketsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_quantity(&mut tx, user, product, update.expected, update.quantity)
            .await?;

        let Some(updated) = updated else {
            let exists = self.repository.item_exists(&mut tx, user, product).await?;

            debug!(exists, "basket quantity update matched no row");

            return Err(if exists {
                BasketsServiceError::Conflict
            } else {
                BasketsServiceError::NotFound
            });
        };

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait BasketsService: Send + Sync {
    /// Items in the user's basket.
    async fn list_items(&self, user: UserUuid) -> Result<Vec<BasketItemRecord>, BasketsServiceError>;

    /// Puts a product in the basket. A product can only be added once.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewBasketItem,
    ) -> Result<BasketItemRecord, BasketsServiceError>;

    /// Takes a product out of the basket.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), BasketsServiceError>;

    /// Changes a quantity if it still holds the value the caller last saw.
    ///
    /// Returns [`BasketsServiceError::Conflict`] when another request changed it first.
    async fn update_quantity(
        &self,
        user: UserUuid,
        product: ProductUuid,
        update: QuantityUpdate,
    ) -> Result<BasketItemRecord, BasketsServiceError>;
}
