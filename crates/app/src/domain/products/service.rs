//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use storefront::catalog::ProductLine;
use tracing::{Span, info};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::products::{
        data::NewProduct,
        errors::ProductsServiceError,
        records::{ProductRecord, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_products(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn list_discounted_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self
            .repository
            .list_discounted_products(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self
            .repository
            .get_product(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(
        name = "products.service.get_product_lines",
        skip(self, products),
        fields(
            requested_count = products.len(),
            found_count = tracing::field::Empty
        ),
        err
    )]
    async fn get_product_lines(
        &self,
        products: &[Uuid],
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductLine>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let records = self
            .repository
            .find_products(&mut tx, products, point_in_time)
            .await?;

        tx.commit().await?;

        Span::current().record("found_count", records.len());

        Ok(records.iter().map(ProductRecord::to_product_line).collect())
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(
            product_uuid = %product.uuid,
            has_discount = product.discount.is_some()
        ),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let discount = match product.discount {
            Some(discount) => Some(self.repository.create_discount(&mut tx, discount).await?),
            None => None,
        };

        let created = self
            .repository
            .create_product(&mut tx, product, discount)
            .await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(product_uuid = %product, "deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products live at `point_in_time`.
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Live products with a discount running at `point_in_time`, deepest discount first.
    async fn list_discounted_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Pricing snapshots for the given products. Unknown or deleted ids are absent from the
    /// result rather than an error.
    async fn get_product_lines(
        &self,
        products: &[Uuid],
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductLine>, ProductsServiceError>;

    /// Creates a product, along with its discount when one is given.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan, Unit};
    use storefront::percent::Percent;
    use testresult::TestResult;

    use crate::{
        domain::products::{data::NewDiscount, records::DiscountUuid},
        test::{
            TestContext,
            helpers::{create_discounted_product, new_product},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_price_and_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let expires_at = Timestamp::now().round(Unit::Second)?.checked_add(48.hours())?;

        let mut product = new_product("Kettle", 1000);
        product.discount = Some(NewDiscount {
            uuid: DiscountUuid::new(),
            percent: Percent::new(20)?,
            expires_at,
        });

        let created = ctx.products.create_product(product.clone()).await?;

        assert_eq!(created.uuid, product.uuid);
        assert_eq!(created.price, 1000);
        assert_eq!(
            created.discount.map(|discount| discount.percent),
            Some(Percent::new(20)?)
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_reads_back_discount() -> TestResult {
        let ctx = TestContext::new().await;
        let expires_at = Timestamp::now().round(Unit::Second)?.checked_add(48.hours())?;

        let mut product = new_product("Kettle", 1000);
        product.discount = Some(NewDiscount {
            uuid: DiscountUuid::new(),
            percent: Percent::new(20)?,
            expires_at,
        });

        let created = ctx.products.create_product(product).await?;
        let fetched = ctx
            .products
            .get_product(created.uuid, Timestamp::now())
            .await?;

        assert_eq!(fetched.discount, created.discount);
        assert_eq!(fetched.name, "Kettle");

        Ok(())
    }

    #[tokio::test]
    async fn get_product_lines_skips_unknown_products() -> TestResult {
        let ctx = TestContext::new().await;

        let known = ctx
            .products
            .create_product(new_product("Kettle", 1000))
            .await?;

        let lines = ctx
            .products
            .get_product_lines(
                &[known.uuid.into_uuid(), Uuid::now_v7()],
                Timestamp::now(),
            )
            .await?;

        assert_eq!(lines, vec![ProductLine::new(known.uuid.into_uuid(), 1000)]);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_is_not_returned() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .products
            .create_product(new_product("Kettle", 1000))
            .await?;

        ctx.products.delete_product(created.uuid).await?;

        let products = ctx.products.list_products(Timestamp::now()).await?;
        let lines = ctx
            .products
            .get_product_lines(&[created.uuid.into_uuid()], Timestamp::now())
            .await?;

        assert!(!products.iter().any(|p| p.uuid == created.uuid));
        assert!(lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn discounted_products_exclude_expired_and_deleted() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now().round(Unit::Second)?;
        let running = now.checked_add(48.hours())?;

        let kettle =
            create_discounted_product(&ctx, "Kettle", 1000, Percent::new(20)?, running).await?;
        let lamp =
            create_discounted_product(&ctx, "Lamp", 3000, Percent::new(35)?, running).await?;
        create_discounted_product(
            &ctx,
            "Toaster",
            2000,
            Percent::new(50)?,
            now.checked_sub(1.hour())?,
        )
        .await?;
        let retired =
            create_discounted_product(&ctx, "Radio", 4000, Percent::new(40)?, running).await?;
        ctx.products
            .create_product(new_product("Mug", 500))
            .await?;

        ctx.products.delete_product(retired.uuid).await?;

        let discounted = ctx
            .products
            .list_discounted_products(Timestamp::now())
            .await?;

        let names: Vec<&str> = discounted.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Lamp", "Kettle"]);
        assert_eq!(discounted[0].uuid, lamp.uuid);
        assert_eq!(discounted[1].discount, kettle.discount);

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.delete_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let product = new_product("Kettle", 100);

        ctx.products.create_product(product.clone()).await?;

        let result = ctx.products.create_product(product).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }
}
