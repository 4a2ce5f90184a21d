//! Promocodes service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::promocodes::{
        data::NewPromocode,
        errors::PromocodesServiceError,
        records::PromocodeRecord,
        repository::PgPromocodesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromocodesService {
    db: Db,
    repository: PgPromocodesRepository,
}

impl PgPromocodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromocodesRepository::new(),
        }
    }
}

#[async_trait]
impl PromocodesService for PgPromocodesService {
    #[tracing::instrument(
        name = "promocodes.service.create_promocode",
        skip(self, promocode),
        fields(
            promocode_name = %promocode.name,
            percent = %promocode.percent,
            stackable = promocode.stackable
        ),
        err
    )]
    async fn create_promocode(
        &self,
        promocode: NewPromocode,
    ) -> Result<PromocodeRecord, PromocodesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_promocode(&mut tx, promocode).await?;

        tx.commit().await?;

        info!(promocode_uuid = %created.uuid, promocode_name = %created.name, "created promocode");

        Ok(created)
    }

    async fn get_promocode(&self, name: &str) -> Result<PromocodeRecord, PromocodesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let promocode = self.repository.find_by_name(&mut tx, name.trim()).await?;

        tx.commit().await?;

        promocode.ok_or(PromocodesServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait PromocodesService: Send + Sync {
    /// Creates a promocode. Names are unique.
    async fn create_promocode(
        &self,
        promocode: NewPromocode,
    ) -> Result<PromocodeRecord, PromocodesServiceError>;

    /// Retrieve a promocode by name.
    async fn get_promocode(&self, name: &str) -> Result<PromocodeRecord, PromocodesServiceError>;
}
