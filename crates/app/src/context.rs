//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::NotificationConfig,
    database::{self, Db},
    domain::{
        baskets::{BasketsService, PgBasketsService},
        cashback::{CashbackService, PgCashbackService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        promocodes::{PgPromocodesService, PromocodesService},
        users::{PgUsersService, UsersService},
    },
    notifications::{
        ChannelDispatcher, Deliverer, NotificationDispatcher, NotificationWorker, WeeklyDigest,
        mailer::{HttpMailer, LogMailer, Mailer, MailerError},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build the mailer")]
    Mailer(#[source] MailerError),
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub promocodes: Arc<dyn PromocodesService>,
    pub cashback: Arc<dyn CashbackService>,
    pub baskets: Arc<dyn BasketsService>,
    pub orders: Arc<dyn OrdersService>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub weekly_digest: WeeklyDigest,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// The returned worker delivers the notifications order placement dispatches and must be
    /// run by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or building the mailer fails.
    pub async fn from_database_url(
        url: &str,
        notifications: &NotificationConfig,
    ) -> Result<(Self, NotificationWorker), AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let mailer: Arc<dyn Mailer> = match &notifications.mailer_relay_url {
            Some(endpoint) => Arc::new(
                HttpMailer::new(
                    endpoint,
                    &notifications.mail_from,
                    notifications.mailer_timeout(),
                )
                .map_err(AppInitError::Mailer)?,
            ),
            None => Arc::new(LogMailer),
        };

        Ok(Self::new(Db::new(pool), mailer, notifications))
    }

    /// Wire every service onto `db`.
    #[must_use]
    pub fn new(
        db: Db,
        mailer: Arc<dyn Mailer>,
        notifications: &NotificationConfig,
    ) -> (Self, NotificationWorker) {
        let (dispatcher, receiver) = ChannelDispatcher::channel();
        let dispatcher: Arc<dyn NotificationDispatcher> = Arc::new(dispatcher);

        let users: Arc<dyn UsersService> = Arc::new(PgUsersService::new(db.clone()));
        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let orders: Arc<dyn OrdersService> =
            Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&dispatcher)));

        let worker = NotificationWorker::new(
            receiver,
            Deliverer::new(
                Arc::clone(&orders),
                Arc::clone(&users),
                Arc::clone(&mailer),
                notifications.retry_policy(),
            ),
        );

        let weekly_digest = WeeklyDigest::new(
            Arc::clone(&users),
            Arc::clone(&products),
            mailer,
            notifications.retry_policy(),
        );

        let context = Self {
            users,
            products,
            promocodes: Arc::new(PgPromocodesService::new(db.clone())),
            cashback: Arc::new(PgCashbackService::new(db.clone())),
            baskets: Arc::new(PgBasketsService::new(db)),
            orders,
            dispatcher,
            weekly_digest,
        };

        (context, worker)
    }
}
