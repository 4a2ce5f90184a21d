//! Test context for service-level integration tests.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    database::Db,
    domain::{
        baskets::PgBasketsService, cashback::PgCashbackService, orders::PgOrdersService,
        products::PgProductsService, promocodes::PgPromocodesService, users::PgUsersService,
    },
    notifications::{ChannelDispatcher, Notification},
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub users: PgUsersService,
    pub products: PgProductsService,
    pub promocodes: PgPromocodesService,
    pub cashback: PgCashbackService,
    pub baskets: PgBasketsService,
    pub orders: PgOrdersService,
    /// Everything order placement dispatched.
    pub notifications: UnboundedReceiver<Notification>,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let (dispatcher, notifications) = ChannelDispatcher::channel();

        Self {
            users: PgUsersService::new(db.clone()),
            products: PgProductsService::new(db.clone()),
            promocodes: PgPromocodesService::new(db.clone()),
            cashback: PgCashbackService::new(db.clone()),
            baskets: PgBasketsService::new(db.clone()),
            orders: PgOrdersService::new(db, Arc::new(dispatcher)),
            notifications,
            db: test_db,
        }
    }

    /// Notifications dispatched so far.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();

        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }

        drained
    }
}
