//! Weekly Discount Digest
//!
//! Emails every subscribed user the list of products currently on discount. Nothing is
//! sent when no discount is running.

use std::sync::Arc;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    domain::{
        products::{ProductsService, ProductsServiceError},
        users::{UsersService, UsersServiceError},
    },
    notifications::{
        mailer::{Mailer, send_with_retry},
        messages,
        retry::RetryPolicy,
    },
};

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("failed to load discounted products")]
    Products(#[from] ProductsServiceError),

    #[error("failed to load digest subscribers")]
    Users(#[from] UsersServiceError),
}

/// Outcome of one digest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigestReport {
    pub discounted_products: usize,
    pub subscribers: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct WeeklyDigest {
    users: Arc<dyn UsersService>,
    products: Arc<dyn ProductsService>,
    mailer: Arc<dyn Mailer>,
    retry: RetryPolicy,
}

impl WeeklyDigest {
    #[must_use]
    pub fn new(
        users: Arc<dyn UsersService>,
        products: Arc<dyn ProductsService>,
        mailer: Arc<dyn Mailer>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            users,
            products,
            mailer,
            retry,
        }
    }

    /// Sends the digest of discounts running at `now` to every subscriber.
    ///
    /// A failed email is counted and does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns a [`DigestError`] when products or subscribers cannot be loaded.
    #[tracing::instrument(name = "notifications.weekly_digest", skip(self), err)]
    pub async fn send(&self, now: Timestamp) -> Result<DigestReport, DigestError> {
        let products = self.products.list_discounted_products(now).await?;

        let mut report = DigestReport {
            discounted_products: products.len(),
            ..DigestReport::default()
        };

        if products.is_empty() {
            info!("no discounts running, skipping weekly digest");

            return Ok(report);
        }

        let subscribers = self.users.list_digest_subscribers().await?;

        report.subscribers = subscribers.len();

        for user in &subscribers {
            let Some(email) = messages::weekly_discount_digest(user, &products) else {
                continue;
            };

            if send_with_retry(self.mailer.as_ref(), &self.retry, &email).await {
                report.sent += 1;
            } else {
                warn!(user_uuid = %user.uuid, "weekly digest not delivered");

                report.failed += 1;
            }
        }

        info!(
            sent = report.sent,
            failed = report.failed,
            discounted_products = report.discounted_products,
            "sent weekly discount digest"
        );

        Ok(report)
    }
}
