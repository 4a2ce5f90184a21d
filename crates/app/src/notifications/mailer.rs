//! Mail transports.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::notifications::{messages::Email, retry::RetryPolicy};

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail relay request failed")]
    Http(#[from] reqwest::Error),

    #[error("mail relay rejected the message with status {0}")]
    Rejected(StatusCode),
}

impl MailerError {
    /// Whether sending the same message again might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(error) => error.is_timeout() || error.is_connect(),
            Self::Rejected(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a single email.
    ///
    /// # Errors
    ///
    /// Returns a [`MailerError`] when the transport fails or refuses the message.
    async fn send(&self, email: &Email) -> Result<(), MailerError>;
}

/// Sends `email`, retrying retryable failures as `retry` allows. Returns whether it went out.
pub async fn send_with_retry(mailer: &dyn Mailer, retry: &RetryPolicy, email: &Email) -> bool {
    let mut attempt = 1;

    loop {
        let Err(error) = mailer.send(email).await else {
            info!(to = %email.to, subject = %email.subject, attempt, "sent email");

            return true;
        };

        if !error.is_retryable() || !retry.should_retry(attempt) {
            error!(%error, attempt, to = %email.to, "giving up on email");

            return false;
        }

        let delay = retry.delay_for_attempt(attempt);

        warn!(%error, attempt, ?delay, "email failed, retrying");

        tokio::time::sleep(delay).await;

        attempt += 1;
    }
}

/// Writes emails to the log instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "email"
        );

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    #[serde(flatten)]
    email: &'a Email,
}

/// Posts emails as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    from: String,
}

impl HttpMailer {
    /// Creates a mailer posting to `endpoint` with `from` as the sender.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Http`] when the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MailerError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[tracing::instrument(
        name = "notifications.mailer.send",
        skip(self, email),
        fields(endpoint = %self.endpoint, to = %email.to),
        err
    )]
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayMessage {
                from: &self.from,
                email,
            })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            return Err(MailerError::Rejected(status));
        }

        debug!(%status, "email accepted by relay");

        Ok(())
    }
}
