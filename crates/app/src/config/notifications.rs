//! Notification Config

use std::time::Duration;

use clap::Args;

use crate::notifications::retry::RetryPolicy;

/// Mail delivery settings.
#[derive(Debug, Clone, Args)]
pub struct NotificationConfig {
    /// HTTP mail relay; emails are only logged when unset
    #[arg(long, env = "MAILER_RELAY_URL")]
    pub mailer_relay_url: Option<String>,

    /// Sender address for outgoing emails
    #[arg(long, env = "MAIL_FROM", default_value = "shop@localhost")]
    pub mail_from: String,

    /// Mail relay request timeout in seconds
    #[arg(long, env = "MAILER_TIMEOUT_SECONDS", default_value_t = 10)]
    pub mailer_timeout_seconds: u64,

    /// Delivery attempts per email, including the first
    #[arg(long, env = "NOTIFICATION_MAX_ATTEMPTS", default_value_t = 5)]
    pub notification_max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[arg(long, env = "NOTIFICATION_RETRY_BASE_MS", default_value_t = 1_000)]
    pub notification_retry_base_ms: u64,

    /// Longest delay between retries, in milliseconds
    #[arg(long, env = "NOTIFICATION_RETRY_MAX_MS", default_value_t = 60_000)]
    pub notification_retry_max_ms: u64,

    /// Seconds between sweeps for due delivery reminders
    #[arg(long, env = "REMINDER_SWEEP_INTERVAL_SECONDS", default_value_t = 60)]
    pub reminder_sweep_interval_seconds: u64,

    /// Most reminders queued by a single sweep
    #[arg(long, env = "REMINDER_SWEEP_BATCH_SIZE", default_value_t = 100)]
    pub reminder_sweep_batch_size: u32,
}

impl NotificationConfig {
    #[must_use]
    pub fn mailer_timeout(&self) -> Duration {
        Duration::from_secs(self.mailer_timeout_seconds)
    }

    #[must_use]
    pub fn reminder_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_sweep_interval_seconds.max(1))
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(self.notification_retry_base_ms),
            max_delay: Duration::from_millis(self.notification_retry_max_ms),
            max_attempts: self.notification_max_attempts.max(1),
            jitter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        notifications: NotificationConfig,
    }

    #[test]
    fn flags_build_the_retry_policy() -> TestResult {
        let harness = Harness::try_parse_from([
            "storefront",
            "--mail-from",
            "orders@example.com",
            "--notification-max-attempts",
            "0",
            "--notification-retry-base-ms",
            "250",
            "--notification-retry-max-ms",
            "2000",
        ])?;

        let policy = harness.notifications.retry_policy();

        assert_eq!(harness.notifications.mail_from, "orders@example.com");
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_secs(2));

        Ok(())
    }

    #[test]
    fn reminder_sweep_interval_is_at_least_a_second() -> TestResult {
        let harness = Harness::try_parse_from([
            "storefront",
            "--reminder-sweep-interval-seconds",
            "0",
        ])?;

        assert_eq!(
            harness.notifications.reminder_sweep_interval(),
            Duration::from_secs(1)
        );
        assert_eq!(harness.notifications.reminder_sweep_batch_size, 100);

        Ok(())
    }
}
