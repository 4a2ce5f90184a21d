//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::users::{
        data::NewUser,
        errors::UsersServiceError,
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    #[tracing::instrument(
        name = "users.service.create_user",
        skip(self, user),
        fields(user_uuid = %user.uuid),
        err
    )]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_user(&mut tx, user).await?;

        tx.commit().await?;

        info!(user_uuid = %created.uuid, "created user");

        Ok(created)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_digest_subscribers(&self) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let users = self.repository.list_digest_subscribers(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    #[tracing::instrument(
        name = "users.service.set_weekly_discount_digest",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn set_weekly_discount_digest(
        &self,
        user: UserUuid,
        enabled: bool,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .set_weekly_discount_digest(&mut tx, user, enabled)
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user, enabled, "updated weekly discount digest subscription");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a user with an empty cashback balance.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Users who opted in to the weekly discount digest, oldest first.
    async fn list_digest_subscribers(&self) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Opts a user in to or out of the weekly discount digest.
    async fn set_weekly_discount_digest(
        &self,
        user: UserUuid,
        enabled: bool,
    ) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_user};

    use super::*;

    #[tokio::test]
    async fn create_user_starts_with_zero_balance() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx.users.create_user(new_user("ada@example.com")).await?;

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.cashback_balance, Decimal::ZERO);
        assert!(!user.weekly_discount_digest);

        Ok(())
    }

    #[tokio::test]
    async fn get_user_returns_created_user() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx.users.create_user(new_user("ada@example.com")).await?;
        let fetched = ctx.users.get_user(created.uuid).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users.create_user(new_user("ada@example.com")).await?;

        let result = ctx.users.create_user(new_user("ada@example.com")).await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn digest_subscribers_follow_the_opt_in_flag() -> TestResult {
        let ctx = TestContext::new().await;

        let mut subscribed = new_user("ada@example.com");
        subscribed.weekly_discount_digest = true;

        let ada = ctx.users.create_user(subscribed).await?;
        let grace = ctx.users.create_user(new_user("grace@example.com")).await?;

        assert_eq!(ctx.users.list_digest_subscribers().await?, vec![ada.clone()]);

        let grace = ctx.users.set_weekly_discount_digest(grace.uuid, true).await?;
        ctx.users.set_weekly_discount_digest(ada.uuid, false).await?;

        assert!(grace.weekly_discount_digest);
        assert_eq!(ctx.users.list_digest_subscribers().await?, vec![grace]);

        Ok(())
    }

    #[tokio::test]
    async fn set_weekly_discount_digest_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .set_weekly_discount_digest(UserUuid::new(), true)
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn get_user_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
