use crate::database::{
    model::user::{UserRow, UserStatsRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::UserId,
    user::{event::CreateUser, User, UserStats},
};
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let password_hash = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;

        let res = sqlx::query(
            r#"
            INSERT INTO users
            (user_id, email, phone, national_id, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user_id)
        .bind(&event.email)
        .bind(&event.phone)
        .bind(&event.national_id)
        .bind(&event.first_name)
        .bind(&event.last_name)
        .bind(&password_hash)
        .execute(self.db.inner_ref())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(de) if de.is_unique_violation() => AppError::ResourceConflict(
                "User with this email, phone, or national ID already exists".into(),
            ),
            _ => AppError::SpecificOperationError(e),
        })?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        self.find_current_user(user_id).await?.ok_or_else(|| {
            AppError::EntityNotFound("The user just registered was not found".into())
        })
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, email, phone, national_id, first_name, last_name, role, created_at
            FROM users
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_stats(&self, user_id: UserId) -> AppResult<UserStats> {
        let row: UserStatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_bookings,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_bookings,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_bookings,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_bookings,
                COALESCE(SUM(final_price) FILTER (WHERE status = 'completed'), 0) AS total_spent,
                COALESCE(SUM(total_hours) FILTER (WHERE status = 'completed'), 0) AS total_hours
            FROM bookings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::role::Role;
    use sqlx::PgPool;

    fn somchai() -> CreateUser {
        CreateUser::new(
            "somchai@example.com".into(),
            "0812345678".into(),
            "1101700230708".into(),
            "Somchai".into(),
            "Jaidee".into(),
            "secret-password".into(),
        )
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn register_hashes_password_and_returns_profile(pool: PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let user = repo.create(somchai()).await?;
        assert_eq!(user.email, "somchai@example.com");
        assert_eq!(user.role, Role::User);

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE user_id = $1")
                .bind(user.user_id)
                .fetch_one(&pool)
                .await?;
        assert_ne!(stored, "secret-password");
        assert!(bcrypt::verify("secret-password", &stored)?);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn duplicate_identity_is_rejected(pool: PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        repo.create(somchai()).await?;
        let res = repo.create(somchai()).await;
        assert!(matches!(res, Err(AppError::ResourceConflict(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn stats_start_empty(pool: PgPool) -> anyhow::Result<()> {
        let repo = UserRepositoryImpl::new(ConnectionPool::new(pool));

        let user = repo.create(somchai()).await?;
        let stats = repo.find_stats(user.user_id).await?;
        assert_eq!(stats.total_bookings, 0);
        assert_eq!(stats.total_spent, rust_decimal::Decimal::ZERO);
        Ok(())
    }
}
