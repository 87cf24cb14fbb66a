use crate::{
    database::{model::user::UserCredentialRow, ConnectionPool},
    redis::RedisClient,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    auth::{event::CreateToken, AccessToken},
    id::UserId,
};
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};
use std::{str::FromStr, sync::Arc};
use uuid::Uuid;

fn auth_key(token: &AccessToken) -> String {
    format!("auth:{}", token.0)
}

#[derive(new)]
pub struct AuthRepositoryImpl {
    db: ConnectionPool,
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let Some(value) = self.kv.get(&auth_key(access_token)).await? else {
            return Ok(None);
        };
        Ok(Some(UserId::from_str(&value)?))
    }

    async fn verify_user(&self, email: &str, password: &str) -> AppResult<UserId> {
        let row: Option<UserCredentialRow> = sqlx::query_as(
            r#"
            SELECT user_id, password_hash
            FROM users
            WHERE email = $1 AND is_active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let row = row.ok_or(AppError::UnauthorizedError)?;

        let valid = bcrypt::verify(password, &row.password_hash)?;
        if !valid {
            return Err(AppError::UnauthorizedError);
        }

        Ok(row.user_id)
    }

    async fn create_token(&self, event: CreateToken) -> AppResult<AccessToken> {
        let token = AccessToken(Uuid::new_v4().simple().to_string());
        self.kv
            .set_ex(&auth_key(&token), &event.user_id.to_string(), self.ttl)
            .await?;
        Ok(token)
    }

    async fn delete_token(&self, access_token: &AccessToken) -> AppResult<()> {
        self.kv.delete(&auth_key(access_token)).await
    }
}
