use chrono::{DateTime, Utc};
use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserStats},
};
use rust_decimal::Decimal;
use shared::error::AppError;
use std::str::FromStr;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(value: UserRow) -> Result<Self, Self::Error> {
        let UserRow {
            user_id,
            email,
            phone,
            national_id,
            first_name,
            last_name,
            role,
            created_at,
        } = value;
        Ok(User {
            user_id,
            email,
            phone,
            national_id,
            first_name,
            last_name,
            role: Role::from_str(&role)
                .map_err(|_| AppError::ConversionEntityError(format!("unknown role: {role}")))?,
            created_at,
        })
    }
}

/// Credential row fetched at login time.
#[derive(sqlx::FromRow)]
pub struct UserCredentialRow {
    pub user_id: UserId,
    pub password_hash: String,
}

#[derive(sqlx::FromRow)]
pub struct UserStatsRow {
    pub total_bookings: i64,
    pub completed_bookings: i64,
    pub pending_bookings: i64,
    pub cancelled_bookings: i64,
    pub total_spent: Decimal,
    pub total_hours: i64,
}

impl From<UserStatsRow> for UserStats {
    fn from(value: UserStatsRow) -> Self {
        let UserStatsRow {
            total_bookings,
            completed_bookings,
            pending_bookings,
            cancelled_bookings,
            total_spent,
            total_hours,
        } = value;
        UserStats {
            total_bookings,
            completed_bookings,
            pending_bookings,
            cancelled_bookings,
            total_spent,
            total_hours,
        }
    }
}
