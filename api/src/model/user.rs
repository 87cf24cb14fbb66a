use chrono::{DateTime, Utc};
use kernel::model::{
    id::UserId,
    role::Role,
    user::{User, UserStats},
};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: UserId,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        let User {
            user_id,
            email,
            phone,
            national_id,
            first_name,
            last_name,
            role,
            created_at,
        } = value;
        Self {
            user_id,
            email,
            phone,
            national_id,
            first_name,
            last_name,
            role,
            created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub total_bookings: i64,
    pub completed_bookings: i64,
    pub pending_bookings: i64,
    pub cancelled_bookings: i64,
    pub total_spent: Decimal,
    pub total_hours: i64,
}

impl From<UserStats> for UserStatsResponse {
    fn from(value: UserStats) -> Self {
        let UserStats {
            total_bookings,
            completed_bookings,
            pending_bookings,
            cancelled_bookings,
            total_spent,
            total_hours,
        } = value;
        Self {
            total_bookings,
            completed_bookings,
            pending_bookings,
            cancelled_bookings,
            total_spent,
            total_hours,
        }
    }
}
