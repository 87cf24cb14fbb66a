use crate::model::{id::UserId, role::Role};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod event;

#[derive(Debug, PartialEq, Eq)]
pub struct User {
    pub user_id: UserId,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Aggregated booking figures for one user. Spent amount and hours only
/// count completed bookings.
#[derive(Debug)]
pub struct UserStats {
    pub total_bookings: i64,
    pub completed_bookings: i64,
    pub pending_bookings: i64,
    pub cancelled_bookings: i64,
    pub total_spent: Decimal,
    pub total_hours: i64,
}
