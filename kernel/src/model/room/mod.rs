use crate::model::id::RoomId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod event;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
