use chrono::{DateTime, Utc};
use kernel::model::{id::RoomId, room::Room};
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
            is_active,
            created_at,
        } = value;
        Room {
            room_id,
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
            is_active,
            created_at,
        }
    }
}
