use crate::model::id::RoomId;
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Debug, new)]
pub struct CreateRoom {
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, new)]
pub struct UpdateRoom {
    pub room_id: RoomId,
    pub room_name: Option<String>,
    pub capacity: Option<i32>,
    pub hourly_rate: Option<Decimal>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, new)]
pub struct DeactivateRoom {
    pub room_id: RoomId,
}
