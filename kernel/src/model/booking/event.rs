use crate::model::{
    booking::BookingPeriod,
    id::{BookingId, RoomId, UserId},
};
use chrono::{DateTime, Utc};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateBooking {
    pub booked_by: UserId,
    pub room_id: RoomId,
    pub period: BookingPeriod,
    pub notes: Option<String>,
}

#[derive(Debug, new)]
pub struct CancelBooking {
    pub booking_id: BookingId,
    pub requested_user: UserId,
    pub requested_at: DateTime<Utc>,
}
