use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{Booking, BookingRoom, BookingSlot, BookingStatus, PaymentStatus},
    id::{BookingId, RoomId, UserId},
};
use rust_decimal::Decimal;
use shared::error::AppError;
use std::str::FromStr;

/// One booking joined with its room, as read back for API responses.
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_hours: i32,
    pub total_price: Decimal,
    pub discount_percent: Decimal,
    pub final_price: Decimal,
    pub qr_code: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub booked_at: DateTime<Utc>,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(value: BookingRow) -> Result<Self, Self::Error> {
        let BookingRow {
            booking_id,
            user_id,
            room_id,
            start_time,
            end_time,
            total_hours,
            total_price,
            discount_percent,
            final_price,
            qr_code,
            status,
            payment_status,
            notes,
            booked_at,
            room_name,
            capacity,
            hourly_rate,
        } = value;
        Ok(Booking {
            booking_id,
            booked_by: user_id,
            start_time,
            end_time,
            total_hours,
            total_price,
            discount_percent,
            final_price,
            qr_code,
            status: parse_booking_status(&status)?,
            payment_status: PaymentStatus::from_str(&payment_status).map_err(|_| {
                AppError::ConversionEntityError(format!(
                    "unknown payment status: {payment_status}"
                ))
            })?,
            notes,
            booked_at,
            room: BookingRoom {
                room_id,
                room_name,
                capacity,
                hourly_rate,
            },
        })
    }
}

/// Minimal row used to guard cancellation; locked FOR UPDATE.
#[derive(sqlx::FromRow)]
pub struct BookingStateRow {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub status: String,
    pub start_time: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
pub struct BookingSlotRow {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

impl TryFrom<BookingSlotRow> for BookingSlot {
    type Error = AppError;

    fn try_from(value: BookingSlotRow) -> Result<Self, Self::Error> {
        Ok(BookingSlot {
            booking_id: value.booking_id,
            room_id: value.room_id,
            start_time: value.start_time,
            end_time: value.end_time,
            status: parse_booking_status(&value.status)?,
        })
    }
}

pub fn parse_booking_status(status: &str) -> Result<BookingStatus, AppError> {
    BookingStatus::from_str(status)
        .map_err(|_| AppError::ConversionEntityError(format!("unknown booking status: {status}")))
}
