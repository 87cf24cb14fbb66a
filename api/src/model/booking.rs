use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingListOptions, BookingPeriod, BookingRoom, BookingSlot,
        BookingStatus, PaymentStatus},
    id::{BookingId, RoomId, UserId},
    list::PaginatedList,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

/// Parses a `YYYY-MM-DD` date plus two `HH:MM` wall-clock times into a
/// period on that day. Times are interpreted as UTC.
pub fn parse_period(date: &str, start_time: &str, end_time: &str) -> AppResult<BookingPeriod> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::UnprocessableEntity("Valid date required (YYYY-MM-DD)".into()))?;
    let start = NaiveTime::parse_from_str(start_time, "%H:%M")
        .map_err(|_| AppError::UnprocessableEntity("Valid start time required (HH:MM)".into()))?;
    let end = NaiveTime::parse_from_str(end_time, "%H:%M")
        .map_err(|_| AppError::UnprocessableEntity("Valid end time required (HH:MM)".into()))?;
    BookingPeriod::new(date.and_time(start).and_utc(), date.and_time(end).and_utc())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub room_id: RoomId,
    #[garde(pattern(r"^\d{4}-\d{2}-\d{2}$"))]
    pub date: String,
    #[garde(pattern(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$"))]
    pub start_time: String,
    #[garde(pattern(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$"))]
    pub end_time: String,
    #[garde(skip)]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    pub fn period(&self) -> AppResult<BookingPeriod> {
        parse_period(&self.date, &self.start_time, &self.end_time)
    }
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    #[garde(skip)]
    pub status: Option<BookingStatus>,
    #[garde(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[garde(range(min = 0))]
    #[serde(default)]
    pub offset: i64,
}

impl From<BookingListQuery> for BookingListOptions {
    fn from(value: BookingListQuery) -> Self {
        let BookingListQuery {
            status,
            limit,
            offset,
        } = value;
        BookingListOptions {
            status,
            limit,
            offset,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booked_by: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_hours: i32,
    pub total_price: Decimal,
    pub discount_percent: Decimal,
    pub final_price: Decimal,
    pub qr_code: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub booked_at: DateTime<Utc>,
    pub room: BookingRoomResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booked_by,
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
            room,
        } = value;
        Self {
            booking_id,
            booked_by,
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
            room: room.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
}

impl From<BookingRoom> for BookingRoomResponse {
    fn from(value: BookingRoom) -> Self {
        let BookingRoom {
            room_id,
            room_name,
            capacity,
            hourly_rate,
        } = value;
        Self {
            room_id,
            room_name,
            capacity,
            hourly_rate,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    pub total_hours: i32,
    pub total_price: Decimal,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

impl From<&Booking> for PricingResponse {
    fn from(value: &Booking) -> Self {
        Self {
            total_hours: value.total_hours,
            total_price: value.total_price,
            discount_percent: value.discount_percent,
            discount_amount: value.total_price - value.final_price,
            final_price: value.final_price,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBookingResponse {
    pub booking: BookingResponse,
    pub pricing: PricingResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedBookingsResponse {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<BookingResponse>,
}

impl From<PaginatedList<Booking>> for PaginatedBookingsResponse {
    fn from(value: PaginatedList<Booking>) -> Self {
        let PaginatedList {
            total,
            limit,
            offset,
            items,
        } = value;
        Self {
            total,
            limit,
            offset,
            items: items.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlotResponse {
    pub booking_id: BookingId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

impl From<BookingSlot> for BookingSlotResponse {
    fn from(value: BookingSlot) -> Self {
        Self {
            booking_id: value.booking_id,
            start_time: value.start_time,
            end_time: value.end_time,
            status: value.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_parsing_accepts_plain_dates_and_times() {
        let period = parse_period("2024-01-01", "10:00", "12:30").unwrap();
        assert_eq!(period.total_hours(), 3);
    }

    #[test]
    fn period_parsing_rejects_inverted_ranges() {
        assert!(parse_period("2024-01-01", "12:00", "10:00").is_err());
        assert!(parse_period("2024-01-01", "12:00", "12:00").is_err());
    }

    #[test]
    fn period_parsing_rejects_garbage() {
        assert!(parse_period("01-01-2024", "10:00", "12:00").is_err());
        assert!(parse_period("2024-01-01", "25:00", "26:00").is_err());
        assert!(parse_period("2024-01-01", "ten", "twelve").is_err());
    }
}
