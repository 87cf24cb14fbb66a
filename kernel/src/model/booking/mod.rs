use crate::model::id::{BookingId, RoomId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use strum::{AsRefStr, Display, EnumString};

pub mod event;
pub mod pricing;
pub mod qr;

/// Hard cap on a single booking.
pub const MAX_BOOKING_HOURS: i32 = 12;

/// Bookings can no longer be cancelled closer to their start than this.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 1;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

/// A half-open time interval `[start, end)`. Construction guarantees
/// `end > start`, so every period in the system is well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::UnprocessableEntity(
                "End time must be after start time".into(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Billable length of the period, rounded up to whole hours.
    pub fn total_hours(&self) -> i32 {
        let minutes = (self.end - self.start).num_minutes();
        ((minutes + 59) / 60) as i32
    }

    /// Two half-open intervals overlap iff each starts before the other
    /// ends. Periods that merely touch at a boundary do not overlap.
    pub fn overlaps(&self, other: &BookingPeriod) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug)]
pub struct Booking {
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
    pub room: BookingRoom,
}

#[derive(Debug)]
pub struct BookingRoom {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
}

/// One occupied slot on a room, as returned by conflict and schedule
/// queries.
#[derive(Debug)]
pub struct BookingSlot {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug)]
pub struct BookingListOptions {
    pub status: Option<BookingStatus>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    #[test]
    fn period_rejects_inverted_and_empty_intervals() {
        assert!(BookingPeriod::new(at(10, 0), at(9, 0)).is_err());
        assert!(BookingPeriod::new(at(10, 0), at(10, 0)).is_err());
    }

    #[test]
    fn total_hours_rounds_up() {
        let exact = BookingPeriod::new(at(9, 0), at(14, 0)).unwrap();
        assert_eq!(exact.total_hours(), 5);

        let partial = BookingPeriod::new(at(9, 0), at(10, 30)).unwrap();
        assert_eq!(partial.total_hours(), 2);

        let short = BookingPeriod::new(at(9, 0), at(9, 15)).unwrap();
        assert_eq!(short.total_hours(), 1);
    }

    #[test]
    fn overlapping_periods_are_detected() {
        let a = BookingPeriod::new(at(10, 0), at(12, 0)).unwrap();
        let b = BookingPeriod::new(at(11, 0), at(13, 0)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let contained = BookingPeriod::new(at(10, 30), at(11, 30)).unwrap();
        assert!(a.overlaps(&contained));
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        let a = BookingPeriod::new(at(10, 0), at(12, 0)).unwrap();
        let b = BookingPeriod::new(at(12, 0), at(14, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn disjoint_periods_do_not_overlap() {
        let a = BookingPeriod::new(at(8, 0), at(9, 0)).unwrap();
        let b = BookingPeriod::new(at(12, 0), at(14, 0)).unwrap();
        assert!(!a.overlaps(&b));
    }
}
