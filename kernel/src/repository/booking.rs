use crate::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        Booking, BookingListOptions, BookingPeriod, BookingSlot,
    },
    id::{BookingId, RoomId, UserId},
    list::PaginatedList,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Creates a booking. The availability check and the insert run in one
    /// serialized transaction, so two overlapping requests for the same
    /// room cannot both succeed.
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;

    /// Cancels a booking on behalf of its owner and marks the payment
    /// refunded.
    async fn cancel(&self, event: CancelBooking) -> AppResult<Booking>;

    /// Returns every pending or confirmed booking on the room whose
    /// interval overlaps the candidate period.
    async fn find_conflicts(
        &self,
        room_id: RoomId,
        period: &BookingPeriod,
    ) -> AppResult<Vec<BookingSlot>>;

    async fn find_by_id(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>>;

    async fn find_by_user(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<PaginatedList<Booking>>;

    /// Occupied slots across all rooms for one calendar day.
    async fn find_slots_on_date(&self, date: NaiveDate) -> AppResult<Vec<BookingSlot>>;
}
