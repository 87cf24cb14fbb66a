use crate::model::{
    booking::{Booking, BookingStatus},
    id::{BookingId, RoomId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Room-scoped event published when a booking changes. Delivery is
/// best-effort and at-most-once; subscribers that miss an event never see
/// it again.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BookingEvent {
    #[serde(rename_all = "camelCase")]
    Created {
        room_id: RoomId,
        booking: BookingEventBody,
    },
    #[serde(rename_all = "camelCase")]
    Cancelled {
        room_id: RoomId,
        booking_id: BookingId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingEventBody {
    pub booking_id: BookingId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
}

impl BookingEvent {
    pub fn created(booking: &Booking) -> Self {
        Self::Created {
            room_id: booking.room.room_id,
            booking: BookingEventBody {
                booking_id: booking.booking_id,
                start_time: booking.start_time,
                end_time: booking.end_time,
                status: booking.status,
            },
        }
    }

    pub fn cancelled(booking: &Booking) -> Self {
        Self::Cancelled {
            room_id: booking.room.room_id,
            booking_id: booking.booking_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BookingEvent::Created { .. } => "booking-created",
            BookingEvent::Cancelled { .. } => "booking-cancelled",
        }
    }

    pub fn room_id(&self) -> RoomId {
        match self {
            BookingEvent::Created { room_id, .. } => *room_id,
            BookingEvent::Cancelled { room_id, .. } => *room_id,
        }
    }
}

/// Publishing is fire-and-forget: an event nobody listens to is dropped
/// and a delivery failure never fails the operation that produced it.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: BookingEvent);
}
