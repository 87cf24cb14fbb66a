use crate::model::booking::{parse_period, BookingSlotResponse};
use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::BookingPeriod,
    id::RoomId,
    room::{
        event::{CreateRoom, UpdateRoom},
        Room,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

fn positive_rate(value: &Decimal, _context: &()) -> garde::Result {
    if *value <= Decimal::ZERO {
        return Err(garde::Error::new("Hourly rate must be positive"));
    }
    Ok(())
}

fn positive_rate_opt(value: &Option<Decimal>, context: &()) -> garde::Result {
    match value {
        Some(rate) => positive_rate(rate, context),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[garde(length(min = 1, max = 100))]
    pub room_name: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
    #[garde(custom(positive_rate))]
    pub hourly_rate: Decimal,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub image_url: Option<String>,
}

impl From<CreateRoomRequest> for CreateRoom {
    fn from(value: CreateRoomRequest) -> Self {
        let CreateRoomRequest {
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
        } = value;
        CreateRoom {
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[garde(inner(length(min = 1, max = 100)))]
    pub room_name: Option<String>,
    #[garde(inner(range(min = 1)))]
    pub capacity: Option<i32>,
    #[garde(custom(positive_rate_opt))]
    pub hourly_rate: Option<Decimal>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub image_url: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
}

#[derive(new)]
pub struct UpdateRoomRequestWithId(RoomId, UpdateRoomRequest);

impl From<UpdateRoomRequestWithId> for UpdateRoom {
    fn from(value: UpdateRoomRequestWithId) -> Self {
        let UpdateRoomRequestWithId(
            room_id,
            UpdateRoomRequest {
                room_name,
                capacity,
                hourly_rate,
                description,
                image_url,
                is_active,
            },
        ) = value;
        UpdateRoom {
            room_id,
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
            is_active,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: i32,
    pub hourly_rate: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            room_name,
            capacity,
            hourly_rate,
            description,
            image_url,
            is_active,
            created_at,
        } = value;
        Self {
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsResponse {
    pub items: Vec<RoomResponse>,
}

impl From<Vec<Room>> for RoomsResponse {
    fn from(value: Vec<Room>) -> Self {
        Self {
            items: value.into_iter().map(RoomResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[garde(pattern(r"^\d{4}-\d{2}-\d{2}$"))]
    pub date: String,
    #[garde(pattern(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$"))]
    pub start_time: String,
    #[garde(pattern(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$"))]
    pub end_time: String,
}

impl AvailabilityQuery {
    pub fn period(&self) -> AppResult<BookingPeriod> {
        parse_period(&self.date, &self.start_time, &self.end_time)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedTimeResponse {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailabilityResponse {
    pub room: RoomResponse,
    pub is_available: bool,
    pub requested_time: RequestedTimeResponse,
    pub conflicting_bookings: Vec<BookingSlotResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomScheduleResponse {
    pub room: RoomResponse,
    pub booked_slots: Vec<BookingSlotResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScheduleResponse {
    pub date: String,
    pub rooms: Vec<RoomScheduleResponse>,
}
