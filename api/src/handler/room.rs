use crate::{
    extractor::AuthorizedUser,
    model::room::{
        AvailabilityQuery, CreateRoomRequest, DailyScheduleResponse, RequestedTimeResponse,
        RoomAvailabilityResponse, RoomResponse, RoomScheduleResponse, RoomsResponse,
        UpdateRoomRequest, UpdateRoomRequestWithId,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    Json,
};
use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{id::RoomId, room::event::DeactivateRoom};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use std::{collections::HashMap, convert::Infallible};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

pub async fn show_room_list(State(registry): State<AppRegistry>) -> AppResult<Json<RoomsResponse>> {
    registry
        .room_repository()
        .find_all()
        .await
        .map(RoomsResponse::from)
        .map(Json)
}

pub async fn show_room(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomResponse>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await
        .and_then(|room| match room {
            Some(room) => Ok(Json(room.into())),
            None => Err(AppError::EntityNotFound(format!(
                "Room ({room_id}) was not found"
            ))),
        })
}

pub async fn check_room_availability(
    Path(room_id): Path<RoomId>,
    Query(query): Query<AvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<RoomAvailabilityResponse>> {
    query.validate(&())?;

    let room = registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("Room ({room_id}) was not found")))?;

    let period = query.period()?;
    let conflicts = registry
        .booking_repository()
        .find_conflicts(room_id, &period)
        .await?;

    Ok(Json(RoomAvailabilityResponse {
        room: room.into(),
        is_available: conflicts.is_empty(),
        requested_time: RequestedTimeResponse {
            date: query.date,
            start_time: query.start_time,
            end_time: query.end_time,
        },
        conflicting_bookings: conflicts.into_iter().map(Into::into).collect(),
    }))
}

pub async fn show_daily_schedule(
    Path(date): Path<String>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DailyScheduleResponse>> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::UnprocessableEntity("Valid date required (YYYY-MM-DD)".into()))?;

    let rooms = registry.room_repository().find_all().await?;
    let slots = registry.booking_repository().find_slots_on_date(date).await?;

    let mut slots_by_room: HashMap<RoomId, Vec<_>> = HashMap::new();
    for slot in slots {
        slots_by_room
            .entry(slot.room_id)
            .or_default()
            .push(slot.into());
    }

    let rooms = rooms
        .into_iter()
        .map(|room| {
            let booked_slots = slots_by_room.remove(&room.room_id).unwrap_or_default();
            RoomScheduleResponse {
                room: room.into(),
                booked_slots,
            }
        })
        .collect();

    Ok(Json(DailyScheduleResponse {
        date: date.to_string(),
        rooms,
    }))
}

/// Server-sent stream of booking events on one room's channel.
pub async fn subscribe_room_events(
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>> {
    registry
        .room_repository()
        .find_by_id(room_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("Room ({room_id}) was not found")))?;

    let rx = registry.event_hub().subscribe(room_id);
    let stream = BroadcastStream::new(rx).filter_map(|event| {
        // a lagged receiver just skips ahead
        let event = event.ok()?;
        SseEvent::default()
            .event(event.name())
            .json_data(&event)
            .ok()
            .map(Ok)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

pub async fn register_room(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateRoomRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .room_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn update_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateRoomRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let update_room = UpdateRoomRequestWithId::new(room_id, req);
    registry
        .room_repository()
        .update(update_room.into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_room(
    user: AuthorizedUser,
    Path(room_id): Path<RoomId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .room_repository()
        .deactivate(DeactivateRoom::new(room_id))
        .await?;

    // nobody will book here again; drop the event channel as well
    registry.event_hub().remove(&room_id);

    Ok(StatusCode::OK)
}
