use crate::{
    extractor::AuthorizedUser,
    model::booking::{
        BookingListQuery, BookingResponse, CreateBookingRequest, CreatedBookingResponse,
        PaginatedBookingsResponse, PricingResponse,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::{
    event::BookingEvent,
    model::{
        booking::{
            event::{CancelBooking, CreateBooking},
            MAX_BOOKING_HOURS,
        },
        id::BookingId,
    },
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;

    let period = req.period()?;
    if period.total_hours() > MAX_BOOKING_HOURS {
        return Err(AppError::UnprocessableEntity(format!(
            "Maximum booking duration is {MAX_BOOKING_HOURS} hours"
        )));
    }

    let event = CreateBooking::new(user.id(), req.room_id, period, req.notes);
    let booking = registry.booking_repository().create(event).await?;

    // fire-and-forget; a delivery failure never fails the booking
    registry
        .event_publisher()
        .publish(BookingEvent::created(&booking));

    let pricing = PricingResponse::from(&booking);
    Ok((
        StatusCode::CREATED,
        Json(CreatedBookingResponse {
            booking: booking.into(),
            pricing,
        }),
    ))
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PaginatedBookingsResponse>> {
    query.validate(&())?;

    registry
        .booking_repository()
        .find_by_user(user.id(), query.into())
        .await
        .map(PaginatedBookingsResponse::from)
        .map(Json)
}

pub async fn show_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_repository()
        .find_by_id(booking_id, user.id())
        .await
        .and_then(|booking| match booking {
            Some(booking) => Ok(Json(booking.into())),
            None => Err(AppError::EntityNotFound(format!(
                "Booking ({booking_id}) was not found"
            ))),
        })
}

pub async fn cancel_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    let event = CancelBooking::new(booking_id, user.id(), Utc::now());
    let booking = registry.booking_repository().cancel(event).await?;

    registry
        .event_publisher()
        .publish(BookingEvent::cancelled(&booking));

    Ok(Json(booking.into()))
}
