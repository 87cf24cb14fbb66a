use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::room::{
    check_room_availability, delete_room, register_room, show_daily_schedule, show_room,
    show_room_list, subscribe_room_events, update_room,
};

pub fn build_room_routers() -> Router<AppRegistry> {
    let room_routers = Router::new()
        .route("/", post(register_room))
        .route("/", get(show_room_list))
        .route("/availability/date/:date", get(show_daily_schedule))
        .route("/:room_id", get(show_room))
        .route("/:room_id", put(update_room))
        .route("/:room_id", delete(delete_room))
        .route("/:room_id/availability", get(check_room_availability))
        .route("/:room_id/events", get(subscribe_room_events));

    Router::new().nest("/rooms", room_routers)
}
