use axum::{
    routing::{get, patch, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{cancel_booking, create_booking, show_booking, show_my_bookings};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/my-bookings", get(show_my_bookings))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id/cancel", patch(cancel_booking));

    Router::new().nest("/bookings", booking_routers)
}
