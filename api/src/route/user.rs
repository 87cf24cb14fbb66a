use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::user::{get_current_user, get_current_user_stats};

pub fn build_user_routers() -> Router<AppRegistry> {
    let user_routers = Router::new()
        .route("/me", get(get_current_user))
        .route("/me/stats", get(get_current_user_stats));

    Router::new().nest("/users", user_routers)
}
