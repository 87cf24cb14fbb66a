use crate::{
    extractor::AuthorizedUser,
    model::user::{UserResponse, UserStatsResponse},
};
use axum::{extract::State, Json};
use registry::AppRegistry;
use shared::error::AppResult;

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(user.user.into())
}

pub async fn get_current_user_stats(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<UserStatsResponse>> {
    registry
        .user_repository()
        .find_stats(user.id())
        .await
        .map(UserStatsResponse::from)
        .map(Json)
}
