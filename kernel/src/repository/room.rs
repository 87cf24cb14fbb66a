use crate::model::{
    id::RoomId,
    room::{
        event::{CreateRoom, DeactivateRoom, UpdateRoom},
        Room,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId>;
    // active rooms only, ordered for the public listing
    async fn find_all(&self) -> AppResult<Vec<Room>>;
    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>>;
    async fn update(&self, event: UpdateRoom) -> AppResult<()>;
    // soft delete; existing bookings keep their room reference
    async fn deactivate(&self, event: DeactivateRoom) -> AppResult<()>;
}
