use crate::database::{model::room::RoomRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::RoomId,
    room::{
        event::{CreateRoom, DeactivateRoom, UpdateRoom},
        Room,
    },
};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn create(&self, event: CreateRoom) -> AppResult<RoomId> {
        let room_id = RoomId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO rooms (room_id, room_name, capacity, hourly_rate, description, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(room_id)
        .bind(&event.room_name)
        .bind(event.capacity)
        .bind(event.hourly_rate)
        .bind(&event.description)
        .bind(&event.image_url)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No room record has been created".into(),
            ));
        }

        Ok(room_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Room>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT room_id, room_name, capacity, hourly_rate,
                   description, image_url, is_active, created_at
            FROM rooms
            WHERE is_active = TRUE
            ORDER BY capacity, room_name
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find_by_id(&self, room_id: RoomId) -> AppResult<Option<Room>> {
        let row: Option<RoomRow> = sqlx::query_as(
            r#"
            SELECT room_id, room_name, capacity, hourly_rate,
                   description, image_url, is_active, created_at
            FROM rooms
            WHERE room_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Room::from))
    }

    async fn update(&self, event: UpdateRoom) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE rooms
            SET room_name = COALESCE($2, room_name),
                capacity = COALESCE($3, capacity),
                hourly_rate = COALESCE($4, hourly_rate),
                description = COALESCE($5, description),
                image_url = COALESCE($6, image_url),
                is_active = COALESCE($7, is_active)
            WHERE room_id = $1
            "#,
        )
        .bind(event.room_id)
        .bind(&event.room_name)
        .bind(event.capacity)
        .bind(event.hourly_rate)
        .bind(&event.description)
        .bind(&event.image_url)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Room ({}) was not found",
                event.room_id
            )));
        }

        Ok(())
    }

    async fn deactivate(&self, event: DeactivateRoom) -> AppResult<()> {
        let res = sqlx::query("UPDATE rooms SET is_active = FALSE WHERE room_id = $1")
            .bind(event.room_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "Room ({}) was not found",
                event.room_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    #[sqlx::test(migrations = "../migrations")]
    async fn register_and_list_rooms(pool: PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));

        let room_id = repo
            .create(CreateRoom::new(
                "Meeting Room C".into(),
                10,
                dec!(80),
                Some("Spacious room for larger groups".into()),
                None,
            ))
            .await?;

        let rooms = repo.find_all().await?;
        // four seeded rooms plus the one just created
        assert!(rooms.iter().any(|r| r.room_id == room_id));

        let room = repo.find_by_id(room_id).await?.unwrap();
        assert_eq!(room.room_name, "Meeting Room C");
        assert_eq!(room.capacity, 10);
        assert_eq!(room.hourly_rate, dec!(80));
        assert!(room.is_active);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn partial_update_keeps_other_fields(pool: PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));
        let room_id = repo
            .create(CreateRoom::new("Reading Room Z".into(), 5, dec!(50), None, None))
            .await?;

        repo.update(UpdateRoom::new(
            room_id,
            None,
            None,
            Some(dec!(65)),
            None,
            None,
            None,
        ))
        .await?;

        let room = repo.find_by_id(room_id).await?.unwrap();
        assert_eq!(room.room_name, "Reading Room Z");
        assert_eq!(room.hourly_rate, dec!(65));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn deactivated_rooms_disappear_from_lookups(pool: PgPool) -> anyhow::Result<()> {
        let repo = RoomRepositoryImpl::new(ConnectionPool::new(pool));
        let room_id = repo
            .create(CreateRoom::new("Pop-up Room".into(), 4, dec!(40), None, None))
            .await?;

        repo.deactivate(DeactivateRoom::new(room_id)).await?;

        assert!(repo.find_by_id(room_id).await?.is_none());
        assert!(!repo.find_all().await?.iter().any(|r| r.room_id == room_id));
        Ok(())
    }
}
