use crate::database::{
    model::booking::{parse_booking_status, BookingRow, BookingSlotRow, BookingStateRow},
    model::room::RoomRow,
    ConnectionPool,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        pricing, qr::QrPayload, Booking, BookingListOptions, BookingPeriod, BookingSlot,
        BookingStatus, PaymentStatus, CANCELLATION_CUTOFF_HOURS,
    },
    id::{BookingId, RoomId, UserId},
    list::PaginatedList,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

const SELECT_BOOKING: &str = r#"
    SELECT
        b.booking_id,
        b.user_id,
        b.room_id,
        b.start_time,
        b.end_time,
        b.total_hours,
        b.total_price,
        b.discount_percent,
        b.final_price,
        b.qr_code,
        b.status,
        b.payment_status,
        b.notes,
        b.booked_at,
        r.room_name,
        r.capacity,
        r.hourly_rate
    FROM bookings AS b
    INNER JOIN rooms AS r ON b.room_id = r.room_id
"#;

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // The availability check and the insert below must observe one
        // consistent snapshot; under SERIALIZABLE one of two racing
        // overlapping inserts aborts at commit.
        self.set_transaction_serializable(&mut tx).await?;

        let room: Option<RoomRow> = sqlx::query_as(
            r#"
            SELECT room_id, room_name, capacity, hourly_rate,
                   description, image_url, is_active, created_at
            FROM rooms
            WHERE room_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(event.room_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let room = room.ok_or_else(|| {
            AppError::EntityNotFound(format!("Room ({}) was not found", event.room_id))
        })?;

        // Overlap test for half-open intervals:
        //     existing.start < new.end AND new.start < existing.end
        // Bookings that merely touch at a boundary pass.
        let conflict = sqlx::query(
            r#"
            SELECT booking_id
            FROM bookings
            WHERE room_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_time < $3
              AND $2 < end_time
            LIMIT 1
            "#,
        )
        .bind(event.room_id)
        .bind(event.period.start())
        .bind(event.period.end())
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if conflict.is_some() {
            return Err(AppError::ResourceConflict(
                "Room is not available for the selected time".into(),
            ));
        }

        let pricing = pricing::quote(event.period.total_hours(), room.hourly_rate)?;

        // The id is generated here so the check-in artifact can be written
        // in the same insert as the booking row.
        let booking_id = BookingId::new();
        let qr_code = QrPayload::from_period(
            booking_id,
            event.booked_by,
            room.room_id,
            room.room_name.clone(),
            &event.period,
        )
        .to_data_url()?;

        let res = sqlx::query(
            r#"
            INSERT INTO bookings
            (booking_id, user_id, room_id, start_time, end_time, total_hours,
             total_price, discount_percent, final_price, qr_code,
             status, payment_status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(booking_id)
        .bind(event.booked_by)
        .bind(event.room_id)
        .bind(event.period.start())
        .bind(event.period.end())
        .bind(pricing.total_hours)
        .bind(pricing.total_price)
        .bind(pricing.discount_percent)
        .bind(pricing.final_price)
        .bind(&qr_code)
        .bind(BookingStatus::Pending.as_ref())
        .bind(PaymentStatus::Pending.as_ref())
        .bind(&event.notes)
        .execute(&mut *tx)
        .await
        .map_err(map_serialization_failure)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        let row: BookingRow = sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
            .bind(booking_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_serialization_failure)?;

        tx.commit().await.map_err(map_serialization_failure)?;

        row.try_into()
    }

    async fn cancel(&self, event: CancelBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // The row lock keeps two concurrent cancels from both passing the
        // status check, so a refund is never applied twice.
        let state: Option<BookingStateRow> = sqlx::query_as(
            r#"
            SELECT booking_id, room_id, status, start_time
            FROM bookings
            WHERE booking_id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(event.booking_id)
        .bind(event.requested_user)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let state = state.ok_or_else(|| {
            AppError::EntityNotFound(format!("Booking ({}) was not found", event.booking_id))
        })?;

        match parse_booking_status(&state.status)? {
            BookingStatus::Cancelled => {
                return Err(AppError::UnprocessableEntity(
                    "Booking is already cancelled".into(),
                ))
            }
            BookingStatus::Completed => {
                return Err(AppError::UnprocessableEntity(
                    "Cannot cancel a completed booking".into(),
                ))
            }
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }

        if state.start_time - event.requested_at < Duration::hours(CANCELLATION_CUTOFF_HOURS) {
            return Err(AppError::UnprocessableEntity(format!(
                "Cannot cancel booking less than {CANCELLATION_CUTOFF_HOURS} hour before start time"
            )));
        }

        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $1, payment_status = $2
            WHERE booking_id = $3
            "#,
        )
        .bind(BookingStatus::Cancelled.as_ref())
        .bind(PaymentStatus::Refunded.as_ref())
        .bind(event.booking_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been cancelled".into(),
            ));
        }

        let row: BookingRow = sqlx::query_as(&format!("{SELECT_BOOKING} WHERE b.booking_id = $1"))
            .bind(event.booking_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        row.try_into()
    }

    async fn find_conflicts(
        &self,
        room_id: RoomId,
        period: &BookingPeriod,
    ) -> AppResult<Vec<BookingSlot>> {
        let rows: Vec<BookingSlotRow> = sqlx::query_as(
            r#"
            SELECT booking_id, room_id, start_time, end_time, status
            FROM bookings
            WHERE room_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_time < $3
              AND $2 < end_time
            ORDER BY start_time
            "#,
        )
        .bind(room_id)
        .bind(period.start())
        .bind(period.end())
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_id(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "{SELECT_BOOKING} WHERE b.booking_id = $1 AND b.user_id = $2"
        ))
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        options: BookingListOptions,
    ) -> AppResult<PaginatedList<Booking>> {
        let BookingListOptions {
            status,
            limit,
            offset,
        } = options;

        let (total, rows): (i64, Vec<BookingRow>) = match status {
            Some(status) => {
                let total = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM bookings WHERE user_id = $1 AND status = $2",
                )
                .bind(user_id)
                .bind(status.as_ref())
                .fetch_one(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
                let rows = sqlx::query_as(&format!(
                    r#"{SELECT_BOOKING}
                    WHERE b.user_id = $1 AND b.status = $2
                    ORDER BY b.booked_at DESC, b.start_time DESC
                    LIMIT $3 OFFSET $4"#
                ))
                .bind(user_id)
                .bind(status.as_ref())
                .bind(limit)
                .bind(offset)
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
                (total, rows)
            }
            None => {
                let total = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
                    .bind(user_id)
                    .fetch_one(self.db.inner_ref())
                    .await
                    .map_err(AppError::SpecificOperationError)?;
                let rows = sqlx::query_as(&format!(
                    r#"{SELECT_BOOKING}
                    WHERE b.user_id = $1
                    ORDER BY b.booked_at DESC, b.start_time DESC
                    LIMIT $2 OFFSET $3"#
                ))
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
                (total, rows)
            }
        };

        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<AppResult<Vec<Booking>>>()?;

        Ok(PaginatedList {
            total,
            limit,
            offset,
            items,
        })
    }

    async fn find_slots_on_date(&self, date: NaiveDate) -> AppResult<Vec<BookingSlot>> {
        let rows: Vec<BookingSlotRow> = sqlx::query_as(
            r#"
            SELECT booking_id, room_id, start_time, end_time, status
            FROM bookings
            WHERE (start_time AT TIME ZONE 'UTC')::date = $1
              AND status IN ('pending', 'confirmed')
            ORDER BY room_id, start_time
            "#,
        )
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

impl BookingRepositoryImpl {
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }
}

/// A SERIALIZABLE abort (SQLSTATE 40001) means another transaction won the
/// race for the same slot; the caller sees the same conflict as a failed
/// availability check.
fn map_serialization_failure(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(de) if de.code().as_deref() == Some("40001") => {
            AppError::ResourceConflict("Room is not available for the selected time".into())
        }
        _ => AppError::SpecificOperationError(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::PgPool;

    async fn seed_user(pool: &PgPool) -> anyhow::Result<UserId> {
        let user_id = UserId::new();
        let n = user_id.raw().as_u128();
        sqlx::query(
            r#"
            INSERT INTO users
            (user_id, email, phone, national_id, first_name, last_name, password_hash)
            VALUES ($1, $2, $3, $4, 'Somchai', 'Jaidee', 'not-a-real-hash')
            "#,
        )
        .bind(user_id)
        .bind(format!("{user_id}@example.com"))
        .bind(format!("0{:09}", n % 1_000_000_000))
        .bind(format!("{:013}", n % 10_000_000_000_000))
        .execute(pool)
        .await?;
        Ok(user_id)
    }

    async fn seed_room(pool: &PgPool, hourly_rate: Decimal) -> anyhow::Result<RoomId> {
        let room_id = RoomId::new();
        sqlx::query(
            r#"
            INSERT INTO rooms (room_id, room_name, capacity, hourly_rate)
            VALUES ($1, 'Reading Room A', 5, $2)
            "#,
        )
        .bind(room_id)
        .bind(hourly_rate)
        .execute(pool)
        .await?;
        Ok(room_id)
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, hour, min, 0).unwrap()
    }

    fn period(start_hour: u32, end_hour: u32) -> BookingPeriod {
        BookingPeriod::new(at(start_hour, 0), at(end_hour, 0)).unwrap()
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn create_prices_and_persists_the_booking(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let booking = repo
            .create(CreateBooking::new(
                user_id,
                room_id,
                period(9, 14),
                Some("window seat please".into()),
            ))
            .await?;

        assert_eq!(booking.total_hours, 5);
        assert_eq!(booking.total_price, dec!(250.00));
        assert_eq!(booking.discount_percent, dec!(15));
        assert_eq!(booking.final_price, dec!(212.50));
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking
            .qr_code
            .as_deref()
            .is_some_and(|qr| qr.starts_with("data:application/json;base64,")));

        let found = repo.find_by_id(booking.booking_id, user_id).await?;
        assert!(found.is_some());
        // the booking is invisible to other users
        let other = repo.find_by_id(booking.booking_id, UserId::new()).await?;
        assert!(other.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn overlapping_booking_is_rejected(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        repo.create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;

        let res = repo
            .create(CreateBooking::new(user_id, room_id, period(11, 13), None))
            .await;
        assert!(matches!(res, Err(AppError::ResourceConflict(_))));

        let conflicts = repo.find_conflicts(room_id, &period(11, 13)).await?;
        assert_eq!(conflicts.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn touching_bookings_do_not_conflict(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        repo.create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;
        // starts exactly when the first one ends
        repo.create(CreateBooking::new(user_id, room_id, period(12, 14), None))
            .await?;

        assert!(repo.find_conflicts(room_id, &period(14, 15)).await?.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn inactive_room_reads_as_not_found(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;
        sqlx::query("UPDATE rooms SET is_active = FALSE WHERE room_id = $1")
            .bind(room_id)
            .execute(&pool)
            .await?;

        let res = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancelled_booking_frees_the_slot(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let booking = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;

        let cancelled = repo
            .cancel(CancelBooking::new(
                booking.booking_id,
                user_id,
                at(8, 0),
            ))
            .await?;
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

        // the interval is bookable again
        repo.create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancelling_twice_fails(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let booking = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;

        repo.cancel(CancelBooking::new(booking.booking_id, user_id, at(8, 0)))
            .await?;
        let res = repo
            .cancel(CancelBooking::new(booking.booking_id, user_id, at(8, 0)))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancellation_window_is_enforced(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let booking = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;

        // 30 minutes before start: too late
        let res = repo
            .cancel(CancelBooking::new(booking.booking_id, user_id, at(9, 30)))
            .await;
        assert!(matches!(res, Err(AppError::UnprocessableEntity(_))));

        // 3 hours before start: fine
        repo.cancel(CancelBooking::new(booking.booking_id, user_id, at(7, 0)))
            .await?;
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn cancel_requires_ownership(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let other_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let booking = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;

        let res = repo
            .cancel(CancelBooking::new(booking.booking_id, other_id, at(8, 0)))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn concurrent_overlapping_creates_admit_exactly_one(
        pool: PgPool,
    ) -> anyhow::Result<()> {
        let repo = std::sync::Arc::new(BookingRepositoryImpl::new(ConnectionPool::new(
            pool.clone(),
        )));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let first = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(CreateBooking::new(user_id, room_id, period(10, 12), None))
                    .await
            })
        };
        let second = {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create(CreateBooking::new(user_id, room_id, period(11, 13), None))
                    .await
            })
        };

        let (first, second) = tokio::join!(first, second);
        let outcomes = [first?, second?];
        let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);

        let conflicts = repo.find_conflicts(room_id, &period(9, 14)).await?;
        assert_eq!(conflicts.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn listing_filters_by_status_and_paginates(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let first = repo
            .create(CreateBooking::new(user_id, room_id, period(8, 9), None))
            .await?;
        repo.create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;
        repo.cancel(CancelBooking::new(first.booking_id, user_id, at(6, 0)))
            .await?;

        let all = repo
            .find_by_user(
                user_id,
                BookingListOptions {
                    status: None,
                    limit: 10,
                    offset: 0,
                },
            )
            .await?;
        assert_eq!(all.total, 2);
        assert_eq!(all.items.len(), 2);

        let cancelled = repo
            .find_by_user(
                user_id,
                BookingListOptions {
                    status: Some(BookingStatus::Cancelled),
                    limit: 10,
                    offset: 0,
                },
            )
            .await?;
        assert_eq!(cancelled.total, 1);
        assert_eq!(cancelled.items[0].booking_id, first.booking_id);

        let paged = repo
            .find_by_user(
                user_id,
                BookingListOptions {
                    status: None,
                    limit: 1,
                    offset: 1,
                },
            )
            .await?;
        assert_eq!(paged.total, 2);
        assert_eq!(paged.items.len(), 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../migrations")]
    async fn day_schedule_lists_active_slots(pool: PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));
        let user_id = seed_user(&pool).await?;
        let room_id = seed_room(&pool, dec!(50)).await?;

        let kept = repo
            .create(CreateBooking::new(user_id, room_id, period(10, 12), None))
            .await?;
        let dropped = repo
            .create(CreateBooking::new(user_id, room_id, period(13, 14), None))
            .await?;
        repo.cancel(CancelBooking::new(dropped.booking_id, user_id, at(6, 0)))
            .await?;

        let slots = repo
            .find_slots_on_date(at(0, 0).date_naive())
            .await?;
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].booking_id, kept.booking_id);
        Ok(())
    }
}
