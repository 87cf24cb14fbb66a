use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::notifier::RoomEventHub;
use adapter::redis::RedisClient;
use adapter::repository::auth::AuthRepositoryImpl;
use adapter::repository::booking::BookingRepositoryImpl;
use adapter::repository::health::HealthCheckRepositoryImpl;
use adapter::repository::room::RoomRepositoryImpl;
use adapter::repository::user::UserRepositoryImpl;
use kernel::event::EventPublisher;
use kernel::repository::auth::AuthRepository;
use kernel::repository::booking::BookingRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::room::RoomRepository;
use kernel::repository::user::UserRepository;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    room_repository: Arc<dyn RoomRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    user_repository: Arc<dyn UserRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    event_hub: Arc<RoomEventHub>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, redis_client: Arc<RedisClient>, app_config: AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let room_repository = Arc::new(RoomRepositoryImpl::new(pool.clone()));
        let booking_repository = Arc::new(BookingRepositoryImpl::new(pool.clone()));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            app_config.auth.ttl,
        ));
        let event_hub = Arc::new(RoomEventHub::new());
        Self {
            health_check_repository,
            room_repository,
            booking_repository,
            user_repository,
            auth_repository,
            event_hub,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn room_repository(&self) -> Arc<dyn RoomRepository> {
        self.room_repository.clone()
    }

    pub fn booking_repository(&self) -> Arc<dyn BookingRepository> {
        self.booking_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn event_publisher(&self) -> Arc<dyn EventPublisher> {
        self.event_hub.clone()
    }

    pub fn event_hub(&self) -> Arc<RoomEventHub> {
        self.event_hub.clone()
    }
}
