use anyhow::Result;
use std::env;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env::var("DATABASE_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env::var("DATABASE_PORT")
                .unwrap_or_else(|_| "5432".into())
                .parse()?,
            username: env::var("DATABASE_USERNAME").unwrap_or_else(|_| "app".into()),
            password: env::var("DATABASE_PASSWORD").unwrap_or_else(|_| "passwd".into()),
            database: env::var("DATABASE_NAME").unwrap_or_else(|_| "app".into()),
        };
        let redis = RedisConfig {
            host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env::var("REDIS_PORT")
                .unwrap_or_else(|_| "6379".into())
                .parse()?,
        };
        let auth = AuthConfig {
            // access tokens live for a day unless configured otherwise
            ttl: env::var("AUTH_TOKEN_TTL")
                .unwrap_or_else(|_| "86400".into())
                .parse()?,
        };
        Ok(Self {
            database,
            redis,
            auth,
        })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct RedisConfig {
    pub host: String,
    pub port: u16,
}

pub struct AuthConfig {
    pub ttl: u64,
}
