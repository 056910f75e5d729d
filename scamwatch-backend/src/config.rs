// scamwatch-backend/src/config.rs
use dotenvy::dotenv;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_schema: Option<String>,
    pub db_max_connections: u32,
    pub log_filter: String,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let db_schema = env::var("DB_SCHEMA").ok().filter(|s| !s.trim().is_empty());
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 20)?;
        let log_filter = env::var("LOG_FILTER")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| "scamwatch_backend=info".to_string());
        let run_migrations = parse_bool("RUN_MIGRATIONS", true)?;

        Ok(Config {
            database_url,
            db_schema,
            db_max_connections,
            log_filter,
            run_migrations,
        })
    }
}

fn parse_var(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        Err(_) => Ok(default),
    }
}
