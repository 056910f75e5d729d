// scamwatch-backend/src/lib.rs
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod shared;

// Re-export commonly used types
pub use error::{AppError, AppResult, ErrorKind};
pub use service::policy_facade::{CoreResponse, Operation, PolicyFacade};
