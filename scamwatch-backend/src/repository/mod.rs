// scamwatch-backend/src/repository/mod.rs
pub mod case_cascade_repository;
pub mod case_file_repository;
pub mod moderated_repository;
pub mod role_grant_repository;
pub mod user_repository;
