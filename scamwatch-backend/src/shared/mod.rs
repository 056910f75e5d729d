// scamwatch-backend/src/shared/mod.rs
pub mod dto;
pub mod validation;
