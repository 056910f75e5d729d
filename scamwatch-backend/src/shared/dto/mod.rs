// scamwatch-backend/src/shared/dto/mod.rs
pub mod alert_dto;
pub mod case_dto;
pub mod case_file_dto;
pub mod comment_dto;
pub mod record_input;
pub mod report_dto;
pub mod role_change_request_dto;
