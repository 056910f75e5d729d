// scamwatch-backend/src/domain/mod.rs
pub mod alert_model;
pub mod case_document_model;
pub mod case_evidence_model;
pub mod case_model;
pub mod comment_model;
pub mod entity_kind;
pub mod moderated_record;
pub mod moderation_status;
pub mod record_filter;
pub mod report_model;
pub mod role_change_request_model;
pub mod role_model;
pub mod user_model;
