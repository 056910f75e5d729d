// scamwatch-backend/src/service/mod.rs
pub mod cascade_manager;
pub mod case_file_service;
pub mod moderation_ledger;
pub mod ownership_guard;
pub mod policy_facade;
pub mod visibility_filter;
pub mod workflow_engine;
