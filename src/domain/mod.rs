//! Core domain types and logic.

pub mod config_validation;
pub mod cursor;
pub mod error;
pub mod layout;
pub mod orchestrator;
pub mod prompt;
pub mod record;
pub mod report;
pub mod request;
