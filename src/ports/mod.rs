//! Port traits the domain depends on.

pub mod ai_port;
pub mod config_port;
pub mod data_port;
pub mod grid_port;
