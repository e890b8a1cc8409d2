//! Concrete adapter implementations for ports.

pub mod csv_sheet_adapter;
pub mod file_config_adapter;
pub mod http_ai_adapter;
pub mod http_data_adapter;
pub mod memory_grid;
pub mod sheet_view;
#[cfg(feature = "web")]
pub mod web;
