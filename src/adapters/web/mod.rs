//! HTTP entry point.
//!
//! `POST /import` takes an import request as JSON and answers with the
//! import report as JSON. Imports run on the blocking pool, one at a time,
//! because they hold the sheet for their whole duration.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;

use crate::ports::ai_port::AiPort;
use crate::ports::data_port::DataPort;
use crate::ports::grid_port::GridPort;

pub struct AppState {
    pub sheet: Mutex<Box<dyn GridPort + Send>>,
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub ai_port: Arc<dyn AiPort + Send + Sync>,
}

impl AppState {
    pub fn new(
        sheet: Box<dyn GridPort + Send>,
        data_port: Arc<dyn DataPort + Send + Sync>,
        ai_port: Arc<dyn AiPort + Send + Sync>,
    ) -> Self {
        Self {
            sheet: Mutex::new(sheet),
            data_port,
            ai_port,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/import", post(handlers::import))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
