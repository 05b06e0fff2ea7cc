pub mod handlers;
pub mod logging;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::AppError;
use crate::pipeline::AnalysisPipeline;
use crate::providers::{LabelProvider, SearchProvider};

/// Shared handler state: the pipeline plus the raw providers for the
/// diagnostic probes. Everything is Arc'd once at startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnalysisPipeline>,
    pub search: Arc<dyn SearchProvider>,
    pub labels: Arc<dyn LabelProvider>,
}

pub struct Server {
    bind_addr: String,
    state: AppState,
}

impl Server {
    pub fn new(bind_addr: String, state: AppState) -> Self {
        Self { bind_addr, state }
    }

    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/analyze", post(handlers::analyze))
            .route("/test/unsplash", get(handlers::search_probe))
            .route("/test/vision", get(handlers::label_probe))
            .route("/test/combined-test", get(handlers::combined_probe))
            .route("/health", get(handlers::health))
            .layer(middleware::from_fn(logging::log_requests))
            .with_state(state)
    }

    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("Starting HTTP server on {}", self.bind_addr);
        let listener = TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|error| AppError::Bind(error, self.bind_addr.clone()))?;
        let router = Self::router(self.state.clone());
        axum::serve(listener, router)
            .await
            .map_err(AppError::Server)?;
        Ok(())
    }
}
