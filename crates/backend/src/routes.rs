use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::shared::export::ExportSettings;

/// Конфигурация всех роутов приложения
pub fn configure_routes(settings: Arc<ExportSettings>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // EXPORT
        // ========================================
        .route("/api/export/csv", post(handlers::export::download_csv))
        .route("/api/export/csv/save", post(handlers::export::save_csv))
        .with_state(settings)
}
