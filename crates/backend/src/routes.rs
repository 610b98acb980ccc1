use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Configure all application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 TICKET SALES TARGET TRACKING
        // ========================================
        .route(
            "/api/d402/ticket-sales/analysis",
            post(handlers::d402_ticket_sales_target::analyze),
        )
        .route(
            "/api/d402/ticket-sales/chart",
            post(handlers::d402_ticket_sales_target::chart),
        )
}
