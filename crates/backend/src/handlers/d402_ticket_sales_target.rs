use axum::{http::StatusCode, Json};
use chrono::NaiveDate;
use contracts::dashboards::d402_ticket_sales_target::{
    ChartData, ChartRequest, ErrorResponse, TicketAnalysisRequest, TicketAnalysisResult,
};

use crate::dashboards::d402_ticket_sales_target::service;
use crate::shared::config::get_config;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// POST /api/d402/ticket-sales/analysis
pub async fn analyze(
    Json(request): Json<TicketAnalysisRequest>,
) -> Result<Json<TicketAnalysisResult>, (StatusCode, Json<ErrorResponse>)> {
    let settings = get_config().analysis_settings();
    let now = request.now.unwrap_or_else(today);

    match service::analyze(&request, now, &settings) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::warn!("Ticket sales analysis rejected: {}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

/// POST /api/d402/ticket-sales/chart
///
/// Never fails: a progression that cannot be charted yields an empty chart.
pub async fn chart(Json(request): Json<ChartRequest>) -> Json<ChartData> {
    let settings = get_config().analysis_settings();
    let now = request.now.unwrap_or_else(today);

    let chart =
        service::build_chart_or_empty(&request.progression, &request.config, now, &settings);
    if chart.is_empty() {
        tracing::debug!(
            "Empty ticket sales chart for {} progression point(s)",
            request.progression.len()
        );
    }
    Json(chart)
}
