use chrono::NaiveDate;
use thiserror::Error;

/// Errors of the ticket sales analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("ticket #{index} has invalid order id {order_id}, expected a positive integer")]
    InvalidOrderId { index: usize, order_id: i64 },

    #[error("order {order_id} has unparsable order date '{value}'")]
    InvalidOrderDate { order_id: i64, value: String },

    #[error("capacity must be a positive integer, got {0}")]
    InvalidCapacity(i64),

    #[error("milestone '{label}' has target percentage {value}, expected 0..=100")]
    InvalidMilestonePercentage { label: String, value: f64 },

    #[error("conference date {conference_date} is before sales start {sales_start_date}")]
    ConferenceBeforeSalesStart {
        sales_start_date: NaiveDate,
        conference_date: NaiveDate,
    },

    #[error("progression is empty, nothing to chart")]
    EmptyProgression,
}
