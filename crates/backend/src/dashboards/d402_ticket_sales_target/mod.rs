pub mod aggregator;
pub mod chart_adapter;
pub mod curve;
pub mod error;
pub mod performance;
pub mod reconciler;
pub mod service;
pub mod target_generator;
pub mod ticket_kind;

pub use error::AnalysisError;
pub use service::{analyze, build_chart, build_chart_or_empty, AnalysisSettings};
