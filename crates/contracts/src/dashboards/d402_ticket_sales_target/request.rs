use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::response::CombinedPoint;

/// Shape of the expected sales ramp-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Linear,
    EarlyPush,
    LatePush,
    SCurve,
}

impl CurveKind {
    /// Wire code of the curve (as stored in the sales-target config)
    pub fn code(&self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::EarlyPush => "early_push",
            CurveKind::LatePush => "late_push",
            CurveKind::SCurve => "s_curve",
        }
    }

    /// Human readable name, used in logs
    pub fn display_name(&self) -> &'static str {
        match self {
            CurveKind::Linear => "Linear",
            CurveKind::EarlyPush => "Early push",
            CurveKind::LatePush => "Late push",
            CurveKind::SCurve => "S-curve",
        }
    }

    pub fn all() -> Vec<CurveKind> {
        vec![
            CurveKind::Linear,
            CurveKind::EarlyPush,
            CurveKind::LatePush,
            CurveKind::SCurve,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(CurveKind::Linear),
            "early_push" => Some(CurveKind::EarlyPush),
            "late_push" => Some(CurveKind::LatePush),
            "s_curve" => Some(CurveKind::SCurve),
            _ => None,
        }
    }
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One attendee line as delivered by the ticketing provider.
///
/// Several records may share `order_id` (one per attendee). `amount` is the
/// total of the whole order, not the price of this single ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub order_id: i64,
    /// ISO-8601 date or timestamp, truncated to the day during aggregation
    pub order_date: String,
    pub category: String,
    /// Decimal string; malformed values count as 0
    pub amount: String,
}

/// Configured checkpoint on the sales timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub date: NaiveDate,
    /// Expected share of capacity sold by `date`, 0..=100
    pub target_percentage: f64,
    pub label: String,
}

/// Sales-target configuration edited in the admin UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTargetConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub sales_start_date: NaiveDate,
    #[serde(default)]
    pub curve: CurveKind,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

fn default_enabled() -> bool {
    true
}

/// Request for the ticket sales analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAnalysisRequest {
    #[serde(default)]
    pub tickets: Vec<TicketRecord>,
    pub config: SalesTargetConfig,
    pub capacity: i64,
    pub conference_date: NaiveDate,
    /// Evaluation date; the server date is used when absent
    #[serde(default)]
    pub now: Option<NaiveDate>,
}

/// Request for the chart projection of an already computed progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    #[serde(default)]
    pub progression: Vec<CombinedPoint>,
    pub config: SalesTargetConfig,
    #[serde(default)]
    pub now: Option<NaiveDate>,
}
