use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::request::Milestone;

/// Ticket counts keyed by ticket category
pub type CategoryBreakdown = BTreeMap<String, u64>;

/// Sales of a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    pub date: NaiveDate,
    pub ticket_count: u64,
    /// Sum of order totals, each order counted once per day
    pub revenue: f64,
    pub category_breakdown: CategoryBreakdown,
    pub distinct_order_count: u64,
}

/// Running totals as of `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSales {
    pub date: NaiveDate,
    pub ticket_count: u64,
    pub revenue: f64,
    pub category_breakdown: CategoryBreakdown,
    pub distinct_order_count: u64,
}

/// One sample of the modeled target progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPoint {
    pub date: NaiveDate,
    pub target_tickets: u64,
    pub target_percentage: f64,
    pub is_milestone: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_label: Option<String>,
}

/// Ticket kind derived from the category name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    Paid,
    Sponsor,
    Speaker,
}

/// Tickets split by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketKindBreakdown {
    pub paid: u64,
    pub sponsor: u64,
    pub speaker: u64,
}

impl TicketKindBreakdown {
    pub fn add(&mut self, kind: TicketKind, count: u64) {
        match kind {
            TicketKind::Paid => self.paid += count,
            TicketKind::Sponsor => self.sponsor += count,
            TicketKind::Speaker => self.speaker += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.paid + self.sponsor + self.speaker
    }
}

/// Reconciled target/actual row of the progression timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPoint {
    pub date: NaiveDate,
    /// Target tickets at `date`
    pub target: u64,
    pub target_percentage: f64,
    /// Cumulative tickets sold as of `date`
    pub actual: u64,
    pub actual_by_kind: TicketKindBreakdown,
    pub revenue: f64,
    pub category_breakdown: CategoryBreakdown,
    pub is_milestone: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_label: Option<String>,
    pub is_future: bool,
}

/// Point-in-time comparison of actual sales against the target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub current_tickets: u64,
    pub current_percentage: f64,
    pub target_tickets: u64,
    pub target_percentage: f64,
    /// Positive means ahead of target, negative means behind
    pub variance: f64,
    pub tolerance_band: f64,
    pub is_on_track: bool,
    pub next_milestone: Option<Milestone>,
    pub days_to_next_milestone: Option<i64>,
}

/// Totals of the raw ticket records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatistics {
    pub total_tickets: u64,
    pub total_revenue: f64,
    pub total_orders: u64,
    pub average_order_value: f64,
    pub tickets_by_category: CategoryBreakdown,
    pub tickets_by_kind: TicketKindBreakdown,
    pub first_sale_date: Option<NaiveDate>,
    pub last_sale_date: Option<NaiveDate>,
    pub daily: Vec<DailySales>,
    pub cumulative: Vec<CumulativeSales>,
}

/// Full analysis consumed by the admin UI and notification code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketAnalysisResult {
    pub statistics: TicketStatistics,
    pub progression: Vec<CombinedPoint>,
    pub performance: PerformanceMetrics,
    pub capacity: u64,
}

/// Error body returned by the analysis endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
