use chrono::NaiveDate;
use contracts::dashboards::d402_ticket_sales_target::{
    CategoryBreakdown, CombinedPoint, CumulativeSales, TargetPoint, TicketKindBreakdown,
};

use super::ticket_kind::TicketKindRules;

pub const DEFAULT_RECENCY_WINDOW_DAYS: i64 = 7;

/// Aligns the dense actual series to the dates of the sparse target series
#[derive(Debug, Clone)]
pub struct SalesReconciler {
    recency_window_days: i64,
    kind_rules: TicketKindRules,
}

impl SalesReconciler {
    pub fn new(recency_window_days: i64, kind_rules: TicketKindRules) -> Self {
        Self {
            recency_window_days: recency_window_days.max(0),
            kind_rules,
        }
    }

    /// One combined point per target point, in date order.
    ///
    /// The actual values are the last snapshot dated at or before the target
    /// date. Target dates within `recency_window_days` of `now` report the
    /// latest snapshot instead, whatever its date. No snapshot means zeros.
    pub fn combine(
        &self,
        targets: &[TargetPoint],
        actuals: &[CumulativeSales],
        now: NaiveDate,
    ) -> Vec<CombinedPoint> {
        let mut targets: Vec<&TargetPoint> = targets.iter().collect();
        targets.sort_by_key(|t| t.date);
        let mut actuals: Vec<&CumulativeSales> = actuals.iter().collect();
        actuals.sort_by_key(|a| a.date);

        let latest = actuals.last().copied();
        let mut cursor = 0usize;
        let mut as_of: Option<&CumulativeSales> = None;
        let mut combined = Vec::with_capacity(targets.len());

        for target in targets {
            while cursor < actuals.len() && actuals[cursor].date <= target.date {
                as_of = Some(actuals[cursor]);
                cursor += 1;
            }

            let is_recent = (target.date - now).num_days().abs() <= self.recency_window_days;
            let snapshot = if is_recent { latest } else { as_of };

            combined.push(self.point(target, snapshot, now));
        }

        combined
    }

    fn point(
        &self,
        target: &TargetPoint,
        snapshot: Option<&CumulativeSales>,
        now: NaiveDate,
    ) -> CombinedPoint {
        let (actual, revenue, category_breakdown) = match snapshot {
            Some(s) => (s.ticket_count, s.revenue, s.category_breakdown.clone()),
            None => (0, 0.0, CategoryBreakdown::new()),
        };
        let actual_by_kind = if category_breakdown.is_empty() {
            TicketKindBreakdown::default()
        } else {
            self.kind_rules.breakdown(&category_breakdown)
        };

        CombinedPoint {
            date: target.date,
            target: target.target_tickets,
            target_percentage: target.target_percentage,
            actual,
            actual_by_kind,
            revenue,
            category_breakdown,
            is_milestone: target.is_milestone,
            milestone_label: target.milestone_label.clone(),
            is_future: target.date > now,
        }
    }
}

impl Default for SalesReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_RECENCY_WINDOW_DAYS, TicketKindRules::default())
    }
}
