use chrono::{Duration, NaiveDate};
use contracts::dashboards::d402_ticket_sales_target::{Milestone, SalesTargetConfig, TargetPoint};

use super::curve::curve_value;

pub const DEFAULT_SAMPLE_INTERVAL_DAYS: i64 = 7;
pub const DEFAULT_MILESTONE_TOLERANCE_DAYS: i64 = 1;

/// Samples the configured curve into a dated target series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetProgressionGenerator {
    sample_interval_days: i64,
    milestone_tolerance_days: i64,
}

impl TargetProgressionGenerator {
    pub fn new(sample_interval_days: i64, milestone_tolerance_days: i64) -> Self {
        Self {
            sample_interval_days: sample_interval_days.max(1),
            milestone_tolerance_days: milestone_tolerance_days.max(0),
        }
    }

    /// Build the target series from `config.sales_start_date` up to `end_date`.
    ///
    /// Samples every `sample_interval_days`; the last point is always
    /// `end_date` at 100% / `capacity`, added explicitly when the cadence
    /// does not land on it. An empty or inverted window yields only that
    /// final point.
    pub fn generate(
        &self,
        config: &SalesTargetConfig,
        capacity: u64,
        end_date: NaiveDate,
    ) -> Vec<TargetPoint> {
        let start = config.sales_start_date;
        let span_days = (end_date - start).num_days();
        let mut points = Vec::new();

        if span_days > 0 {
            let mut offset = 0;
            while offset < span_days {
                let date = start + Duration::days(offset);
                let progress = offset as f64 / span_days as f64;
                let percentage = (curve_value(progress, config.curve) * 100.0).clamp(0.0, 100.0);
                points.push(self.point(
                    date,
                    percentage,
                    target_tickets(percentage, capacity),
                    &config.milestones,
                ));
                offset += self.sample_interval_days;
            }
        }

        points.push(self.point(end_date, 100.0, capacity, &config.milestones));

        tracing::debug!(
            "Generated {} target point(s) for {} curve, {} .. {}",
            points.len(),
            config.curve,
            start,
            end_date
        );

        points
    }

    fn point(
        &self,
        date: NaiveDate,
        target_percentage: f64,
        target_tickets: u64,
        milestones: &[Milestone],
    ) -> TargetPoint {
        let milestone = self.match_milestone(date, milestones);
        TargetPoint {
            date,
            target_tickets,
            target_percentage,
            is_milestone: milestone.is_some(),
            milestone_label: milestone.map(|m| m.label.clone()),
        }
    }

    /// First milestone (in config order) within the tolerance of `date`
    fn match_milestone<'a>(
        &self,
        date: NaiveDate,
        milestones: &'a [Milestone],
    ) -> Option<&'a Milestone> {
        milestones
            .iter()
            .find(|m| (m.date - date).num_days().abs() <= self.milestone_tolerance_days)
    }
}

impl Default for TargetProgressionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL_DAYS, DEFAULT_MILESTONE_TOLERANCE_DAYS)
    }
}

fn target_tickets(percentage: f64, capacity: u64) -> u64 {
    let tickets = (percentage / 100.0 * capacity as f64).round();
    (tickets.max(0.0) as u64).min(capacity)
}
