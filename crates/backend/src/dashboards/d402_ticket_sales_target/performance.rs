use chrono::NaiveDate;
use contracts::dashboards::d402_ticket_sales_target::{CombinedPoint, Milestone, PerformanceMetrics};

/// How many percentage points actual sales may trail the target while still
/// counting as on track.
pub const DEFAULT_TOLERANCE_BAND: f64 = 5.0;

/// Derives the point-in-time comparison of actual sales against the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceEvaluator {
    tolerance_band: f64,
}

impl PerformanceEvaluator {
    /// Negative or non-finite bands fall back to [`DEFAULT_TOLERANCE_BAND`]
    pub fn new(tolerance_band: f64) -> Self {
        let tolerance_band = if tolerance_band.is_finite() && tolerance_band >= 0.0 {
            tolerance_band
        } else {
            tracing::warn!(
                "Invalid tolerance band {}, using {}",
                tolerance_band,
                DEFAULT_TOLERANCE_BAND
            );
            DEFAULT_TOLERANCE_BAND
        };
        Self { tolerance_band }
    }

    pub fn tolerance_band(&self) -> f64 {
        self.tolerance_band
    }

    pub fn evaluate(
        &self,
        combined: &[CombinedPoint],
        capacity: u64,
        milestones: &[Milestone],
        now: NaiveDate,
    ) -> PerformanceMetrics {
        let current_tickets = latest_actual_total(combined, now);
        self.evaluate_with_total(current_tickets, combined, capacity, milestones, now)
    }

    /// Same as [`evaluate`](Self::evaluate) with the sold ticket count given
    /// directly, e.g. from the raw cumulative series.
    pub fn evaluate_with_total(
        &self,
        current_tickets: u64,
        combined: &[CombinedPoint],
        capacity: u64,
        milestones: &[Milestone],
        now: NaiveDate,
    ) -> PerformanceMetrics {
        let current_percentage = percentage_of(current_tickets, capacity);

        let current_target = combined
            .iter()
            .filter(|p| p.date <= now)
            .max_by_key(|p| p.date);
        let (target_tickets, target_percentage) = current_target
            .map(|p| (p.target, p.target_percentage))
            .unwrap_or((0, 0.0));

        let variance = current_percentage - target_percentage;

        let next_milestone = milestones
            .iter()
            .filter(|m| m.date > now)
            .min_by_key(|m| m.date)
            .cloned();
        let days_to_next_milestone = next_milestone.as_ref().map(|m| (m.date - now).num_days());

        PerformanceMetrics {
            current_tickets,
            current_percentage,
            target_tickets,
            target_percentage,
            variance,
            tolerance_band: self.tolerance_band,
            is_on_track: variance >= -self.tolerance_band,
            next_milestone,
            days_to_next_milestone,
        }
    }
}

impl Default for PerformanceEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_BAND)
    }
}

/// Actual tickets of the most recent combined point that is not in the future
pub fn latest_actual_total(combined: &[CombinedPoint], now: NaiveDate) -> u64 {
    combined
        .iter()
        .filter(|p| p.date <= now)
        .max_by_key(|p| p.date)
        .map(|p| p.actual)
        .unwrap_or(0)
}

/// Share of capacity in percent; 0 when capacity is 0
pub fn percentage_of(tickets: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        0.0
    } else {
        tickets as f64 * 100.0 / capacity as f64
    }
}
