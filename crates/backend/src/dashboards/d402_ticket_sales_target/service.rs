use chrono::NaiveDate;
use contracts::dashboards::d402_ticket_sales_target::{
    ChartData, CombinedPoint, SalesTargetConfig, TicketAnalysisRequest, TicketAnalysisResult,
};

use super::aggregator::{self, parse_day_key};
use super::chart_adapter::{ChartPalette, ChartSeriesAdapter};
use super::error::AnalysisError;
use super::performance::{PerformanceEvaluator, DEFAULT_TOLERANCE_BAND};
use super::reconciler::{SalesReconciler, DEFAULT_RECENCY_WINDOW_DAYS};
use super::target_generator::{
    TargetProgressionGenerator, DEFAULT_MILESTONE_TOLERANCE_DAYS, DEFAULT_SAMPLE_INTERVAL_DAYS,
};
use super::ticket_kind::TicketKindRules;

/// Tunables of the analysis pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub tolerance_band: f64,
    pub recency_window_days: i64,
    pub sample_interval_days: i64,
    pub milestone_tolerance_days: i64,
    pub kind_rules: TicketKindRules,
    pub palette: ChartPalette,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            tolerance_band: DEFAULT_TOLERANCE_BAND,
            recency_window_days: DEFAULT_RECENCY_WINDOW_DAYS,
            sample_interval_days: DEFAULT_SAMPLE_INTERVAL_DAYS,
            milestone_tolerance_days: DEFAULT_MILESTONE_TOLERANCE_DAYS,
            kind_rules: TicketKindRules::default(),
            palette: ChartPalette::default(),
        }
    }
}

/// Check the request at the boundary and return the capacity as unsigned
pub fn validate_request(request: &TicketAnalysisRequest) -> Result<u64, AnalysisError> {
    if request.capacity <= 0 {
        return Err(AnalysisError::InvalidCapacity(request.capacity));
    }

    for (index, ticket) in request.tickets.iter().enumerate() {
        if ticket.order_id <= 0 {
            return Err(AnalysisError::InvalidOrderId {
                index,
                order_id: ticket.order_id,
            });
        }
        if parse_day_key(&ticket.order_date).is_none() {
            return Err(AnalysisError::InvalidOrderDate {
                order_id: ticket.order_id,
                value: ticket.order_date.clone(),
            });
        }
    }

    validate_config(&request.config)?;

    if request.conference_date < request.config.sales_start_date {
        return Err(AnalysisError::ConferenceBeforeSalesStart {
            sales_start_date: request.config.sales_start_date,
            conference_date: request.conference_date,
        });
    }

    Ok(request.capacity as u64)
}

fn validate_config(config: &SalesTargetConfig) -> Result<(), AnalysisError> {
    for milestone in &config.milestones {
        let value = milestone.target_percentage;
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(AnalysisError::InvalidMilestonePercentage {
                label: milestone.label.clone(),
                value,
            });
        }
    }
    Ok(())
}

/// Run the whole pipeline for one request.
///
/// With target tracking disabled the progression is empty and performance
/// compares the raw ticket total against a 0% target.
pub fn analyze(
    request: &TicketAnalysisRequest,
    now: NaiveDate,
    settings: &AnalysisSettings,
) -> Result<TicketAnalysisResult, AnalysisError> {
    let capacity = validate_request(request)?;
    let config = &request.config;

    let aggregation = aggregator::aggregate(&request.tickets);
    let statistics = aggregation.statistics(&settings.kind_rules);
    let evaluator = PerformanceEvaluator::new(settings.tolerance_band);
    let sold = aggregation.ticket_count_as_of(now);

    if !config.enabled {
        tracing::debug!("Sales target tracking disabled, skipping progression");
        let performance = evaluator.evaluate_with_total(
            sold,
            &[],
            capacity,
            &config.milestones,
            now,
        );
        return Ok(TicketAnalysisResult {
            statistics,
            progression: vec![],
            performance,
            capacity,
        });
    }

    let generator = TargetProgressionGenerator::new(
        settings.sample_interval_days,
        settings.milestone_tolerance_days,
    );
    let targets = generator.generate(config, capacity, request.conference_date);

    let reconciler =
        SalesReconciler::new(settings.recency_window_days, settings.kind_rules.clone());
    let progression = reconciler.combine(&targets, &aggregation.cumulative, now);

    // Sampled points miss presales and sales after the last target date
    let performance =
        evaluator.evaluate_with_total(sold, &progression, capacity, &config.milestones, now);

    tracing::info!(
        "Ticket analysis ({} curve): {} of {} sold ({:.1}%), target {:.1}%, variance {:+.1}",
        config.curve.display_name(),
        performance.current_tickets,
        capacity,
        performance.current_percentage,
        performance.target_percentage,
        performance.variance
    );

    Ok(TicketAnalysisResult {
        statistics,
        progression,
        performance,
        capacity,
    })
}

/// Chart payload of a computed progression
pub fn build_chart(
    progression: &[CombinedPoint],
    config: &SalesTargetConfig,
    now: NaiveDate,
    settings: &AnalysisSettings,
) -> Result<ChartData, AnalysisError> {
    ChartSeriesAdapter::new(settings.palette.clone()).to_chart_data(progression, config, now)
}

/// Chart payload that always renders: failures become an empty chart
pub fn build_chart_or_empty(
    progression: &[CombinedPoint],
    config: &SalesTargetConfig,
    now: NaiveDate,
    settings: &AnalysisSettings,
) -> ChartData {
    ChartSeriesAdapter::new(settings.palette.clone())
        .to_chart_data_or_empty(progression, config, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_ticket_sales_target::{CurveKind, Milestone, TicketRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ticket(order_id: i64, order_date: &str, category: &str, amount: &str) -> TicketRecord {
        TicketRecord {
            order_id,
            order_date: order_date.to_string(),
            category: category.to_string(),
            amount: amount.to_string(),
        }
    }

    fn request(
        tickets: Vec<TicketRecord>,
        curve: CurveKind,
        capacity: i64,
    ) -> TicketAnalysisRequest {
        TicketAnalysisRequest {
            tickets,
            config: SalesTargetConfig {
                enabled: true,
                sales_start_date: date(2025, 1, 1),
                curve,
                milestones: vec![],
            },
            capacity,
            conference_date: date(2025, 3, 1),
            now: None,
        }
    }

    fn scenario() -> TicketAnalysisRequest {
        request(
            vec![
                ticket(1, "2025-01-01", "A", "100"),
                ticket(2, "2025-01-08", "B", "50"),
            ],
            CurveKind::Linear,
            10,
        )
    }

    #[test]
    fn test_end_to_end_scenario() {
        let now = date(2025, 6, 1);
        let result = analyze(&scenario(), now, &AnalysisSettings::default()).unwrap();

        let first = result.progression.first().unwrap();
        assert_eq!(first.date, date(2025, 1, 1));
        assert_eq!(first.target, 0);
        assert_eq!(first.target_percentage, 0.0);

        let last = result.progression.last().unwrap();
        assert_eq!(last.date, date(2025, 3, 1));
        assert_eq!(last.target, 10);
        assert_eq!(last.target_percentage, 100.0);

        let jan8 = result
            .statistics
            .cumulative
            .iter()
            .find(|c| c.date == date(2025, 1, 8))
            .unwrap();
        assert_eq!(jan8.ticket_count, 2);
        assert_eq!(jan8.revenue, 150.0);

        let combined_jan8 = result
            .progression
            .iter()
            .find(|p| p.date == date(2025, 1, 8))
            .unwrap();
        assert_eq!(combined_jan8.actual, 2);
        assert_eq!(combined_jan8.revenue, 150.0);

        assert_eq!(result.capacity, 10);
        assert_eq!(result.statistics.total_tickets, 2);
        assert_eq!(result.performance.current_percentage, 20.0);
        assert!(result.progression.iter().all(|p| !p.is_future));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let now = date(2025, 1, 20);
        let settings = AnalysisSettings::default();
        let first = analyze(&scenario(), now, &settings).unwrap();
        let second = analyze(&scenario(), now, &settings).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_variance_sign_for_early_and_late_push() {
        let tickets: Vec<TicketRecord> = (1..=30)
            .map(|id| ticket(id, "2025-01-10", "Regular", "25"))
            .collect();
        let now = date(2025, 1, 29);
        let settings = AnalysisSettings::default();

        let early = analyze(
            &request(tickets.clone(), CurveKind::EarlyPush, 100),
            now,
            &settings,
        )
        .unwrap();
        let late = analyze(&request(tickets, CurveKind::LatePush, 100), now, &settings).unwrap();

        assert_eq!(early.performance.current_percentage, 30.0);
        assert_eq!(late.performance.current_percentage, 30.0);

        // Day 28 of 59: early push expects ~69%, late push ~11%
        assert!(early.performance.variance < 0.0);
        assert!(!early.performance.is_on_track);
        assert!(late.performance.variance > 0.0);
        assert!(late.performance.is_on_track);
        assert_eq!(
            early.performance.variance,
            early.performance.current_percentage - early.performance.target_percentage
        );
    }

    #[test]
    fn test_milestone_reaches_combined_point() {
        let mut req = scenario();
        req.config.milestones = vec![Milestone {
            date: date(2025, 2, 13),
            target_percentage: 60.0,
            label: "Early bird ends".to_string(),
        }];

        let now = date(2025, 1, 10);
        let result = analyze(&req, now, &AnalysisSettings::default()).unwrap();
        let milestone = result.progression.iter().find(|p| p.is_milestone).unwrap();
        assert_eq!(milestone.date, date(2025, 2, 12));
        assert_eq!(milestone.milestone_label.as_deref(), Some("Early bird ends"));
        assert!(milestone.is_future);

        assert_eq!(result.performance.days_to_next_milestone, Some(34));
        let chart =
            build_chart(&result.progression, &req.config, now, &AnalysisSettings::default())
                .unwrap();
        assert!(chart
            .annotations
            .iter()
            .any(|a| a.label == "Early bird ends" && a.x == date(2025, 2, 12)));
    }

    #[test]
    fn test_disabled_tracking_keeps_statistics() {
        let mut req = scenario();
        req.config.enabled = false;
        let result = analyze(&req, date(2025, 1, 20), &AnalysisSettings::default()).unwrap();
        assert!(result.progression.is_empty());
        assert_eq!(result.statistics.total_revenue, 150.0);
        assert_eq!(result.performance.current_percentage, 20.0);
        assert_eq!(result.performance.target_percentage, 0.0);

        let chart = build_chart_or_empty(
            &result.progression,
            &req.config,
            date(2025, 1, 20),
            &AnalysisSettings::default(),
        );
        assert!(chart.is_empty());
        assert_eq!(chart, ChartData::empty());
    }

    #[test]
    fn test_validation_errors() {
        let settings = AnalysisSettings::default();
        let now = date(2025, 1, 20);

        let mut req = scenario();
        req.capacity = 0;
        assert_eq!(analyze(&req, now, &settings), Err(AnalysisError::InvalidCapacity(0)));

        let mut req = scenario();
        req.tickets.push(ticket(0, "2025-01-09", "A", "10"));
        assert_eq!(
            validate_request(&req),
            Err(AnalysisError::InvalidOrderId { index: 2, order_id: 0 })
        );

        let mut req = scenario();
        req.tickets.push(ticket(3, "yesterday", "A", "10"));
        assert!(matches!(
            validate_request(&req),
            Err(AnalysisError::InvalidOrderDate { order_id: 3, .. })
        ));

        let mut req = scenario();
        req.config.milestones.push(Milestone {
            date: date(2025, 2, 1),
            target_percentage: 120.0,
            label: "Oversold".to_string(),
        });
        assert!(matches!(
            validate_request(&req),
            Err(AnalysisError::InvalidMilestonePercentage { .. })
        ));

        let mut req = scenario();
        req.conference_date = date(2024, 12, 31);
        assert!(matches!(
            validate_request(&req),
            Err(AnalysisError::ConferenceBeforeSalesStart { .. })
        ));
    }

    #[test]
    fn test_malformed_amount_counts_as_zero() {
        let mut req = scenario();
        req.tickets.push(ticket(3, "2025-01-09", "A", "12,00 EUR"));
        let result = analyze(&req, date(2025, 1, 20), &AnalysisSettings::default()).unwrap();
        assert_eq!(result.statistics.total_tickets, 3);
        assert_eq!(result.statistics.total_revenue, 150.0);
    }

    #[test]
    fn test_sales_after_conference_count_toward_current() {
        let req = request(
            vec![
                ticket(1, "2025-01-02", "Regular", "100"),
                ticket(2, "2025-03-20", "Regular", "100"),
            ],
            CurveKind::Linear,
            10,
        );
        let result = analyze(&req, date(2025, 4, 1), &AnalysisSettings::default()).unwrap();

        assert_eq!(result.statistics.total_tickets, 2);
        assert_eq!(result.performance.current_tickets, 2);
        assert_eq!(result.performance.current_percentage, 20.0);
        assert_eq!(result.performance.target_percentage, 100.0);
        assert_eq!(result.performance.variance, -80.0);
    }

    #[test]
    fn test_presales_count_before_sales_start() {
        let req = request(
            vec![
                ticket(1, "2024-12-20", "Regular", "100"),
                ticket(2, "2024-12-21", "Speaker", "0"),
            ],
            CurveKind::Linear,
            10,
        );
        let result = analyze(&req, date(2024, 12, 22), &AnalysisSettings::default()).unwrap();

        assert_eq!(result.statistics.total_tickets, 2);
        assert_eq!(result.performance.current_tickets, 2);
        assert_eq!(result.performance.current_percentage, 20.0);
        assert_eq!(result.performance.target_percentage, 0.0);
        assert!(result.performance.is_on_track);
    }

    #[test]
    fn test_current_tickets_ignore_sales_dated_after_now() {
        let result = analyze(&scenario(), date(2025, 1, 5), &AnalysisSettings::default()).unwrap();
        assert_eq!(result.statistics.total_tickets, 2);
        assert_eq!(result.performance.current_tickets, 1);
    }
}
