use chrono::NaiveDate;
use contracts::dashboards::d402_ticket_sales_target::{
    AnnotationKind, ChartAnnotation, ChartData, ChartPoint, ChartSeries, ChartSeriesType,
    CombinedPoint, SalesTargetConfig,
};
use std::collections::BTreeSet;

use super::error::AnalysisError;

pub const TARGET_SERIES_NAME: &str = "Target";

pub const DEFAULT_CATEGORY_COLORS: [&str; 8] = [
    "#4E79A7", "#F28E2B", "#59A14F", "#B07AA1", "#76B7B2", "#EDC948", "#FF9DA7", "#9C755F",
];

/// Colors used by the chart payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPalette {
    category_colors: Vec<String>,
    pub target_color: String,
    pub today_color: String,
    pub milestone_color: String,
    pub sales_start_color: String,
}

impl ChartPalette {
    /// An empty color list falls back to [`DEFAULT_CATEGORY_COLORS`]
    pub fn with_category_colors(category_colors: Vec<String>) -> Self {
        let mut palette = Self::default();
        if !category_colors.is_empty() {
            palette.category_colors = category_colors;
        }
        palette
    }

    /// Color of the category at `index` in legend order, wrapping around
    pub fn category_color(&self, index: usize) -> &str {
        &self.category_colors[index % self.category_colors.len()]
    }
}

impl Default for ChartPalette {
    fn default() -> Self {
        Self {
            category_colors: DEFAULT_CATEGORY_COLORS.iter().map(|c| c.to_string()).collect(),
            target_color: "#E15759".to_string(),
            today_color: "#333333".to_string(),
            milestone_color: "#775DD0".to_string(),
            sales_start_color: "#00A65A".to_string(),
        }
    }
}

/// Projects the combined timeline into a stacked-column + target-line chart
#[derive(Debug, Clone, Default)]
pub struct ChartSeriesAdapter {
    palette: ChartPalette,
}

impl ChartSeriesAdapter {
    pub fn new(palette: ChartPalette) -> Self {
        Self { palette }
    }

    pub fn to_chart_data(
        &self,
        combined: &[CombinedPoint],
        config: &SalesTargetConfig,
        now: NaiveDate,
    ) -> Result<ChartData, AnalysisError> {
        if combined.is_empty() {
            return Err(AnalysisError::EmptyProgression);
        }

        let mut points: Vec<&CombinedPoint> = combined.iter().collect();
        points.sort_by_key(|p| p.date);

        let categories: Vec<String> = points
            .iter()
            .flat_map(|p| p.category_breakdown.keys())
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let mut series = Vec::with_capacity(categories.len() + 1);
        for (index, category) in categories.iter().enumerate() {
            let data = points
                .iter()
                .map(|p| ChartPoint {
                    x: p.date,
                    y: p.category_breakdown.get(category).copied().unwrap_or(0) as f64,
                })
                .collect();
            series.push(ChartSeries {
                name: category.clone(),
                series_type: ChartSeriesType::Column,
                data,
                color: self.palette.category_color(index).to_string(),
            });
        }

        series.push(ChartSeries {
            name: TARGET_SERIES_NAME.to_string(),
            series_type: ChartSeriesType::Line,
            data: points
                .iter()
                .map(|p| ChartPoint {
                    x: p.date,
                    y: p.target as f64,
                })
                .collect(),
            color: self.palette.target_color.clone(),
        });

        let max_value = points
            .iter()
            .map(|p| {
                let stacked: u64 = p.category_breakdown.values().sum();
                stacked.max(p.target) as f64
            })
            .fold(0.0, f64::max);

        Ok(ChartData {
            series,
            max_value,
            categories,
            annotations: self.annotations(&points, config, now),
        })
    }

    fn annotations(
        &self,
        points: &[&CombinedPoint],
        config: &SalesTargetConfig,
        now: NaiveDate,
    ) -> Vec<ChartAnnotation> {
        let mut annotations = vec![ChartAnnotation {
            kind: AnnotationKind::Today,
            x: now,
            label: "Today".to_string(),
            color: self.palette.today_color.clone(),
        }];

        for point in points.iter().filter(|p| p.is_milestone) {
            annotations.push(ChartAnnotation {
                kind: AnnotationKind::Milestone,
                x: point.date,
                label: point.milestone_label.clone().unwrap_or_default(),
                color: self.palette.milestone_color.clone(),
            });
        }

        annotations.push(ChartAnnotation {
            kind: AnnotationKind::SalesStart,
            x: config.sales_start_date,
            label: "Sales start".to_string(),
            color: self.palette.sales_start_color.clone(),
        });

        annotations
    }

    /// Like [`to_chart_data`](Self::to_chart_data), but a payload that cannot
    /// be built is logged and replaced by [`ChartData::empty`].
    pub fn to_chart_data_or_empty(
        &self,
        combined: &[CombinedPoint],
        config: &SalesTargetConfig,
        now: NaiveDate,
    ) -> ChartData {
        match self.to_chart_data(combined, config, now) {
            Ok(chart) => chart,
            Err(e) => {
                tracing::warn!("Chart data unavailable, rendering empty chart: {}", e);
                ChartData::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_ticket_sales_target::{
        CategoryBreakdown, CurveKind, TicketKindBreakdown,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> SalesTargetConfig {
        SalesTargetConfig {
            enabled: true,
            sales_start_date: date(2025, 1, 1),
            curve: CurveKind::Linear,
            milestones: vec![],
        }
    }

    fn point(d: NaiveDate, target: u64, categories: &[(&str, u64)]) -> CombinedPoint {
        let category_breakdown: CategoryBreakdown = categories
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect();
        CombinedPoint {
            date: d,
            target,
            target_percentage: target as f64,
            actual: category_breakdown.values().sum(),
            actual_by_kind: TicketKindBreakdown::default(),
            revenue: 0.0,
            category_breakdown,
            is_milestone: false,
            milestone_label: None,
            is_future: false,
        }
    }

    fn sample() -> Vec<CombinedPoint> {
        let mut milestone = point(date(2025, 1, 15), 30, &[("Student", 5), ("Regular", 20)]);
        milestone.is_milestone = true;
        milestone.milestone_label = Some("Early bird ends".to_string());

        vec![
            point(date(2025, 1, 22), 40, &[("Student", 6), ("Regular", 22), ("VIP", 1)]),
            point(date(2025, 1, 1), 0, &[]),
            milestone,
            point(date(2025, 1, 8), 10, &[("Regular", 4)]),
        ]
    }

    #[test]
    fn test_series_per_category_plus_target() {
        let chart = ChartSeriesAdapter::default()
            .to_chart_data(&sample(), &config(), date(2025, 1, 20))
            .unwrap();

        assert_eq!(chart.categories, vec!["Regular", "Student", "VIP"]);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Regular", "Student", "VIP", TARGET_SERIES_NAME]);

        let lines: Vec<&ChartSeries> = chart
            .series
            .iter()
            .filter(|s| s.series_type == ChartSeriesType::Line)
            .collect();
        assert_eq!(lines.len(), 1);
        let target_y: Vec<f64> = lines[0].data.iter().map(|p| p.y).collect();
        assert_eq!(target_y, vec![0.0, 10.0, 30.0, 40.0]);

        let vip = &chart.series[2];
        assert_eq!(vip.series_type, ChartSeriesType::Column);
        let vip_y: Vec<f64> = vip.data.iter().map(|p| p.y).collect();
        assert_eq!(vip_y, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(vip.data[0].x, date(2025, 1, 1));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let adapter = ChartSeriesAdapter::default();
        let now = date(2025, 1, 20);
        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(
            adapter.to_chart_data(&sample(), &config(), now).unwrap(),
            adapter.to_chart_data(&reversed, &config(), now).unwrap()
        );
    }

    #[test]
    fn test_max_value_covers_stack_and_target() {
        let adapter = ChartSeriesAdapter::default();
        let chart = adapter
            .to_chart_data(&sample(), &config(), date(2025, 1, 20))
            .unwrap();
        assert_eq!(chart.max_value, 40.0);

        let ahead = vec![point(date(2025, 1, 8), 10, &[("A", 8), ("B", 7)])];
        let chart = adapter.to_chart_data(&ahead, &config(), date(2025, 1, 8)).unwrap();
        assert_eq!(chart.max_value, 15.0);
    }

    #[test]
    fn test_palette_wraps_around() {
        let palette =
            ChartPalette::with_category_colors(vec!["#111".to_string(), "#222".to_string()]);
        let adapter = ChartSeriesAdapter::new(palette);
        let chart = adapter
            .to_chart_data(&sample(), &config(), date(2025, 1, 20))
            .unwrap();
        let colors: Vec<&str> = chart.series[..3].iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["#111", "#222", "#111"]);

        assert_eq!(ChartPalette::with_category_colors(vec![]), ChartPalette::default());
    }

    #[test]
    fn test_annotations() {
        let now = date(2025, 1, 20);
        let chart = ChartSeriesAdapter::default()
            .to_chart_data(&sample(), &config(), now)
            .unwrap();

        let kinds: Vec<AnnotationKind> = chart.annotations.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AnnotationKind::Today,
                AnnotationKind::Milestone,
                AnnotationKind::SalesStart
            ]
        );
        assert_eq!(chart.annotations[0].x, now);
        assert_eq!(chart.annotations[1].x, date(2025, 1, 15));
        assert_eq!(chart.annotations[1].label, "Early bird ends");
        assert_eq!(chart.annotations[2].x, date(2025, 1, 1));
    }

    #[test]
    fn test_empty_progression_is_an_error() {
        let adapter = ChartSeriesAdapter::default();
        let result = adapter.to_chart_data(&[], &config(), date(2025, 1, 1));
        assert_eq!(result, Err(AnalysisError::EmptyProgression));

        let fallback = adapter.to_chart_data_or_empty(&[], &config(), date(2025, 1, 1));
        assert_eq!(fallback, ChartData::empty());
    }
}
