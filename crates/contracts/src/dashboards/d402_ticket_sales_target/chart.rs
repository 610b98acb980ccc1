use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the charting library draws a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSeriesType {
    Column,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: NaiveDate,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub series_type: ChartSeriesType,
    pub data: Vec<ChartPoint>,
    pub color: String,
}

/// What a vertical marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Today,
    Milestone,
    SalesStart,
}

/// Vertical marker on the x axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAnnotation {
    pub kind: AnnotationKind,
    pub x: NaiveDate,
    pub label: String,
    pub color: String,
}

/// Library-agnostic multi-series chart payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub series: Vec<ChartSeries>,
    /// Upper bound of the y axis (stacked columns or target, whichever is higher)
    pub max_value: f64,
    /// Ticket categories in legend order
    pub categories: Vec<String>,
    pub annotations: Vec<ChartAnnotation>,
}

impl ChartData {
    /// Well-formed payload that renders as an empty chart
    pub fn empty() -> Self {
        Self {
            series: vec![],
            max_value: 0.0,
            categories: vec![],
            annotations: vec![],
        }
    }

    /// No series to draw
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_type_field_name() {
        let series = ChartSeries {
            name: "Target".to_string(),
            series_type: ChartSeriesType::Line,
            data: vec![ChartPoint {
                x: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                y: 10.0,
            }],
            color: "#000000".to_string(),
        };
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"][0]["x"], "2025-03-01");
    }

    #[test]
    fn test_empty_chart_shape() {
        let value = serde_json::to_value(ChartData::empty()).unwrap();
        assert_eq!(value["series"], serde_json::json!([]));
        assert_eq!(value["categories"], serde_json::json!([]));
        assert_eq!(value["annotations"], serde_json::json!([]));
        assert_eq!(value["maxValue"], 0.0);
        assert!(ChartData::empty().is_empty());
    }
}
