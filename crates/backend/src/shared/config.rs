use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::Path;

use crate::dashboards::d402_ticket_sales_target::chart_adapter::{
    ChartPalette, DEFAULT_CATEGORY_COLORS,
};
use crate::dashboards::d402_ticket_sales_target::performance::DEFAULT_TOLERANCE_BAND;
use crate::dashboards::d402_ticket_sales_target::reconciler::DEFAULT_RECENCY_WINDOW_DAYS;
use crate::dashboards::d402_ticket_sales_target::target_generator::{
    DEFAULT_MILESTONE_TOLERANCE_DAYS, DEFAULT_SAMPLE_INTERVAL_DAYS,
};
use crate::dashboards::d402_ticket_sales_target::ticket_kind::TicketKindRules;
use crate::dashboards::d402_ticket_sales_target::AnalysisSettings;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub ticket_kinds: TicketKindsConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Percentage points actual sales may trail the target and stay on track
    #[serde(default = "default_tolerance_band")]
    pub tolerance_band: f64,
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,
    #[serde(default = "default_sample_interval_days")]
    pub sample_interval_days: i64,
    #[serde(default = "default_milestone_tolerance_days")]
    pub milestone_tolerance_days: i64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartConfig {
    /// Category colors in legend order, reused cyclically
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TicketKindsConfig {
    #[serde(default = "default_sponsor_keywords")]
    pub sponsor: Vec<String>,
    #[serde(default = "default_speaker_keywords")]
    pub speaker: Vec<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_tolerance_band() -> f64 {
    DEFAULT_TOLERANCE_BAND
}

fn default_recency_window_days() -> i64 {
    DEFAULT_RECENCY_WINDOW_DAYS
}

fn default_sample_interval_days() -> i64 {
    DEFAULT_SAMPLE_INTERVAL_DAYS
}

fn default_milestone_tolerance_days() -> i64 {
    DEFAULT_MILESTONE_TOLERANCE_DAYS
}

fn default_palette() -> Vec<String> {
    DEFAULT_CATEGORY_COLORS.iter().map(|c| c.to_string()).collect()
}

fn default_sponsor_keywords() -> Vec<String> {
    vec!["sponsor".to_string()]
}

fn default_speaker_keywords() -> Vec<String> {
    vec!["speaker".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tolerance_band: default_tolerance_band(),
            recency_window_days: default_recency_window_days(),
            sample_interval_days: default_sample_interval_days(),
            milestone_tolerance_days: default_milestone_tolerance_days(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
        }
    }
}

impl Default for TicketKindsConfig {
    fn default() -> Self {
        Self {
            sponsor: default_sponsor_keywords(),
            speaker: default_speaker_keywords(),
        }
    }
}

impl Config {
    /// Pipeline settings derived from the `[analysis]`, `[chart]` and
    /// `[ticket_kinds]` sections
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            tolerance_band: self.analysis.tolerance_band,
            recency_window_days: self.analysis.recency_window_days,
            sample_interval_days: self.analysis.sample_interval_days,
            milestone_tolerance_days: self.analysis.milestone_tolerance_days,
            kind_rules: TicketKindRules::new(
                self.ticket_kinds.sponsor.clone(),
                self.ticket_kinds.speaker.clone(),
            ),
            palette: ChartPalette::with_category_colors(self.chart.palette.clone()),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r##"
[server]
port = 3000

[analysis]
tolerance_band = 5.0
recency_window_days = 7
sample_interval_days = 7
milestone_tolerance_days = 1

[chart]
palette = ["#4E79A7", "#F28E2B", "#59A14F", "#B07AA1", "#76B7B2", "#EDC948", "#FF9DA7", "#9C755F"]

[ticket_kinds]
sponsor = ["sponsor"]
speaker = ["speaker"]
"##;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                return load_config_from(&config_path);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading config from: {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

/// Store the configuration for the lifetime of the process
pub fn initialize_config(config: Config) -> anyhow::Result<&'static Config> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("configuration is already initialized"))?;
    Ok(get_config())
}

/// Active configuration, the built-in defaults until initialized
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}
