//! Dashboard Assembly
//! Runs the load -> prepare -> summarize/aggregate pipeline and writes the
//! KPI panel and chart files for the presentation layer.

use crate::charts::{ChartError, ChartPlotter, DashboardCharts, StaticChartRenderer, CHART_IDS};
use crate::config::DashboardConfig;
use crate::data::{DataLoader, DataPreparer, LoaderError, PreparedRecord, RawRecord};
use crate::format::{format_count, format_percent, format_with_suffix, PLACEHOLDER};
use crate::stats::{CampaignMetrics, SummaryCalculator, SummaryError, SummaryMetrics};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

const STATUS_FILE: &str = "status.json";
const KPI_FILE: &str = "kpis.json";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to write dashboard output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize dashboard output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text for the four KPI slots, in page order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    /// kpi-1: clients analysed
    pub total_clients: String,
    /// kpi-2: overall conversion rate
    pub conversion_rate: String,
    /// kpi-3: mean calls per client this campaign
    pub calls_per_client: String,
    /// kpi-4: clients whose previous campaign succeeded
    pub previous_success_rate: String,
}

impl KpiPanel {
    pub fn new(
        summary: &Result<SummaryMetrics, SummaryError>,
        campaign: &CampaignMetrics,
        thousands_separator: char,
    ) -> Self {
        let (total_clients, conversion_rate) = match summary {
            Ok(s) => (
                format_count(s.total, thousands_separator),
                format_percent(Some(s.subscription_rate)),
            ),
            // zero records: the count is real, the rate is not
            Err(SummaryError::DivisionUndefined) => {
                (format_count(0, thousands_separator), PLACEHOLDER.to_string())
            }
        };

        Self {
            total_clients,
            conversion_rate,
            calls_per_client: format_with_suffix(campaign.mean_calls_per_client, "x"),
            previous_success_rate: format_percent(campaign.previous_success_rate),
        }
    }

    /// `(element id, text)` pairs.
    pub fn slots(&self) -> [(&'static str, &str); 4] {
        [
            ("kpi-1", self.total_clients.as_str()),
            ("kpi-2", self.conversion_rate.as_str()),
            ("kpi-3", self.calls_per_client.as_str()),
            ("kpi-4", self.previous_success_rate.as_str()),
        ]
    }
}

#[derive(Serialize)]
struct KpiReport<'a> {
    panel: &'a KpiPanel,
    summary: Option<&'a SummaryMetrics>,
    campaign: &'a CampaignMetrics,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum StatusReport<'a> {
    Ready { records: usize },
    Error { message: &'a str },
}

/// Everything derived from one successful load.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub records: Vec<PreparedRecord>,
    pub summary: Result<SummaryMetrics, SummaryError>,
    pub campaign: CampaignMetrics,
    pub kpis: KpiPanel,
    pub charts: DashboardCharts,
}

impl Dashboard {
    /// Load the configured CSV and build the dashboard.
    pub fn load(config: &DashboardConfig) -> Result<Self, LoaderError> {
        let raw = DataLoader::load_csv(&config.data_path)?;
        Ok(Self::from_raw(&raw, config))
    }

    pub fn from_raw(raw: &[RawRecord], config: &DashboardConfig) -> Self {
        Self::build(DataPreparer::prepare(raw), config)
    }

    pub fn build(records: Vec<PreparedRecord>, config: &DashboardConfig) -> Self {
        let summary = SummaryCalculator::summarize(&records);
        let campaign = SummaryCalculator::campaign_metrics(&records);
        let kpis = KpiPanel::new(&summary, &campaign, config.thousands_separator);
        let charts = ChartPlotter::build(&records, &config.palette);

        Self {
            records,
            summary,
            campaign,
            kpis,
            charts,
        }
    }

    /// Write the KPI file and render every chart that has data. Returns the
    /// chart files written; charts that cannot be drawn are logged, and any
    /// file left from an earlier run under their id is removed.
    pub fn publish(&self, config: &DashboardConfig) -> Result<Vec<PathBuf>, PublishError> {
        let dir = &config.output_dir;
        fs::create_dir_all(dir)?;

        write_json(
            &dir.join(KPI_FILE),
            &KpiReport {
                panel: &self.kpis,
                summary: self.summary.as_ref().ok(),
                campaign: &self.campaign,
            },
        )?;

        let renderer = StaticChartRenderer::new(
            config.chart_width,
            config.chart_height,
            config.palette.text_primary,
        );
        let written = self.render_charts(&renderer, dir);

        write_json(
            &dir.join(STATUS_FILE),
            &StatusReport::Ready {
                records: self.records.len(),
            },
        )?;

        Ok(written)
    }

    fn render_charts(&self, renderer: &StaticChartRenderer, dir: &Path) -> Vec<PathBuf> {
        let charts = &self.charts;
        let mut outcomes: Vec<(&str, PathBuf, Result<(), ChartError>)> = Vec::new();

        for chart in [
            &charts.subscriptions_by_education,
            &charts.conversion_by_job,
            &charts.conversion_by_previous_outcome,
        ] {
            let path = chart_path(dir, &chart.id);
            let result = renderer.render_bar_chart(chart, &path);
            outcomes.push((chart.id.as_str(), path, result));
        }

        let scatter = &charts.duration_vs_calls;
        let path = chart_path(dir, &scatter.id);
        let result = renderer.render_scatter_chart(scatter, &path);
        outcomes.push((scatter.id.as_str(), path, result));

        outcomes
            .into_iter()
            .filter_map(|(id, path, result)| match result {
                Ok(()) => Some(path),
                Err(err) => {
                    tracing::warn!(chart = id, error = %err, "chart skipped");
                    if let Err(err) = remove_if_present(&path) {
                        tracing::warn!(
                            path = %path.display(),
                            error = %err,
                            "stale chart not removed"
                        );
                    }
                    None
                }
            })
            .collect()
    }
}

/// Outcome of a dashboard load: ready to show, or a display-only error.
#[derive(Debug, Clone)]
pub enum DashboardState {
    Ready(Box<Dashboard>),
    Failed { message: String },
}

impl DashboardState {
    /// Load the dashboard, turning a load failure into the error state.
    pub fn load(config: &DashboardConfig) -> Self {
        match Dashboard::load(config) {
            Ok(dashboard) => {
                if let Ok(summary) = &dashboard.summary {
                    tracing::info!(
                        total = summary.total,
                        subscribed = summary.subscribed,
                        rate = summary.subscription_rate,
                        "dashboard ready"
                    );
                } else {
                    tracing::info!("dashboard ready with no records");
                }
                DashboardState::Ready(Box::new(dashboard))
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load campaign data");
                DashboardState::Failed {
                    message: config.load_error_message.clone(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DashboardState::Ready(_))
    }

    /// Write the dashboard outputs, or the error status when loading failed.
    /// The error state removes the KPI file and charts of any earlier run so
    /// only the message is shown.
    pub fn publish(&self, config: &DashboardConfig) -> Result<Vec<PathBuf>, PublishError> {
        match self {
            DashboardState::Ready(dashboard) => dashboard.publish(config),
            DashboardState::Failed { message } => {
                let dir = &config.output_dir;
                fs::create_dir_all(dir)?;
                remove_if_present(&dir.join(KPI_FILE))?;
                for id in CHART_IDS {
                    remove_if_present(&chart_path(dir, id))?;
                }
                write_json(
                    &config.output_dir.join(STATUS_FILE),
                    &StatusReport::Error { message },
                )?;
                Ok(Vec::new())
            }
        }
    }
}

fn chart_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.svg"))
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PublishError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> DashboardConfig {
        DashboardConfig {
            data_path: dir.join("bank.csv"),
            output_dir: dir.join("out"),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn kpis_for_three_rows() {
        let raw = vec![
            RawRecord::from_pairs([("education", "primary"), ("campaign", "1"), ("y", "yes")]),
            RawRecord::from_pairs([("education", "primary"), ("campaign", "2"), ("y", "no")]),
            RawRecord::from_pairs([("education", "secondary"), ("campaign", "3"), ("y", "yes")]),
        ];
        let dashboard = Dashboard::from_raw(&raw, &DashboardConfig::default());

        assert_eq!(dashboard.kpis.total_clients, "3");
        assert_eq!(dashboard.kpis.conversion_rate, "66.7%");
        assert_eq!(dashboard.kpis.calls_per_client, "2.0x");
        assert_eq!(dashboard.kpis.previous_success_rate, "0.0%");
        assert_eq!(dashboard.kpis.slots()[1], ("kpi-2", "66.7%"));
    }

    #[test]
    fn empty_data_shows_placeholders() {
        let dashboard = Dashboard::from_raw(&[], &DashboardConfig::default());

        assert_eq!(dashboard.summary, Err(SummaryError::DivisionUndefined));
        assert_eq!(dashboard.kpis.total_clients, "0");
        assert_eq!(dashboard.kpis.conversion_rate, PLACEHOLDER);
        assert_eq!(dashboard.kpis.calls_per_client, PLACEHOLDER);
        assert_eq!(dashboard.kpis.previous_success_rate, PLACEHOLDER);
        assert!(dashboard.charts.subscriptions_by_education.bars.is_empty());
    }

    #[test]
    fn large_counts_use_the_separator() {
        let summary = Ok(SummaryMetrics {
            total: 45218,
            subscribed: 5289,
            subscription_rate: 11.7,
        });
        let panel = KpiPanel::new(&summary, &CampaignMetrics::default(), '.');

        assert_eq!(panel.total_clients, "45.218");
        assert_eq!(panel.conversion_rate, "11.7%");
    }

    #[test]
    fn missing_file_becomes_error_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let state = DashboardState::load(&config);
        assert!(!state.is_ready());
        match &state {
            DashboardState::Failed { message } => assert_eq!(message, "Error al cargar los datos"),
            DashboardState::Ready(_) => panic!("expected error state"),
        }

        let written = state.publish(&config).unwrap();
        assert!(written.is_empty());

        let status = fs::read_to_string(config.output_dir.join(STATUS_FILE)).unwrap();
        let status: serde_json::Value = serde_json::from_str(&status).unwrap();
        assert_eq!(status["status"], "error");
        assert_eq!(status["message"], "Error al cargar los datos");
    }

    #[test]
    fn error_state_uses_the_configured_message() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            load_error_message: "Error loading data".to_string(),
            ..config_in(dir.path())
        };

        match DashboardState::load(&config) {
            DashboardState::Failed { message } => assert_eq!(message, "Error loading data"),
            DashboardState::Ready(_) => panic!("expected error state"),
        }
    }

    #[test]
    fn failed_reload_clears_leftover_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = &config.output_dir;

        // an earlier successful run left KPIs and charts behind
        fs::create_dir_all(out).unwrap();
        fs::write(out.join(KPI_FILE), "{}").unwrap();
        for id in CHART_IDS {
            fs::write(out.join(format!("{id}.svg")), "<svg/>").unwrap();
        }

        let state = DashboardState::load(&config);
        assert!(!state.is_ready());
        state.publish(&config).unwrap();

        assert!(!out.join(KPI_FILE).exists());
        for id in CHART_IDS {
            assert!(!out.join(format!("{id}.svg")).exists(), "{id} left behind");
        }
        let status = fs::read_to_string(out.join(STATUS_FILE)).unwrap();
        let status: serde_json::Value = serde_json::from_str(&status).unwrap();
        assert_eq!(status["status"], "error");
    }

    #[test]
    fn ready_then_failed_publish_leaves_only_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(
            &config.data_path,
            "age,job,education,duration,campaign,poutcome,y\n\
             30,admin.,primary,120,2,success,yes\n\
             41,student,secondary,60,1,failure,no\n",
        )
        .unwrap();

        let ready = DashboardState::load(&config);
        assert!(ready.is_ready());
        let written = ready.publish(&config).unwrap();
        assert!(config.output_dir.join(KPI_FILE).exists());

        fs::remove_file(&config.data_path).unwrap();
        let failed = DashboardState::load(&config);
        assert!(failed.publish(&config).unwrap().is_empty());

        assert!(!config.output_dir.join(KPI_FILE).exists());
        for path in written {
            assert!(!path.exists(), "{} left behind", path.display());
        }
        let status = fs::read_to_string(config.output_dir.join(STATUS_FILE)).unwrap();
        assert!(status.contains("Error al cargar los datos"));
    }

    #[test]
    fn empty_reload_removes_stale_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let out = &config.output_dir;
        fs::create_dir_all(out).unwrap();
        fs::write(out.join("chart-1.svg"), "<svg/>").unwrap();
        fs::write(&config.data_path, "age,job,education,y\n").unwrap();

        let state = DashboardState::load(&config);
        assert!(state.is_ready());
        assert!(state.publish(&config).unwrap().is_empty());

        assert!(!out.join("chart-1.svg").exists());
        assert!(out.join(KPI_FILE).exists());
    }

    #[test]
    fn header_only_file_publishes_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.data_path, "age,job,education,y\n").unwrap();

        let state = DashboardState::load(&config);
        assert!(state.is_ready());

        // no chart has data, so none is rendered
        let written = state.publish(&config).unwrap();
        assert!(written.is_empty());

        let kpis = fs::read_to_string(config.output_dir.join(KPI_FILE)).unwrap();
        let kpis: serde_json::Value = serde_json::from_str(&kpis).unwrap();
        assert_eq!(kpis["panel"]["conversion_rate"], PLACEHOLDER);
        assert!(kpis["summary"].is_null());
    }
}
