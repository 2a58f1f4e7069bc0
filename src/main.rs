//! Campaign Dashboard - builds the KPI panel and charts for a campaign CSV.

use anyhow::Context;
use campaign_insights::{DashboardConfig, DashboardState};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = DashboardConfig::discover().context("loading dashboard config")?;

    // A load failure is not fatal here: it is published as the error state
    let state = DashboardState::load(&config);
    let charts = state.publish(&config).with_context(|| {
        format!("writing dashboard to {}", config.output_dir.display())
    })?;

    tracing::info!(
        output = %config.output_dir.display(),
        charts = charts.len(),
        ready = state.is_ready(),
        "dashboard published"
    );
    Ok(())
}
