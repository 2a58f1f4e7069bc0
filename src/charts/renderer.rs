//! Static Chart Renderer
//! Draws dashboard charts to SVG files with plotters.
//!
//! Bar charts use a segmented x axis (one segment per category, label at the
//! segment center) and draw each bar in its own color. Scatter charts draw one
//! circle series per outcome.
//!
//! Text layout needs a system sans-serif font; without one rendering fails
//! with [`ChartError::Render`].

use super::plotter::{BarChart, ScatterChart};
use crate::config::HexColor;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CAPTION_FONT: (&str, f64) = ("sans-serif", 22.0);
const AXIS_FONT: (&str, f64) = ("sans-serif", 14.0);
const POINT_RADIUS: u32 = 2;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Chart '{0}' has no data to draw")]
    NoData(String),
    #[error("Failed to render chart: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Render(err.to_string())
    }
}

fn rgb(color: HexColor) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

pub struct StaticChartRenderer {
    width: u32,
    height: u32,
    text: RGBColor,
}

impl StaticChartRenderer {
    pub fn new(width: u32, height: u32, text: HexColor) -> Self {
        Self {
            width,
            height,
            text: rgb(text),
        }
    }

    /// Render a bar chart to an SVG file.
    pub fn render_bar_chart(&self, chart: &BarChart, path: &Path) -> Result<(), ChartError> {
        if chart.bars.is_empty() {
            return Err(ChartError::NoData(chart.id.clone()));
        }
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw_bars(&root, chart)?;
        root.present()?;
        Ok(())
    }

    /// Render a scatter chart to an SVG file.
    pub fn render_scatter_chart(
        &self,
        chart: &ScatterChart,
        path: &Path,
    ) -> Result<(), ChartError> {
        if chart.point_count() == 0 {
            return Err(ChartError::NoData(chart.id.clone()));
        }
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw_scatter(&root, chart)?;
        root.present()?;
        Ok(())
    }

    fn draw_bars(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        chart: &BarChart,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE)?;

        let n = chart.bars.len() as u32;
        // headroom above the tallest bar
        let y_max = (chart.max_value() * 1.1).max(1.0);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, CAPTION_FONT.into_font().color(&self.text))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)?;

        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .axis_desc_style(AXIS_FONT.into_font().color(&self.text))
            .draw()?;

        for (i, bar) in chart.bars.iter().enumerate() {
            ctx.draw_series(
                Histogram::vertical(&ctx)
                    .style(rgb(bar.color).filled())
                    .margin(10)
                    .data(std::iter::once((i as u32, bar.value))),
            )?;
        }

        Ok(())
    }

    fn draw_scatter(
        &self,
        root: &DrawingArea<SVGBackend<'_>, Shift>,
        chart: &ScatterChart,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE)?;

        let (x_max, y_max) = chart.bounds();
        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, CAPTION_FONT.into_font().color(&self.text))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..x_max * 1.05, 0f64..y_max * 1.05)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .axis_desc_style(AXIS_FONT.into_font().color(&self.text))
            .draw()?;

        for series in &chart.series {
            let color = rgb(series.color);
            ctx.draw_series(
                series
                    .points
                    .iter()
                    .map(|&point| Circle::new(point, POINT_RADIUS, color.mix(0.6).filled())),
            )?
            .label(series.name.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}
