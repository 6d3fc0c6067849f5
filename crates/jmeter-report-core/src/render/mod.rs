//! HTML report assembly
//!
//! Renders an [`Analysis`] into one self-contained HTML document: inline CSS,
//! inline SVG charts, no scripts and no network resources. User-derived text
//! (labels, raw cell values, the title) goes through minijinja's HTML
//! auto-escaping.

pub mod charts;

use chrono::{DateTime, Utc};
use minijinja::{context, Environment};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::Analysis;
use crate::coercion::CoercionWarning;
use crate::config::ReportConfig;
use crate::error::Result;

pub use charts::{DonutChart, LineChart};

const TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("report.html");
/// Individual warnings listed in the document; the rest are only counted
pub const LISTED_WARNINGS: usize = 20;

/// Where and when the document is produced
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub report: &'a ReportConfig,
    /// Input file label shown in the header
    pub source: &'a str,
    pub generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct WarningRow<'a> {
    field: String,
    count: usize,
    examples: Vec<&'a CoercionWarning>,
}

/// Renders analyses with a compiled template
pub struct ReportAssembler {
    env: Environment<'static>,
}

impl ReportAssembler {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, REPORT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the full document.
    ///
    /// # Errors
    ///
    /// [`ReportError::Render`](crate::ReportError::Render) if the template
    /// fails to evaluate.
    pub fn render(&self, analysis: &Analysis, ctx: &RenderContext<'_>) -> Result<String> {
        let template = self.env.get_template(TEMPLATE_NAME)?;

        let response_points: Vec<(f64, f64)> = analysis
            .response_times
            .iter()
            .map(|p| (epoch_seconds(p.timestamp), p.elapsed_seconds))
            .collect();
        let response_chart =
            LineChart::from_points(&response_points, "Response Time (s)", 2);

        let throughput = analysis
            .throughput
            .for_display(ctx.report.zero_fill_throughput, ctx.report.max_fill_buckets);
        let throughput_points: Vec<(f64, f64)> = throughput
            .buckets
            .iter()
            .map(|b| (epoch_seconds(b.bucket_start), b.count as f64))
            .collect();
        let throughput_chart = LineChart::from_points(&throughput_points, "Requests/Second", 0);

        let codes_chart = DonutChart::from_distribution(&analysis.response_codes);

        let warning_rows: Vec<WarningRow<'_>> = analysis
            .dataset
            .warning_counts()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(field, count)| WarningRow {
                field: field.to_string(),
                count,
                examples: analysis
                    .dataset
                    .warnings
                    .iter()
                    .filter(|w| w.field == field)
                    .take(LISTED_WARNINGS)
                    .collect(),
            })
            .collect();

        debug!(
            response_points = response_points.len(),
            throughput_points = throughput_points.len(),
            "Rendering report template"
        );

        let html = template.render(context! {
            title => ctx.report.title,
            source => ctx.source,
            generated_at => ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            stats => analysis.stats.entries(),
            statistics_unavailable => analysis.stats.statistics_unavailable,
            thresholds => analysis.thresholds,
            response_chart => response_chart,
            throughput_chart => throughput_chart,
            throughput_zero_filled => throughput.len() > analysis.throughput.len(),
            codes_chart => codes_chart,
            warning_count => analysis.warning_count(),
            warning_rows => warning_rows,
            listed_warnings => LISTED_WARNINGS,
        })?;

        info!("Rendered report document ({} bytes)", html.len());
        Ok(html)
    }
}

fn epoch_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_millis() as f64 / 1000.0
}
