//! Inline SVG chart geometry
//!
//! Charts are computed here as plain coordinates and drawn by the template,
//! so the document needs no script or external resource to display them.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use chrono::DateTime;
use serde::Serialize;

pub const CHART_WIDTH: f64 = 900.0;
pub const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
const Y_TICKS: usize = 4;
const X_TICKS: usize = 4;
/// Polylines longer than this are thinned by striding
const MAX_LINE_POINTS: usize = 2_000;
/// Point markers are drawn only for short series
const MAX_MARKERS: usize = 200;

const DONUT_RADIUS: f64 = 80.0;
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
}

/// A time-axis line chart ready to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub width: f64,
    pub height: f64,
    pub plot_left: f64,
    pub plot_right: f64,
    pub plot_top: f64,
    pub plot_bottom: f64,
    /// `x,y` pairs separated by spaces, for `<polyline points=...>`
    pub points: String,
    pub markers: Vec<Marker>,
    pub x_labels: Vec<AxisLabel>,
    pub y_labels: Vec<AxisLabel>,
    pub y_title: String,
    pub is_empty: bool,
}

impl LineChart {
    /// Chart `(epoch seconds, value)` points in the given order
    pub fn from_points(points: &[(f64, f64)], y_title: &str, y_precision: usize) -> Self {
        let plot_left = MARGIN_LEFT;
        let plot_right = CHART_WIDTH - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = CHART_HEIGHT - MARGIN_BOTTOM;

        let (mut x_min, mut x_max) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
                (lo.min(x), hi.max(x))
            });
        if points.is_empty() {
            x_min = 0.0;
            x_max = 1.0;
        } else if x_max - x_min < f64::EPSILON {
            x_min -= 1.0;
            x_max += 1.0;
        }
        let mut y_max = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
        if y_max <= 0.0 {
            y_max = 1.0;
        }

        let scale_x = |x: f64| plot_left + (x - x_min) / (x_max - x_min) * (plot_right - plot_left);
        let scale_y = |y: f64| plot_bottom - y / y_max * (plot_bottom - plot_top);

        let stride = points.len().div_ceil(MAX_LINE_POINTS).max(1);
        let mut drawn: Vec<(f64, f64)> = points
            .iter()
            .step_by(stride)
            .map(|&(x, y)| (scale_x(x), scale_y(y)))
            .collect();
        if let Some(&(x, y)) = points.last() {
            if (points.len() - 1) % stride != 0 {
                drawn.push((scale_x(x), scale_y(y)));
            }
        }

        let points_attr = drawn
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        let markers = if drawn.len() <= MAX_MARKERS {
            drawn.iter().map(|&(x, y)| Marker { x, y }).collect()
        } else {
            Vec::new()
        };

        let y_labels = (0..=Y_TICKS)
            .map(|i| {
                let value = y_max * i as f64 / Y_TICKS as f64;
                AxisLabel {
                    x: plot_left - 8.0,
                    y: scale_y(value),
                    text: format!("{:.*}", y_precision, value),
                }
            })
            .collect();
        let x_labels = if points.is_empty() {
            Vec::new()
        } else {
            (0..=X_TICKS)
                .map(|i| {
                    let value = x_min + (x_max - x_min) * i as f64 / X_TICKS as f64;
                    AxisLabel {
                        x: scale_x(value),
                        y: plot_bottom + 20.0,
                        text: clock_label(value),
                    }
                })
                .collect()
        };

        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            plot_left,
            plot_right,
            plot_top,
            plot_bottom,
            points: points_attr,
            markers,
            x_labels,
            y_labels,
            y_title: y_title.to_string(),
            is_empty: points.is_empty(),
        }
    }
}

fn clock_label(epoch_seconds: f64) -> String {
    let millis = (epoch_seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// One ring segment of the response-code chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub count: u64,
    pub percent: String,
    pub color: &'static str,
    /// Stroke length of this slice along the ring
    pub dash: f64,
    /// Remainder of the circumference
    pub gap: f64,
    /// Negative distance from the ring start to this slice
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub radius: f64,
    pub circumference: f64,
    pub slices: Vec<DonutSlice>,
    pub total: u64,
}

impl DonutChart {
    /// Slices largest first; equal counts keep label order
    pub fn from_distribution(distribution: &BTreeMap<String, u64>) -> Self {
        let total: u64 = distribution.values().sum();
        let circumference = 2.0 * PI * DONUT_RADIUS;

        let mut entries: Vec<(&String, &u64)> = distribution.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));

        let mut start = 0.0;
        let slices = entries
            .into_iter()
            .enumerate()
            .map(|(i, (label, &count))| {
                let fraction = if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                };
                let dash = fraction * circumference;
                let slice = DonutSlice {
                    label: if label.is_empty() {
                        "(empty)".to_string()
                    } else {
                        label.clone()
                    },
                    count,
                    percent: format!("{:.1}", fraction * 100.0),
                    color: PALETTE[i % PALETTE.len()],
                    dash,
                    gap: circumference - dash,
                    offset: -start,
                };
                start += dash;
                slice
            })
            .collect();

        Self {
            radius: DONUT_RADIUS,
            circumference,
            slices,
            total,
        }
    }
}
