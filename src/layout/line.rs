//! Cumulative time-series line layout.
//!
//! The value axis always tops out at a round number from
//! [`compute_axis_ticks`], never at the raw data maximum. Points are spread
//! evenly by index, not by date: gaps between active days are not drawn to
//! scale.

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

use super::{ChartKind, defaults, title, validate_canvas};
use crate::errors::LayoutError;
use crate::format::{
    DEFAULT_TICK_COUNT, TickSet, compute_axis_ticks, format_compact, format_date, format_grouped,
    format_month_year,
};
use crate::scene::{Anchor, Group, Hover, Label, Line, LinePath, Marker, Paint, Scene, Stroke, TextStyle};
use crate::series::SeriesPoint;
use crate::types::{Canvas, Color, Degrees};

/// Line chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub canvas: Canvas,
    pub tick_count: usize,
    pub title: String,
    pub axis_caption: String,
    pub marker_color: Color,
    pub gradient_from: Color,
    pub gradient_to: Color,
    pub axis_color: Color,
    pub grid_color: Color,
    pub text_color: Color,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            canvas: defaults::LINE_CANVAS,
            tick_count: DEFAULT_TICK_COUNT,
            title: "XP Progression Over Time".to_string(),
            axis_caption: "Total XP".to_string(),
            marker_color: Color::from(defaults::PRIMARY),
            gradient_from: Color::from(defaults::PRIMARY),
            gradient_to: Color::from(defaults::SECONDARY),
            axis_color: Color::from(defaults::AXIS),
            grid_color: Color::from(defaults::GRID),
            text_color: Color::from(defaults::TEXT),
        }
    }
}

/// Maps series index and value into plot coordinates.
#[derive(Debug, Clone, Copy)]
struct Scale {
    width: f64,
    height: f64,
    count: usize,
    max_y: f64,
}

impl Scale {
    fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            0.0
        } else {
            index as f64 / (self.count - 1) as f64 * self.width
        }
    }

    fn y(&self, value: f64) -> f64 {
        if self.max_y > 0.0 {
            self.height - value / self.max_y * self.height
        } else {
            self.height
        }
    }

    fn point(&self, index: usize, value: f64) -> DVec2 {
        dvec2(self.x(index), self.y(value))
    }
}

/// Indices that get an x-axis date label: first, middle and last.
fn label_indices(count: usize) -> Vec<usize> {
    let mut indices = vec![0, count / 2, count.saturating_sub(1)];
    indices.dedup();
    indices
}

/// Lay out the cumulative XP series.
///
/// Returns `Ok(None)` for an empty series. A single point sits at `x = 0`
/// and no connecting path is drawn.
pub fn layout_progression(series: &[SeriesPoint], config: &LineConfig) -> Result<Option<Scene>, LayoutError> {
    let canvas = &config.canvas;
    validate_canvas(ChartKind::XpProgression, canvas)?;
    if series.is_empty() {
        return Ok(None);
    }

    let max_value = series.iter().map(|p| p.cumulative).max().unwrap_or(0) as f64;
    let ticks: TickSet = compute_axis_ticks(max_value, config.tick_count);
    let scale = Scale {
        width: canvas.plot_width(),
        height: canvas.plot_height(),
        count: series.len(),
        max_y: ticks.max(),
    };
    crate::log::debug!(points = series.len(), max_value, max_y = scale.max_y, ticks = %ticks, "layout progression");

    let mut plot = Group::new(canvas.plot_origin());

    // Grid and value labels
    for tick in ticks.iter() {
        let y = scale.y(tick);
        plot.push(Line {
            from: dvec2(0.0, y),
            to: dvec2(scale.width, y),
            stroke: Stroke::new(config.grid_color.clone(), defaults::GRID_STROKE_WIDTH),
        });
        plot.push(Label::new(
            dvec2(-10.0, y + 5.0),
            format_compact(tick),
            TextStyle::new(defaults::AXIS_LABEL_SIZE, config.axis_color.clone()).anchor(Anchor::End),
        ));
    }

    let points: Vec<DVec2> = series
        .iter()
        .enumerate()
        .map(|(i, p)| scale.point(i, p.cumulative as f64))
        .collect();

    if points.len() >= 2 {
        plot.push(LinePath {
            points: points.clone(),
            stroke: Stroke::new(
                Paint::HorizontalGradient {
                    id: defaults::GRADIENT_ID.to_string(),
                    from: config.gradient_from.clone(),
                    to: config.gradient_to.clone(),
                },
                defaults::LINE_WIDTH,
            ),
            round_caps: true,
        });
    }

    for (point, center) in series.iter().zip(&points) {
        let value = point.cumulative as f64;
        let hover = Hover::new(config.axis_caption.as_str(), value)
            .with_date(point.date)
            .with_text(
                format!("Date: {}", format_date(point.date)),
                format!("{}: {}", config.axis_caption, format_grouped(value)),
            );
        plot.push(Marker {
            center: *center,
            radius: defaults::MARKER_RADIUS,
            fill: Paint::solid(config.marker_color.clone()),
            stroke: Some(Stroke::new(Color::from(defaults::OUTLINE), defaults::MARKER_STROKE_WIDTH)),
            hover: Some(hover),
        });
    }

    for i in label_indices(series.len()) {
        plot.push(Label::new(
            dvec2(scale.x(i), scale.height + defaults::X_LABEL_OFFSET),
            format_month_year(series[i].date),
            TextStyle::new(defaults::AXIS_LABEL_SIZE, config.axis_color.clone()).anchor(Anchor::Middle),
        ));
    }

    let mut scene = Scene::new(canvas.width, canvas.height);
    scene.push(title(canvas, defaults::LINE_TITLE_Y, &config.title, &config.text_color));
    scene.push(
        Label::new(
            dvec2(defaults::Y_CAPTION_X, canvas.height / 2.0),
            config.axis_caption.as_str(),
            TextStyle::new(defaults::LABEL_SIZE, config.axis_color.clone()).anchor(Anchor::Middle),
        )
        .rotated(Degrees(-90.0)),
    );
    scene.push(plot);

    Ok(Some(scene))
}
