//! Proportional horizontal bar layout.
//!
//! Bars are stacked top to bottom inside the plot area. The largest value
//! spans the full plot width and every other bar is scaled against it, so
//! `length(v) / length(max) == v / max`.

use glam::dvec2;
use serde::{Deserialize, Serialize};

use super::{ChartKind, defaults, title, validate_canvas};
use crate::errors::LayoutError;
use crate::format::{format_fixed, format_grouped};
use crate::scene::{Anchor, Group, Hover, Label, Rect, Scene, TextStyle};
use crate::types::{Canvas, Color, check_non_negative};

/// Audit totals as supplied by the query layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AuditTotals {
    /// Audits done by the user
    pub total_up: f64,
    /// Audits received by the user
    pub total_down: f64,
    /// Precomputed done/received ratio, if the backend supplied one
    pub ratio: Option<f64>,
}

/// One labelled bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<Color>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

/// Bar chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub canvas: Canvas,
    pub bar_height: f64,
    pub bar_spacing: f64,
    pub corner_radius: f64,
    pub title: String,
    pub done_label: String,
    pub received_label: String,
    pub done_color: Color,
    pub received_color: Color,
    pub text_color: Color,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            canvas: defaults::BAR_CANVAS,
            bar_height: defaults::BAR_HEIGHT,
            bar_spacing: defaults::BAR_SPACING,
            corner_radius: defaults::BAR_CORNER_RADIUS,
            title: "Audit Comparison".to_string(),
            done_label: "Audits Done".to_string(),
            received_label: "Audits Received".to_string(),
            done_color: Color::from(defaults::PRIMARY),
            received_color: Color::from(defaults::SECONDARY),
            text_color: Color::from(defaults::TEXT),
        }
    }
}

/// Lay out the audits-done vs. audits-received comparison.
///
/// A supplied ratio is shown as `"Audit Ratio: 1.23"` under the title.
pub fn layout_audit_comparison(totals: &AuditTotals, config: &BarConfig) -> Result<Scene, LayoutError> {
    let bars = [
        Bar::new(&config.done_label, totals.total_up, config.done_color.clone()),
        Bar::new(&config.received_label, totals.total_down, config.received_color.clone()),
    ];
    let subtitle = totals
        .ratio
        .map(|ratio| format!("Audit Ratio: {}", format_fixed(ratio, 2)));
    layout_bars(&bars, subtitle.as_deref(), config)
}

/// Lay out any number of bars against their common maximum.
///
/// When every value is zero the bars collapse to zero length instead of
/// dividing by zero.
pub fn layout_bars(bars: &[Bar], subtitle: Option<&str>, config: &BarConfig) -> Result<Scene, LayoutError> {
    let canvas = &config.canvas;
    validate_canvas(ChartKind::AuditComparison, canvas)?;
    for bar in bars {
        check_non_negative(bar.value).map_err(|_| LayoutError::InvalidValue {
            chart: ChartKind::AuditComparison.name(),
            value: bar.value,
        })?;
    }

    let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let plot_width = canvas.plot_width();
    crate::log::debug!(bars = bars.len(), max, plot_width, "layout bars");

    let mut scene = Scene::new(canvas.width, canvas.height);
    scene.push(title(canvas, defaults::BAR_TITLE_Y, &config.title, &config.text_color));
    if let Some(subtitle) = subtitle {
        scene.push(Label::new(
            dvec2(canvas.center_x(), defaults::BAR_SUBTITLE_Y),
            subtitle,
            TextStyle::new(defaults::LABEL_SIZE, config.done_color.clone()).anchor(Anchor::Middle),
        ));
    }

    let mut plot = Group::new(canvas.plot_origin());
    for (i, bar) in bars.iter().enumerate() {
        let y = i as f64 * (config.bar_height + config.bar_spacing);
        let share = if max > 0.0 { bar.value / max } else { 0.0 };
        let length = share * plot_width;
        let text_y = y + config.bar_height / 2.0 + 5.0;

        plot.push(Label::new(
            dvec2(-defaults::BAR_LABEL_GAP, text_y),
            &bar.label,
            TextStyle::new(defaults::LABEL_SIZE, config.text_color.clone())
                .medium()
                .anchor(Anchor::End),
        ));
        plot.push(Label::new(
            dvec2(length + defaults::BAR_VALUE_GAP, text_y),
            format_grouped(bar.value),
            TextStyle::new(defaults::LABEL_SIZE, bar.color.clone()).bold(),
        ));

        let percentage = share * 100.0;
        let hover = Hover::new(&bar.label, bar.value)
            .with_percentage(percentage)
            .with_text(
                format!("{}: {}", bar.label, format_grouped(bar.value)),
                format!("{}% of maximum", format_fixed(percentage, 1)),
            );
        plot.push(
            Rect::new(dvec2(0.0, y), dvec2(length, config.bar_height), bar.color.clone())
                .rounded(config.corner_radius)
                .with_hover(hover),
        );
    }
    scene.push(plot);

    Ok(scene)
}
