//! Chart geometry engine.
//!
//! Three independent, pure layouts turn prepared data plus a fixed logical
//! canvas into a [`Scene`](crate::scene::Scene):
//!
//! - [`bar`]: proportional horizontal bars (audits done vs. received)
//! - [`pie`]: pass/fail circular sectors
//! - [`line`]: cumulative time series with round-number value ticks
//!
//! Layouts hold no state between calls; identical input gives an identical
//! scene. Empty input to the pie and line layouts returns `Ok(None)`, the
//! "no data" signal the host turns into a placeholder.

pub mod bar;
pub mod defaults;
pub mod geometry;
pub mod line;
pub mod pie;

use glam::dvec2;

use crate::errors::LayoutError;
use crate::scene::{Anchor, Label, TextStyle};
use crate::types::{Canvas, Color};

pub use bar::{AuditTotals, Bar, BarConfig, layout_audit_comparison, layout_bars};
pub use line::{LineConfig, layout_progression};
pub use pie::{PieConfig, layout_pass_fail, layout_pass_fail_tally};

/// The three dashboard charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    AuditComparison,
    PiscineStats,
    XpProgression,
}

impl ChartKind {
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::AuditComparison => "audit comparison",
            ChartKind::PiscineStats => "piscine stats",
            ChartKind::XpProgression => "xp progression",
        }
    }

    /// Placeholder text for a chart whose input was empty.
    pub fn empty_message(self) -> &'static str {
        match self {
            ChartKind::AuditComparison => "No audit data available",
            ChartKind::PiscineStats => "No Piscine data available",
            ChartKind::XpProgression => "No XP data available",
        }
    }
}

pub(crate) fn validate_canvas(chart: ChartKind, canvas: &Canvas) -> Result<(), LayoutError> {
    canvas.validate().map_err(|source| LayoutError::InvalidCanvas {
        chart: chart.name(),
        source,
    })
}

/// Bold, centered chart title at height `y`.
pub(crate) fn title(canvas: &Canvas, y: f64, text: &str, color: &Color) -> Label {
    Label::new(
        dvec2(canvas.center_x(), y),
        text,
        TextStyle::new(defaults::TITLE_SIZE, color.clone())
            .bold()
            .anchor(Anchor::Middle),
    )
}
