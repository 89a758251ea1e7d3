//! Default canvas sizes, spacing and palette (logical pixels)

use crate::types::{Canvas, Insets};

// Palette
pub const TEXT: &str = "#333";
pub const MUTED: &str = "#666";
pub const AXIS: &str = "#666";
pub const GRID: &str = "#e0e0e0";
pub const PRIMARY: &str = "#667eea";
pub const SECONDARY: &str = "#764ba2";
pub const PASS: &str = "#27ae60";
pub const FAIL: &str = "#e74c3c";
pub const OUTLINE: &str = "white";

// Shared text
pub const TITLE_SIZE: f64 = 18.0;
pub const LABEL_SIZE: f64 = 14.0;
pub const AXIS_LABEL_SIZE: f64 = 12.0;

// Bar chart
pub const BAR_CANVAS: Canvas = Canvas::new(800.0, 400.0, Insets::new(60.0, 40.0, 80.0, 150.0));
pub const BAR_HEIGHT: f64 = 60.0;
pub const BAR_SPACING: f64 = 100.0;
pub const BAR_CORNER_RADIUS: f64 = 5.0;
pub const BAR_TITLE_Y: f64 = 30.0;
pub const BAR_SUBTITLE_Y: f64 = 50.0;
pub const BAR_LABEL_GAP: f64 = 15.0;
pub const BAR_VALUE_GAP: f64 = 10.0;

// Pie chart
pub const PIE_CANVAS: Canvas = Canvas::new(800.0, 450.0, Insets::new(0.0, 0.0, 0.0, 0.0));
pub const PIE_CENTER_Y: f64 = 200.0;
pub const PIE_RADIUS: f64 = 120.0;
pub const PIE_TITLE_Y: f64 = 30.0;
pub const SLICE_STROKE_WIDTH: f64 = 3.0;
pub const TOTAL_SIZE: f64 = 32.0;
pub const LEGEND_OFFSET: f64 = 50.0;
pub const LEGEND_SPACING: f64 = 200.0;
pub const SWATCH_SIZE: f64 = 20.0;
pub const SWATCH_CORNER_RADIUS: f64 = 3.0;

// Line chart
pub const LINE_CANVAS: Canvas = Canvas::new(800.0, 400.0, Insets::new(40.0, 40.0, 60.0, 80.0));
pub const LINE_WIDTH: f64 = 3.0;
pub const LINE_TITLE_Y: f64 = 25.0;
pub const MARKER_RADIUS: f64 = 5.0;
pub const MARKER_STROKE_WIDTH: f64 = 2.0;
pub const GRID_STROKE_WIDTH: f64 = 1.0;
pub const GRADIENT_ID: &str = "xpGradient";
pub const Y_CAPTION_X: f64 = 20.0;
pub const X_LABEL_OFFSET: f64 = 30.0;
