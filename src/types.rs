//! Strongly-typed numeric primitives for chart layout.
//!
//! Layout math works in a fixed logical coordinate space (one unit = one
//! CSS pixel of the declared canvas). Device scaling belongs to the host.

use std::fmt;

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
    /// Padding leaves no drawable area
    EmptyPlot,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::EmptyPlot => write!(f, "padding leaves no drawable area"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a value that must be finite and non-negative.
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Angle in degrees, measured clockwise from 12 o'clock.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    pub const ZERO: Degrees = Degrees(0.0);
    pub const FULL: Degrees = Degrees(360.0);
    pub const HALF: Degrees = Degrees(180.0);

    /// Share of a full turn taken by `part` out of `whole`.
    ///
    /// Multiplies before dividing so whole-degree shares stay exact
    /// (`7 of 10` is exactly 252°).
    pub fn share_of_turn(part: usize, whole: usize) -> Degrees {
        Degrees(part as f64 * 360.0 / whole as f64)
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Unit vector for this heading in screen coordinates (Y grows downward).
    ///
    /// 0° points up, 90° points right: `(sin θ, -cos θ)`.
    pub fn heading(self) -> DVec2 {
        let rad = self.0.to_radians();
        dvec2(rad.sin(), -rad.cos())
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Screen margins around the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Fixed logical canvas: outer size plus the padding around the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub padding: Insets,
}

impl Canvas {
    pub const fn new(width: f64, height: f64, padding: Insets) -> Self {
        Self { width, height, padding }
    }

    /// Check sizes are finite, non-negative and leave a non-empty plot area.
    pub fn validate(&self) -> Result<(), NumericError> {
        for v in [
            self.width,
            self.height,
            self.padding.top,
            self.padding.right,
            self.padding.bottom,
            self.padding.left,
        ] {
            check_non_negative(v)?;
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(NumericError::EmptyPlot);
        }
        Ok(())
    }

    /// Width available for data (canvas width minus horizontal padding).
    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.hsum()
    }

    /// Height available for data (canvas height minus vertical padding).
    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.vsum()
    }

    /// Translation applied to the plot group.
    pub fn plot_origin(&self) -> DVec2 {
        dvec2(self.padding.left, self.padding.top)
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }
}

/// CSS color string (`#667eea`, `white`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Color(s.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
