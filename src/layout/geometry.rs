//! Geometry helpers: polar conversion and SVG path data.

use glam::DVec2;

use crate::scene::Sector;
use crate::types::Degrees;

/// Point on a circle at `angle` (0° = 12 o'clock, clockwise positive).
///
/// `x = cx + r·sin θ`, `y = cy − r·cos θ`.
pub fn polar_to_cartesian(center: DVec2, radius: f64, angle: Degrees) -> DVec2 {
    center + angle.heading() * radius
}

/// Format a coordinate with at most two decimals, trailing zeros trimmed.
pub fn fmt_num(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Space-separated SVG path data (`M x y L x y A ... Z`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    d: String,
}

impl PathData {
    pub fn new() -> Self {
        Self {
            d: String::with_capacity(64),
        }
    }

    fn command(mut self, cmd: char, args: &[f64]) -> Self {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(cmd);
        for arg in args {
            self.d.push(' ');
            self.d.push_str(&fmt_num(*arg));
        }
        self
    }

    pub fn move_to(self, p: DVec2) -> Self {
        self.command('M', &[p.x, p.y])
    }

    pub fn line_to(self, p: DVec2) -> Self {
        self.command('L', &[p.x, p.y])
    }

    /// Circular arc of `radius` to `p`.
    pub fn arc_to(self, radius: f64, large_arc: bool, sweep: bool, p: DVec2) -> Self {
        let large = if large_arc { 1.0 } else { 0.0 };
        let sweep = if sweep { 1.0 } else { 0.0 };
        self.command('A', &[radius, radius, 0.0, large, sweep, p.x, p.y])
    }

    pub fn close(self) -> Self {
        self.command('Z', &[])
    }

    pub fn as_str(&self) -> &str {
        &self.d
    }

    pub fn build(self) -> String {
        self.d
    }
}

/// Path data for a pie slice.
///
/// Goes center → rim at the end angle, then arcs counter-clockwise back to
/// the rim at the start angle. A full turn is drawn as two half arcs, since
/// an arc whose endpoints coincide draws nothing.
pub fn sector_path(sector: &Sector) -> String {
    let center = sector.center;
    let r = sector.radius;

    if sector.is_full_circle() {
        let top = polar_to_cartesian(center, r, Degrees::ZERO);
        let bottom = polar_to_cartesian(center, r, Degrees::HALF);
        return PathData::new()
            .move_to(top)
            .arc_to(r, false, true, bottom)
            .arc_to(r, false, true, top)
            .close()
            .build();
    }

    PathData::new()
        .move_to(center)
        .line_to(sector.end_point())
        .arc_to(r, sector.large_arc(), false, sector.start_point())
        .close()
        .build()
}

/// Open polyline through `points`; empty for no points.
pub fn polyline_path(points: &[DVec2]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    rest.iter()
        .fold(PathData::new().move_to(*first), |path, p| path.line_to(*p))
        .build()
}
