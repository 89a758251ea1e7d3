//! Renderer-agnostic chart scene.
//!
//! A [`Scene`] is a tree of primitive shapes in the chart's fixed logical
//! coordinate space (Y grows downward, origin top-left). Layouts build it,
//! hosts walk it. Nodes carry no behavior beyond geometry queries; hover
//! payloads are plain data for the host's tooltip.

use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use glam::{DVec2, dvec2};
use serde::Serialize;

use crate::types::{Color, Degrees};

/// Common behavior for all scene primitives
#[enum_dispatch]
pub trait Primitive {
    /// What kind of primitive this is
    fn kind(&self) -> PrimitiveKind;

    /// Axis-aligned bounds in the parent's coordinate space
    fn bounds(&self) -> Bounds;

    /// Data shown when the host hovers this primitive
    fn hover(&self) -> Option<&Hover> {
        None
    }
}

/// Any node in a scene tree
#[enum_dispatch(Primitive)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Group(Group),
    Rect(Rect),
    Sector(Sector),
    Path(LinePath),
    Line(Line),
    Circle(Marker),
    Text(Label),
}

/// Discriminant of [`Node`], handy for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Group,
    Rect,
    Sector,
    Path,
    Line,
    Circle,
    Text,
}

// ============================================================================
// Bounds
// ============================================================================

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn point(p: DVec2) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing every point, `None` for no points.
    pub fn from_points(points: &[DVec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::point(*first), |b, p| b.expand(*p)))
    }

    pub fn expand(self, p: DVec2) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translate(self, by: DVec2) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

// ============================================================================
// Paint and text style
// ============================================================================

/// How a shape is filled or stroked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    None,
    Solid(Color),
    /// Left-to-right two-stop gradient; `id` is stable so output is deterministic
    HorizontalGradient { id: String, from: Color, to: Color },
}

impl Paint {
    pub fn solid(color: impl Into<Color>) -> Self {
        Paint::Solid(color.into())
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Outline of a shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f64) -> Self {
        Self {
            paint: paint.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Medium,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub weight: FontWeight,
    pub anchor: Anchor,
    pub fill: Color,
}

impl TextStyle {
    pub fn new(size: f64, fill: impl Into<Color>) -> Self {
        Self {
            size,
            weight: FontWeight::Normal,
            anchor: Anchor::Start,
            fill: fill.into(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn medium(mut self) -> Self {
        self.weight = FontWeight::Medium;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }
}

// ============================================================================
// Hover payload
// ============================================================================

/// Data a host shows when the pointer is over a primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hover {
    /// What the value measures (`"Passed"`, `"Audits Done"`, `"Total XP"`)
    pub label: String,
    pub value: f64,
    /// Percentage attached to the value, if the chart has one
    pub percentage: Option<f64>,
    /// Day the value belongs to, for time series
    pub date: Option<NaiveDate>,
    /// Preformatted headline, e.g. `"Passed: 7 exercises"`
    pub headline: String,
    /// Preformatted second line, e.g. `"70.0% success rate"`
    pub detail: String,
}

impl Hover {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            percentage: None,
            date: None,
            headline: String::new(),
            detail: String::new(),
        }
    }

    pub fn with_percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_text(mut self, headline: impl Into<String>, detail: impl Into<String>) -> Self {
        self.headline = headline.into();
        self.detail = detail.into();
        self
    }

    /// Headline and detail joined for single-line tooltips.
    pub fn tooltip(&self) -> String {
        if self.detail.is_empty() {
            self.headline.clone()
        } else {
            format!("{}\n{}", self.headline, self.detail)
        }
    }
}

// ============================================================================
// Primitive Types
// ============================================================================

/// Translated container; children are positioned relative to `translate`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Group {
    pub translate: DVec2,
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(translate: DVec2) -> Self {
        Self {
            translate,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }
}

impl Primitive for Group {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Group
    }

    fn bounds(&self) -> Bounds {
        self.children
            .iter()
            .map(Primitive::bounds)
            .reduce(Bounds::union)
            .unwrap_or(Bounds::point(DVec2::ZERO))
            .translate(self.translate)
    }
}

/// Axis-aligned rectangle with optional rounded corners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
    pub corner_radius: f64,
    pub fill: Paint,
    pub hover: Option<Hover>,
}

impl Rect {
    pub fn new(origin: DVec2, size: DVec2, fill: impl Into<Paint>) -> Self {
        Self {
            origin,
            size,
            corner_radius: 0.0,
            fill: fill.into(),
            hover: None,
        }
    }

    pub fn rounded(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_hover(mut self, hover: Hover) -> Self {
        self.hover = Some(hover);
        self
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }
}

impl Primitive for Rect {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Rect
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.origin, self.origin + self.size)
    }

    fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }
}

/// Circular sector ("pie slice") swept clockwise from `start` to `end`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub center: DVec2,
    pub radius: f64,
    pub start: Degrees,
    pub end: Degrees,
    pub fill: Paint,
    pub stroke: Option<Stroke>,
    pub hover: Option<Hover>,
}

impl Sector {
    /// Angle covered by the sector.
    pub fn sweep(&self) -> Degrees {
        Degrees(self.end.raw() - self.start.raw())
    }

    /// Whether the arc needs the SVG large-arc flag (sweep over 180°).
    pub fn large_arc(&self) -> bool {
        self.sweep() > Degrees::HALF
    }

    /// Point on the rim at the start angle.
    pub fn start_point(&self) -> DVec2 {
        crate::layout::geometry::polar_to_cartesian(self.center, self.radius, self.start)
    }

    /// Point on the rim at the end angle.
    pub fn end_point(&self) -> DVec2 {
        crate::layout::geometry::polar_to_cartesian(self.center, self.radius, self.end)
    }

    pub fn is_full_circle(&self) -> bool {
        self.sweep() >= Degrees::FULL
    }
}

impl Primitive for Sector {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Sector
    }

    fn bounds(&self) -> Bounds {
        let r = dvec2(self.radius, self.radius);
        Bounds::new(self.center - r, self.center + r)
    }

    fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }
}

/// Open polyline through `points` in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePath {
    pub points: Vec<DVec2>,
    pub stroke: Stroke,
    pub round_caps: bool,
}

impl Primitive for LinePath {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Path
    }

    fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points).unwrap_or(Bounds::point(DVec2::ZERO))
    }
}

/// Straight segment, used for grid lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub from: DVec2,
    pub to: DVec2,
    pub stroke: Stroke,
}

impl Primitive for Line {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Line
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.from, self.to)
    }
}

/// Circle marker on a data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub center: DVec2,
    pub radius: f64,
    pub fill: Paint,
    pub stroke: Option<Stroke>,
    pub hover: Option<Hover>,
}

impl Primitive for Marker {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Circle
    }

    fn bounds(&self) -> Bounds {
        let r = dvec2(self.radius, self.radius);
        Bounds::new(self.center - r, self.center + r)
    }

    fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }
}

/// Text label anchored at `position` (baseline)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub position: DVec2,
    pub content: String,
    pub style: TextStyle,
    /// Rotation about `position`, clockwise
    pub rotation: Option<Degrees>,
}

impl Label {
    pub fn new(position: DVec2, content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            position,
            content: content.into(),
            style,
            rotation: None,
        }
    }

    pub fn rotated(mut self, angle: Degrees) -> Self {
        self.rotation = Some(angle);
        self
    }

    /// Rough advance width assuming an average glyph of 0.6em.
    pub fn approx_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.style.size * 0.6
    }
}

impl Primitive for Label {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Text
    }

    fn bounds(&self) -> Bounds {
        let w = self.approx_width();
        let left = match self.style.anchor {
            Anchor::Start => self.position.x,
            Anchor::Middle => self.position.x - w / 2.0,
            Anchor::End => self.position.x - w,
        };
        Bounds::new(
            dvec2(left, self.position.y - self.style.size),
            dvec2(left + w, self.position.y),
        )
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Complete output of one chart layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub children: Vec<Node>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Every non-group node in depth-first order, with the accumulated
    /// translation of its ancestors.
    pub fn flatten(&self) -> Vec<(DVec2, &Node)> {
        fn walk<'a>(nodes: &'a [Node], offset: DVec2, out: &mut Vec<(DVec2, &'a Node)>) {
            for node in nodes {
                match node {
                    Node::Group(g) => walk(&g.children, offset + g.translate, out),
                    other => out.push((offset, other)),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.children, DVec2::ZERO, &mut out);
        out
    }

    /// Number of primitives of one kind anywhere in the tree.
    pub fn count(&self, kind: PrimitiveKind) -> usize {
        self.flatten().iter().filter(|(_, n)| n.kind() == kind).count()
    }

    /// Text of every label, in tree order.
    pub fn labels(&self) -> Vec<&str> {
        self.flatten()
            .into_iter()
            .filter_map(|(_, n)| match n {
                Node::Text(label) => Some(label.content.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Interactive regions: absolute bounds plus hover payload.
    pub fn hover_regions(&self) -> Vec<(Bounds, &Hover)> {
        self.flatten()
            .into_iter()
            .filter_map(|(offset, n)| n.hover().map(|h| (n.bounds().translate(offset), h)))
            .collect()
    }

    /// Topmost hover payload under `point`, for hosts doing their own
    /// hit testing.
    pub fn hover_at(&self, point: DVec2) -> Option<&Hover> {
        self.hover_regions()
            .into_iter()
            .rev()
            .find(|(bounds, _)| bounds.contains(point))
            .map(|(_, hover)| hover)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(x: f64, y: f64, text: &str) -> Label {
        Label::new(dvec2(x, y), text, TextStyle::new(10.0, "#333"))
    }

    #[test]
    fn bounds_normalize_corners() {
        let b = Bounds::new(dvec2(10.0, 5.0), dvec2(0.0, 20.0));
        assert_eq!(b.min, dvec2(0.0, 5.0));
        assert_eq!(b.max, dvec2(10.0, 20.0));
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 15.0);
    }

    #[test]
    fn bounds_from_points() {
        assert_eq!(Bounds::from_points(&[]), None);
        let b = Bounds::from_points(&[dvec2(1.0, 4.0), dvec2(-2.0, 3.0), dvec2(0.0, 9.0)]).unwrap();
        assert_eq!(b, Bounds::new(dvec2(-2.0, 3.0), dvec2(1.0, 9.0)));
    }

    #[test]
    fn group_bounds_include_translation() {
        let mut g = Group::new(dvec2(100.0, 50.0));
        g.push(Rect::new(dvec2(0.0, 0.0), dvec2(10.0, 10.0), Paint::None));
        g.push(Rect::new(dvec2(20.0, 5.0), dvec2(5.0, 30.0), Paint::None));
        let b = g.bounds();
        assert_eq!(b.min, dvec2(100.0, 50.0));
        assert_eq!(b.max, dvec2(125.0, 85.0));
    }

    #[test]
    fn flatten_accumulates_offsets() {
        let mut inner = Group::new(dvec2(5.0, 5.0));
        inner.push(label(0.0, 0.0, "inner"));
        let mut outer = Group::new(dvec2(10.0, 20.0));
        outer.push(inner);
        outer.push(label(1.0, 1.0, "outer"));

        let mut scene = Scene::new(100.0, 100.0);
        scene.push(outer);
        scene.push(label(0.0, 0.0, "root"));

        let flat = scene.flatten();
        let offsets: Vec<DVec2> = flat.iter().map(|(o, _)| *o).collect();
        assert_eq!(offsets, vec![dvec2(15.0, 25.0), dvec2(10.0, 20.0), DVec2::ZERO]);
        assert_eq!(scene.labels(), vec!["inner", "outer", "root"]);
        assert_eq!(scene.count(PrimitiveKind::Text), 3);
        assert_eq!(scene.count(PrimitiveKind::Group), 0);
    }

    #[test]
    fn hover_regions_are_absolute() {
        let mut g = Group::new(dvec2(150.0, 60.0));
        g.push(
            Rect::new(DVec2::ZERO, dvec2(40.0, 60.0), Paint::solid("#667eea"))
                .with_hover(Hover::new("Audits Done", 40.0)),
        );
        let mut scene = Scene::new(800.0, 400.0);
        scene.push(g);

        let regions = scene.hover_regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].0, Bounds::new(dvec2(150.0, 60.0), dvec2(190.0, 120.0)));
        assert_eq!(regions[0].1.label, "Audits Done");
    }

    #[test]
    fn hover_at_hits_translated_shape() {
        let mut g = Group::new(dvec2(150.0, 60.0));
        g.push(
            Rect::new(DVec2::ZERO, dvec2(40.0, 60.0), Paint::solid("#667eea"))
                .with_hover(Hover::new("Audits Done", 40.0)),
        );
        let mut scene = Scene::new(800.0, 400.0);
        scene.push(g);

        assert_eq!(scene.hover_at(dvec2(170.0, 90.0)).map(|h| h.label.as_str()), Some("Audits Done"));
        assert_eq!(scene.hover_at(dvec2(150.0, 60.0)).map(|h| h.value), Some(40.0));
        assert!(scene.hover_at(dvec2(20.0, 90.0)).is_none());
        assert!(scene.hover_at(dvec2(191.0, 90.0)).is_none());
    }

    #[test]
    fn label_bounds_follow_anchor() {
        let style = TextStyle::new(10.0, "#333").anchor(Anchor::End);
        let l = Label::new(dvec2(100.0, 50.0), "abcde", style);
        let b = l.bounds();
        assert_eq!(b.max.x, 100.0);
        assert_eq!(b.width(), 30.0);
    }

    #[test]
    fn hover_tooltip_joins_lines() {
        let h = Hover::new("Passed", 7.0).with_text("Passed: 7 exercises", "70.0% success rate");
        assert_eq!(h.tooltip(), "Passed: 7 exercises\n70.0% success rate");
        let plain = Hover::new("x", 1.0).with_text("only", "");
        assert_eq!(plain.tooltip(), "only");
    }

    #[test]
    fn scene_serializes_with_kind_tags() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(label(1.0, 2.0, "hi"));
        let json = scene.to_json().unwrap();
        assert!(json.contains(r#""kind":"text""#), "{json}");
        assert!(json.contains(r#""content":"hi""#), "{json}");
    }
}
