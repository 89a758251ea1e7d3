//! SVG output for a [`Scene`].
//!
//! One element per node, groups become `<g transform>`, hover payloads become
//! a `<title>` child (the browser's native tooltip) plus `data-*` attributes
//! a host script can pick up. Coordinates are written with at most two
//! decimals.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::layout::geometry::{fmt_num, polyline_path, sector_path};
use crate::scene::{Anchor, FontWeight, Hover, Node, Paint, Scene, Stroke};
use crate::types::Color;

/// Options for [`render_svg`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    /// Let the host scale the drawing down to its container width while
    /// keeping the aspect ratio.
    pub responsive: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self { responsive: true }
    }
}

/// Render a scene to a standalone SVG document.
pub fn render_svg(scene: &Scene, options: &SvgOptions) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    let (w, h) = (fmt_num(scene.width), fmt_num(scene.height));

    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}""#
    )?;
    if options.responsive {
        svg.push_str(r#" style="max-width:100%;height:auto""#);
    }
    writeln!(svg, ">")?;

    write_gradients(&mut svg, scene)?;
    for node in &scene.children {
        write_node(&mut svg, node, 1)?;
    }

    writeln!(svg, "</svg>")?;
    crate::log::debug!(bytes = svg.len(), "rendered svg");
    Ok(svg)
}

/// Every distinct gradient paint in the scene, first occurrence wins.
fn gradients(scene: &Scene) -> Vec<(&str, &Color, &Color)> {
    let mut found: Vec<(&str, &Color, &Color)> = Vec::new();
    for (_, node) in scene.flatten() {
        let paints: [Option<&Paint>; 2] = match node {
            Node::Rect(r) => [Some(&r.fill), None],
            Node::Sector(s) => [Some(&s.fill), s.stroke.as_ref().map(|s| &s.paint)],
            Node::Path(p) => [Some(&p.stroke.paint), None],
            Node::Line(l) => [Some(&l.stroke.paint), None],
            Node::Circle(c) => [Some(&c.fill), c.stroke.as_ref().map(|s| &s.paint)],
            Node::Text(_) | Node::Group(_) => [None, None],
        };
        for paint in paints.into_iter().flatten() {
            if let Paint::HorizontalGradient { id, from, to } = paint {
                if !found.iter().any(|(seen, _, _)| *seen == id.as_str()) {
                    found.push((id.as_str(), from, to));
                }
            }
        }
    }
    found
}

fn write_gradients(svg: &mut String, scene: &Scene) -> fmt::Result {
    let gradients = gradients(scene);
    if gradients.is_empty() {
        return Ok(());
    }
    writeln!(svg, "  <defs>")?;
    for (id, from, to) in gradients {
        writeln!(
            svg,
            r#"    <linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="0%">"#,
            escape_xml(id)
        )?;
        writeln!(svg, r#"      <stop offset="0%" stop-color="{}"/>"#, escape_xml(from.as_str()))?;
        writeln!(svg, r#"      <stop offset="100%" stop-color="{}"/>"#, escape_xml(to.as_str()))?;
        writeln!(svg, "    </linearGradient>")?;
    }
    writeln!(svg, "  </defs>")
}

fn paint_value(paint: &Paint) -> String {
    match paint {
        Paint::None => "none".to_string(),
        Paint::Solid(color) => escape_xml(color.as_str()),
        Paint::HorizontalGradient { id, .. } => format!("url(#{})", escape_xml(id)),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    match stroke {
        Some(stroke) => format!(
            r#" stroke="{}" stroke-width="{}""#,
            paint_value(&stroke.paint),
            fmt_num(stroke.width)
        ),
        None => String::new(),
    }
}

fn hover_attrs(hover: Option<&Hover>) -> String {
    let Some(hover) = hover else {
        return String::new();
    };
    let mut attrs = format!(r#" data-value="{}""#, fmt_num(hover.value));
    if let Some(pct) = hover.percentage {
        attrs.push_str(&format!(r#" data-percentage="{}""#, fmt_num(pct)));
    }
    if let Some(date) = hover.date {
        attrs.push_str(&format!(r#" data-date="{}""#, date.format("%Y-%m-%d")));
    }
    attrs
}

/// Close an element opened with `<{tag}{attrs}`, nesting a `<title>` when
/// there is hover text.
fn finish_element(svg: &mut String, tag: &str, hover: Option<&Hover>, pad: &str) -> fmt::Result {
    match hover {
        Some(hover) if !hover.headline.is_empty() => {
            writeln!(svg, ">")?;
            writeln!(svg, "{pad}  <title>{}</title>", escape_xml(&hover.tooltip()))?;
            writeln!(svg, "{pad}</{tag}>")
        }
        _ => writeln!(svg, "/>"),
    }
}

fn write_node(svg: &mut String, node: &Node, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match node {
        Node::Group(group) => {
            writeln!(
                svg,
                r#"{pad}<g transform="translate({}, {})">"#,
                fmt_num(group.translate.x),
                fmt_num(group.translate.y)
            )?;
            for child in &group.children {
                write_node(svg, child, depth + 1)?;
            }
            writeln!(svg, "{pad}</g>")
        }
        Node::Rect(rect) => {
            write!(
                svg,
                r#"{pad}<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt_num(rect.origin.x),
                fmt_num(rect.origin.y),
                fmt_num(rect.size.x),
                fmt_num(rect.size.y)
            )?;
            if rect.corner_radius > 0.0 {
                write!(svg, r#" rx="{}""#, fmt_num(rect.corner_radius))?;
            }
            write!(
                svg,
                r#" fill="{}"{}"#,
                paint_value(&rect.fill),
                hover_attrs(rect.hover.as_ref())
            )?;
            finish_element(svg, "rect", rect.hover.as_ref(), &pad)
        }
        Node::Sector(sector) => {
            write!(
                svg,
                r#"{pad}<path d="{}" fill="{}"{}{}"#,
                sector_path(sector),
                paint_value(&sector.fill),
                stroke_attrs(sector.stroke.as_ref()),
                hover_attrs(sector.hover.as_ref())
            )?;
            finish_element(svg, "path", sector.hover.as_ref(), &pad)
        }
        Node::Path(path) => {
            write!(
                svg,
                r#"{pad}<path d="{}" fill="none"{}"#,
                polyline_path(&path.points),
                stroke_attrs(Some(&path.stroke))
            )?;
            if path.round_caps {
                svg.push_str(r#" stroke-linecap="round""#);
            }
            writeln!(svg, "/>")
        }
        Node::Line(line) => writeln!(
            svg,
            r#"{pad}<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            fmt_num(line.from.x),
            fmt_num(line.from.y),
            fmt_num(line.to.x),
            fmt_num(line.to.y),
            stroke_attrs(Some(&line.stroke))
        ),
        Node::Circle(marker) => {
            write!(
                svg,
                r#"{pad}<circle cx="{}" cy="{}" r="{}" fill="{}"{}{}"#,
                fmt_num(marker.center.x),
                fmt_num(marker.center.y),
                fmt_num(marker.radius),
                paint_value(&marker.fill),
                stroke_attrs(marker.stroke.as_ref()),
                hover_attrs(marker.hover.as_ref())
            )?;
            finish_element(svg, "circle", marker.hover.as_ref(), &pad)
        }
        Node::Text(label) => {
            let (x, y) = (fmt_num(label.position.x), fmt_num(label.position.y));
            match label.rotation {
                Some(angle) => write!(
                    svg,
                    r#"{pad}<text transform="translate({x}, {y}) rotate({})""#,
                    fmt_num(angle.raw())
                )?,
                None => write!(svg, r#"{pad}<text x="{x}" y="{y}""#)?,
            }
            let anchor = match label.style.anchor {
                Anchor::Start => None,
                Anchor::Middle => Some("middle"),
                Anchor::End => Some("end"),
            };
            if let Some(anchor) = anchor {
                write!(svg, r#" text-anchor="{anchor}""#)?;
            }
            write!(svg, r#" font-size="{}""#, fmt_num(label.style.size))?;
            match label.style.weight {
                FontWeight::Normal => {}
                FontWeight::Medium => svg.push_str(r#" font-weight="500""#),
                FontWeight::Bold => svg.push_str(r#" font-weight="bold""#),
            }
            writeln!(
                svg,
                r#" fill="{}">{}</text>"#,
                escape_xml(label.style.fill.as_str()),
                escape_xml(&label.content)
            )
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
