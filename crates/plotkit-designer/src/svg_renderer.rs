//! SVG preview of a geometry model.
//!
//! The document is sized in millimetres with a matching `viewBox`, so one
//! user unit is one millimetre. Every model node becomes a `<g>` translated
//! by its origin, which keeps the tree structure visible in the output.

use lyon::geom::SvgArc;
use plotkit_core::{Arc, Canvas, Circle, GeometryModel, LayerStyle, Line, Path};
use std::fmt::Write;

/// Stroke used when no ancestor sets one.
pub const DEFAULT_STROKE: &str = "#000000";
/// Stroke width in millimetres when no ancestor sets one.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.3;

/// Renders `model` onto a page the size of `canvas`.
pub fn render_svg(model: &GeometryModel, canvas: &Canvas) -> String {
    let mut out = String::new();
    let w = fmt_num(canvas.width);
    let h = fmt_num(canvas.height);
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"  <g fill="none" stroke="{DEFAULT_STROKE}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round">"#,
        fmt_num(DEFAULT_STROKE_WIDTH)
    );
    render_node(&mut out, model, 2);
    out.push_str("  </g>\n</svg>\n");
    out
}

fn render_node(out: &mut String, node: &GeometryModel, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(
        out,
        r#"{indent}<g transform="translate({} {})"{}>"#,
        fmt_num(node.origin.x),
        fmt_num(node.origin.y),
        style_attributes(node.style.as_ref())
    );
    for (_, path) in node.paths() {
        let _ = writeln!(out, "{indent}  {}", path_element(path));
    }
    for (_, child) in node.models() {
        render_node(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</g>");
}

fn style_attributes(style: Option<&LayerStyle>) -> String {
    let Some(style) = style else {
        return String::new();
    };
    let mut attrs = String::new();
    if let Some(stroke) = &style.stroke {
        let _ = write!(attrs, r#" stroke="{}""#, escape_attr(stroke));
    }
    if let Some(width) = style.stroke_width {
        let _ = write!(attrs, r#" stroke-width="{}""#, fmt_num(width));
    }
    if !style.visible {
        attrs.push_str(r#" display="none""#);
    }
    attrs
}

/// SVG element for one path in its node's local frame.
pub fn path_element(path: &Path) -> String {
    match path {
        Path::Line(line) => line_element(line),
        Path::Arc(arc) => arc_element(arc),
        Path::Circle(circle) => circle_element(circle),
    }
}

fn line_element(line: &Line) -> String {
    format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
        fmt_num(line.start.x),
        fmt_num(line.start.y),
        fmt_num(line.end.x),
        fmt_num(line.end.y)
    )
}

fn circle_element(circle: &Circle) -> String {
    format!(
        r#"<circle cx="{}" cy="{}" r="{}"/>"#,
        fmt_num(circle.center.x),
        fmt_num(circle.center.y),
        fmt_num(circle.radius)
    )
}

fn arc_element(arc: &Arc) -> String {
    let lyon_arc = arc.to_lyon();
    let from = lyon_arc.from();
    let mut d = format!("M {} {}", fmt_num(from.x), fmt_num(from.y));
    // an SVG arc command cannot start and end on the same point
    let pieces = if arc.sweep() > 180.0 {
        let (a, b) = lyon_arc.split(0.5);
        vec![a.to_svg_arc(), b.to_svg_arc()]
    } else {
        vec![lyon_arc.to_svg_arc()]
    };
    for piece in pieces {
        push_arc_command(&mut d, &piece);
    }
    format!(r#"<path d="{d}"/>"#)
}

fn push_arc_command(d: &mut String, arc: &SvgArc<f64>) {
    let _ = write!(
        d,
        " A {} {} {} {} {} {} {}",
        fmt_num(arc.radii.x),
        fmt_num(arc.radii.y),
        fmt_num(arc.x_rotation.to_degrees()),
        u8::from(arc.flags.large_arc),
        u8::from(arc.flags.sweep),
        fmt_num(arc.to.x),
        fmt_num(arc.to.y)
    );
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
