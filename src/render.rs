use crate::bounds::{collect_bounds, fit_viewport};
use crate::config::{Config, RenderConfig};
use crate::extract::{PayloadError, payload_from_str};
use crate::ir::{EdgeShape, Shape, arc_geometry, classify, classify_edge};
use crate::payload::{EdgeRecord, FootprintRecord, GraphicRecord, Payload, Point};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Renders one payload into a complete SVG document. The coordinate space
/// is board units; the surface scales to its container via `width:100%`.
pub fn render_board(payload: &Payload, theme: &Theme, config: &RenderConfig) -> String {
    let viewport = fit_viewport(&collect_bounds(payload));

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"pcb-svg\" style=\"width:100%;border:1px solid {};background:{}\" viewBox=\"{}\">",
        theme.border,
        theme.background,
        viewport.view_box()
    ));
    svg.push_str(&format!(
        "<g transform=\"translate({} {})\">",
        viewport.shift_x, viewport.shift_y
    ));

    if config.fabrication {
        draw_graphics(&mut svg, payload.fabrication(), &theme.fabrication, theme);
    }
    draw_graphics(&mut svg, payload.silkscreen(), &theme.silkscreen, theme);
    draw_footprints(&mut svg, &payload.footprints, theme);
    draw_edges(&mut svg, &payload.edges, theme);

    svg.push_str("</g></svg>");
    svg
}

/// Dispatches silkscreen/fabrication records to their primitive drawer.
/// Records that classify to nothing are dropped without comment.
fn draw_graphics(svg: &mut String, records: &[GraphicRecord], color: &str, theme: &Theme) {
    for record in records {
        let Some(op) = classify(record) else {
            continue;
        };
        match op.shape {
            Shape::RawPath { path } => push_raw_path(svg, &path, color, op.stroke),
            Shape::Segment { start, end } => push_line(svg, start, end, color, op.stroke),
            Shape::Rect {
                origin,
                width,
                height,
            } => push_rect(svg, origin, width, height, color, op.stroke),
            Shape::Circle { center, radius } => push_circle(svg, center, radius, color, op.stroke),
            Shape::Polygon { outline } => push_polygon(svg, &outline, color, op.stroke),
            Shape::Label { anchor, text } => {
                push_text(svg, anchor, &text, theme.label_font_size, color);
            }
        }
    }
}

/// Draws each through-hole pad as a circle sized from the larger pad
/// extent. Surface-mount pads never render here.
fn draw_footprints(svg: &mut String, footprints: &[FootprintRecord], theme: &Theme) {
    for footprint in footprints {
        if footprint.anchor().is_none() {
            continue;
        }
        for pad in &footprint.pads {
            if !pad.is_through_hole() {
                continue;
            }
            let (Some(pos), Some(size)) = (pad.pos, pad.size) else {
                continue;
            };
            let radius = size.x.max(size.y) / 2.0;
            push_circle(svg, pos, radius, &theme.pad, theme.pad_stroke_width);
        }
    }
}

/// Board outline: straight segments and reconstructed circular arcs.
/// Unrecognized records go to the diagnostic channel and are skipped.
fn draw_edges(svg: &mut String, edges: &[EdgeRecord], theme: &Theme) {
    for edge in edges {
        let Some(op) = classify_edge(edge) else {
            tracing::warn!(record = ?edge, "unhandled edge record");
            continue;
        };
        match op.shape {
            EdgeShape::Segment { start, end } => push_line(svg, start, end, &theme.edge, op.stroke),
            EdgeShape::Arc {
                start,
                radius,
                start_angle,
                end_angle,
            } => {
                let arc = arc_geometry(start, radius, start_angle, end_angle);
                let d = format!(
                    "M {} {} A {} {} 0 {} {} {} {}",
                    start.x, start.y, radius, radius, arc.large_arc, arc.sweep, arc.end.x, arc.end.y
                );
                push_raw_path(svg, &d, &theme.edge, op.stroke);
            }
        }
    }
}

fn push_line(svg: &mut String, start: Point, end: Point, color: &str, width: f64) {
    svg.push_str(&format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        start.x, start.y, end.x, end.y, color, width
    ));
}

fn push_rect(svg: &mut String, origin: Point, w: f64, h: f64, color: &str, width: f64) {
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        origin.x, origin.y, w, h, color, width
    ));
}

fn push_circle(svg: &mut String, center: Point, radius: f64, color: &str, width: f64) {
    svg.push_str(&format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        center.x, center.y, radius, color, width
    ));
}

fn push_polygon(svg: &mut String, outline: &[Point], color: &str, width: f64) {
    let points = outline
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(
        "<polygon points=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        points, color, width
    ));
}

fn push_raw_path(svg: &mut String, d: &str, color: &str, width: f64) {
    svg.push_str(&format!(
        "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>",
        escape_xml(d),
        color,
        width
    ));
}

fn push_text(svg: &mut String, anchor: Point, text: &str, size: f64, color: &str) {
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        anchor.x,
        anchor.y,
        size,
        color,
        escape_xml(text)
    ));
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Owned handle over the rendered surface. Each successful update discards
/// the previous document and builds a fresh one; any failure leaves the
/// previous document in place.
#[derive(Debug, Default)]
pub struct BoardView {
    config: Config,
    svg: Option<String>,
}

impl BoardView {
    pub fn new(config: Config) -> Self {
        Self { config, svg: None }
    }

    /// Replaces the surface from a new upload response (HTML or JSON).
    pub fn update(&mut self, input: &str) -> Result<&str, PayloadError> {
        let payload = payload_from_str(input)?;
        if !payload.is_ok() {
            let message = payload
                .message
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(PayloadError::Status(message));
        }
        let svg = render_board(&payload, &self.config.theme, &self.config.render);
        Ok(self.svg.insert(svg).as_str())
    }

    pub fn current(&self) -> Option<&str> {
        self.svg.as_deref()
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}
