use crate::payload::{EdgeRecord, GraphicRecord, Point};

/// Stroke width applied whenever a record carries no explicit width.
pub const DEFAULT_STROKE_WIDTH: f64 = 0.15;

/// Radius used for circle records that omit theirs.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 0.5;

/// Resolved drawing shape for a silkscreen/fabrication record.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    RawPath { path: String },
    Segment { start: Point, end: Point },
    Rect { origin: Point, width: f64, height: f64 },
    Circle { center: Point, radius: f64 },
    Polygon { outline: Vec<Point> },
    Label { anchor: Point, text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub shape: Shape,
    pub stroke: f64,
}

/// Stroke-width resolution shared by every drawer: explicit `thickness`
/// wins over `width`, which wins over [`DEFAULT_STROKE_WIDTH`].
pub fn stroke_width(thickness: Option<f64>, width: Option<f64>) -> f64 {
    thickness.or(width).unwrap_or(DEFAULT_STROKE_WIDTH)
}

/// Classifies a record into the single shape it draws as. Precedence:
/// a raw path string first, then the explicit `type` tag, then the
/// `ref`/`val` label fallback. Records matching nothing yield `None` and
/// are silently dropped by the dispatcher.
pub fn classify(record: &GraphicRecord) -> Option<DrawOp> {
    let stroke = stroke_width(record.thickness, record.width);

    if let Some(path) = record.svgpath.as_deref() {
        if !path.trim().is_empty() {
            return Some(DrawOp {
                shape: Shape::RawPath {
                    path: path.to_string(),
                },
                stroke,
            });
        }
    }

    match record.kind.as_deref() {
        Some("segment") => {
            if let (Some(start), Some(end)) = (record.start, record.end) {
                return Some(DrawOp {
                    shape: Shape::Segment { start, end },
                    stroke,
                });
            }
        }
        Some("rect") => {
            if let (Some(start), Some(end)) = (record.start, record.end) {
                return Some(DrawOp {
                    shape: Shape::Rect {
                        origin: Point::new(start.x.min(end.x), start.y.min(end.y)),
                        width: (end.x - start.x).abs(),
                        height: (end.y - start.y).abs(),
                    },
                    stroke,
                });
            }
        }
        Some("circle") => {
            if let Some(center) = record.start {
                return Some(DrawOp {
                    shape: Shape::Circle {
                        center,
                        radius: record.radius.unwrap_or(DEFAULT_CIRCLE_RADIUS),
                    },
                    stroke,
                });
            }
        }
        Some("polygon") => {
            if let Some(outline) = record.polygons.first() {
                return Some(DrawOp {
                    shape: Shape::Polygon {
                        outline: outline.clone(),
                    },
                    stroke,
                });
            }
        }
        _ => {}
    }

    let text = non_empty(record.reference.as_deref()).or_else(|| non_empty(record.value.as_deref()))?;
    let anchor = record.pos.or(record.center)?;
    Some(DrawOp {
        shape: Shape::Label {
            anchor,
            text: text.to_string(),
        },
        stroke,
    })
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}

/// Resolved board-outline shape. Arc angles stay in degrees; the sweep
/// flags are decided on the raw degree values.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeShape {
    Segment {
        start: Point,
        end: Point,
    },
    Arc {
        start: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOp {
    pub shape: EdgeShape,
    pub stroke: f64,
}

/// Classifies a board-outline record. `None` means the record is
/// unrecognized and must be reported, not silently dropped.
pub fn classify_edge(edge: &EdgeRecord) -> Option<EdgeOp> {
    let stroke = stroke_width(None, edge.width);
    match edge.kind.as_deref() {
        Some("segment") => {
            let (start, end) = (edge.start?, edge.end?);
            Some(EdgeOp {
                shape: EdgeShape::Segment { start, end },
                stroke,
            })
        }
        Some("arc") => {
            let start = edge.start?;
            let radius = edge.radius?;
            Some(EdgeOp {
                shape: EdgeShape::Arc {
                    start,
                    radius,
                    start_angle: edge.start_angle.unwrap_or(0.0),
                    end_angle: edge.end_angle.unwrap_or(0.0),
                },
                stroke,
            })
        }
        _ => None,
    }
}

/// Geometry of a reconstructed circular arc: center, endpoint and the
/// SVG large-arc/sweep flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: Point,
    pub end: Point,
    pub large_arc: u8,
    pub sweep: u8,
}

/// Rebuilds the arc center from the start point and start angle, then the
/// endpoint from the end angle. Angles are degrees.
pub fn arc_geometry(start: Point, radius: f64, start_angle: f64, end_angle: f64) -> ArcGeometry {
    let a0 = start_angle.to_radians();
    let a1 = end_angle.to_radians();
    let center = Point::new(start.x - radius * a0.cos(), start.y - radius * a0.sin());
    let end = Point::new(center.x + radius * a1.cos(), center.y + radius * a1.sin());
    ArcGeometry {
        center,
        end,
        large_arc: u8::from((end_angle - start_angle).abs() > 180.0),
        sweep: u8::from(end_angle > start_angle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> GraphicRecord {
        serde_json::from_str(json).unwrap()
    }

    fn edge(json: &str) -> EdgeRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn svgpath_wins_over_type_tag() {
        let rec = record(r#"{"svgpath": "M 0 0 L 1 1", "type": "segment", "start": [0,0], "end": [1,1]}"#);
        let op = classify(&rec).unwrap();
        assert!(matches!(op.shape, Shape::RawPath { .. }));
    }

    #[test]
    fn blank_svgpath_falls_through() {
        let rec = record(r#"{"svgpath": "  ", "type": "segment", "start": [0,0], "end": [1,1]}"#);
        let op = classify(&rec).unwrap();
        assert!(matches!(op.shape, Shape::Segment { .. }));
    }

    #[test]
    fn rect_normalizes_corners() {
        let rec = record(r#"{"type": "rect", "start": [10, 0], "end": [0, 5]}"#);
        let op = classify(&rec).unwrap();
        let Shape::Rect {
            origin,
            width,
            height,
        } = op.shape
        else {
            panic!("expected rect, got {:?}", op.shape);
        };
        assert_eq!(origin, Point::new(0.0, 0.0));
        assert_eq!(width, 10.0);
        assert_eq!(height, 5.0);
    }

    #[test]
    fn circle_defaults_radius() {
        let rec = record(r#"{"type": "circle", "start": [3, 4]}"#);
        let op = classify(&rec).unwrap();
        assert_eq!(
            op.shape,
            Shape::Circle {
                center: Point::new(3.0, 4.0),
                radius: DEFAULT_CIRCLE_RADIUS
            }
        );
    }

    #[test]
    fn label_prefers_ref_and_pos() {
        let rec = record(r#"{"ref": "R1", "val": "10k", "pos": [1, 2], "center": [9, 9]}"#);
        let op = classify(&rec).unwrap();
        assert_eq!(
            op.shape,
            Shape::Label {
                anchor: Point::new(1.0, 2.0),
                text: "R1".to_string()
            }
        );
    }

    #[test]
    fn empty_ref_falls_back_to_val() {
        let rec = record(r#"{"ref": "", "val": "10k", "center": [1, 2]}"#);
        let op = classify(&rec).unwrap();
        assert_eq!(
            op.shape,
            Shape::Label {
                anchor: Point::new(1.0, 2.0),
                text: "10k".to_string()
            }
        );
    }

    #[test]
    fn segment_without_end_is_dropped() {
        let rec = record(r#"{"type": "segment", "start": [0, 0]}"#);
        assert_eq!(classify(&rec), None);
    }

    #[test]
    fn stroke_resolution_order() {
        assert_eq!(stroke_width(Some(0.3), Some(0.2)), 0.3);
        assert_eq!(stroke_width(None, Some(0.2)), 0.2);
        assert_eq!(stroke_width(None, None), DEFAULT_STROKE_WIDTH);
    }

    #[test]
    fn arc_reconstruction_quarter_turn() {
        let geometry = arc_geometry(Point::new(10.0, 0.0), 5.0, 0.0, 90.0);
        assert!((geometry.center.x - 5.0).abs() < 1e-9);
        assert!(geometry.center.y.abs() < 1e-9);
        assert!((geometry.end.x - 5.0).abs() < 1e-9);
        assert!((geometry.end.y - 5.0).abs() < 1e-9);
        assert_eq!(geometry.large_arc, 0);
        assert_eq!(geometry.sweep, 1);
    }

    #[test]
    fn arc_flags_for_reflex_and_reversed_arcs() {
        let reflex = arc_geometry(Point::new(0.0, 0.0), 1.0, 0.0, 270.0);
        assert_eq!(reflex.large_arc, 1);
        assert_eq!(reflex.sweep, 1);

        let reversed = arc_geometry(Point::new(0.0, 0.0), 1.0, 90.0, 0.0);
        assert_eq!(reversed.large_arc, 0);
        assert_eq!(reversed.sweep, 0);
    }

    #[test]
    fn unknown_edge_is_unrecognized() {
        assert_eq!(classify_edge(&edge(r#"{"type": "spline"}"#)), None);
        assert_eq!(classify_edge(&edge(r#"{"type": "arc", "start": [0, 0]}"#)), None);
    }

    #[test]
    fn arc_edge_defaults_angles() {
        let op = classify_edge(&edge(r#"{"type": "arc", "start": [1, 0], "radius": 1}"#)).unwrap();
        assert_eq!(
            op.shape,
            EdgeShape::Arc {
                start: Point::new(1.0, 0.0),
                radius: 1.0,
                start_angle: 0.0,
                end_angle: 0.0
            }
        );
    }
}
