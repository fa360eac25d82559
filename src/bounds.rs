use crate::payload::{EdgeRecord, FootprintRecord, GraphicRecord, Payload, Point};

/// Fraction of the summed bounding-box extents added as padding on every
/// side of the viewport.
const MARGIN_RATIO: f64 = 0.05;

/// Box used when no record contributed a single valid point.
const FALLBACK_BOX: BoundingBox = BoundingBox {
    min_x: 0.0,
    min_y: 0.0,
    max_x: 100.0,
    max_y: 100.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    fn is_empty(&self) -> bool {
        !self.min_x.is_finite()
    }
}

/// Accumulates every point-like feature across all four collections and
/// returns the covering box, or the 100x100 fallback when nothing
/// contributed.
pub fn collect_bounds(payload: &Payload) -> BoundingBox {
    let mut bbox = BoundingBox::empty();
    for record in payload.fabrication().iter().chain(payload.silkscreen()) {
        graphic_points(record, &mut bbox);
    }
    for footprint in &payload.footprints {
        footprint_points(footprint, &mut bbox);
    }
    for edge in &payload.edges {
        edge_points(edge, &mut bbox);
    }
    if bbox.is_empty() { FALLBACK_BOX } else { bbox }
}

fn graphic_points(record: &GraphicRecord, bbox: &mut BoundingBox) {
    if let (Some(start), Some(end)) = (record.start, record.end) {
        bbox.include(start);
        bbox.include(end);
    }
    if let Some(center) = record.center {
        bbox.include(center);
    }
    if let Some(pos) = record.pos {
        bbox.include(pos);
    }
    if let Some(outline) = record.polygons.first() {
        for vertex in outline {
            bbox.include(*vertex);
        }
    }
    if let Some(radius) = record.radius {
        radius_corners(record.center.or(record.pos).or(record.start), radius, bbox);
    }
}

fn footprint_points(footprint: &FootprintRecord, bbox: &mut BoundingBox) {
    if let Some(anchor) = footprint.anchor() {
        bbox.include(anchor);
    }
    for pad in &footprint.pads {
        if let Some(pos) = pad.pos {
            bbox.include(pos);
            if let Some(size) = pad.size {
                bbox.include(Point::new(pos.x + size.x / 2.0, pos.y + size.y / 2.0));
                bbox.include(Point::new(pos.x - size.x / 2.0, pos.y - size.y / 2.0));
            }
        }
    }
}

fn edge_points(edge: &EdgeRecord, bbox: &mut BoundingBox) {
    if let (Some(start), Some(end)) = (edge.start, edge.end) {
        bbox.include(start);
        bbox.include(end);
    }
    if let Some(radius) = edge.radius {
        radius_corners(edge.start, radius, bbox);
    }
}

/// A circle's bounding square, approximated from a reference point.
fn radius_corners(reference: Option<Point>, radius: f64, bbox: &mut BoundingBox) {
    let Some(reference) = reference else { return };
    bbox.include(Point::new(reference.x + radius, reference.y + radius));
    bbox.include(Point::new(reference.x - radius, reference.y - radius));
}

/// Padded, centered region of board-unit space mapped onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
    /// Translation re-centering the content box within the viewport.
    pub shift_x: f64,
    pub shift_y: f64,
}

impl Viewport {
    pub fn view_box(&self) -> String {
        format!("{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.min_x + self.width
            && point.y >= self.min_y
            && point.y <= self.min_y + self.height
    }
}

/// Pads the bounds by 5% of the summed extents on each side and computes
/// the centering shift. Degenerate bounds keep their zero margin on the
/// collapsed axis; content is never rescaled here.
pub fn fit_viewport(bounds: &BoundingBox) -> Viewport {
    let margin = MARGIN_RATIO * ((bounds.max_x - bounds.min_x) + (bounds.max_y - bounds.min_y));
    let min_x = bounds.min_x - margin;
    let min_y = bounds.min_y - margin;
    let width = (bounds.max_x - bounds.min_x) + 2.0 * margin;
    let height = (bounds.max_y - bounds.min_y) + 2.0 * margin;
    Viewport {
        min_x,
        min_y,
        width,
        height,
        shift_x: (min_x + width / 2.0) - (bounds.min_x + bounds.max_x) / 2.0,
        shift_y: (min_y + height / 2.0) - (bounds.min_y + bounds.max_y) / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> Payload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_payload_uses_fallback_box() {
        let bounds = collect_bounds(&Payload::default());
        assert_eq!(bounds, FALLBACK_BOX);
        let viewport = fit_viewport(&bounds);
        assert_eq!(viewport.min_x, -10.0);
        assert_eq!(viewport.min_y, -10.0);
        assert_eq!(viewport.width, 120.0);
        assert_eq!(viewport.height, 120.0);
    }

    #[test]
    fn centering_shift_is_zero_for_symmetric_margin() {
        let viewport = fit_viewport(&collect_bounds(&Payload::default()));
        assert_eq!(viewport.shift_x, 0.0);
        assert_eq!(viewport.shift_y, 0.0);
    }

    #[test]
    fn radius_expands_bounds_around_reference() {
        let payload = payload(
            r#"{"drawings": {"silkscreen": {"F": [
                {"type": "circle", "start": [10, 10], "radius": 3}
            ]}}}"#,
        );
        let bounds = collect_bounds(&payload);
        assert_eq!(bounds.min_x, 7.0);
        assert_eq!(bounds.max_y, 13.0);
    }

    #[test]
    fn pad_corners_expand_bounds() {
        let payload = payload(
            r#"{"footprints": [{"bbox": {"pos": [0, 0]}, "pads": [
                {"type": "th", "pos": [10, 10], "size": [4, 2]}
            ]}]}"#,
        );
        let bounds = collect_bounds(&payload);
        assert_eq!(bounds.max_x, 12.0);
        assert_eq!(bounds.max_y, 11.0);
        assert_eq!(bounds.min_x, 0.0);
    }

    #[test]
    fn invalid_coordinates_are_ignored() {
        let payload = payload(
            r#"{"edges": [
                {"type": "segment", "start": [0, "x"], "end": [5, 5]},
                {"type": "segment", "start": [1, 1], "end": [2, 2]}
            ]}"#,
        );
        // First segment has no valid start so neither of its ends count.
        let bounds = collect_bounds(&payload);
        assert_eq!(bounds, BoundingBox { min_x: 1.0, min_y: 1.0, max_x: 2.0, max_y: 2.0 });
    }

    #[test]
    fn viewport_contains_every_extracted_point() {
        let payload = payload(
            r#"{
                "drawings": {"silkscreen": {"F": [
                    {"type": "segment", "start": [-4, 2], "end": [30, 18]},
                    {"ref": "U1", "pos": [12, -3]}
                ]}},
                "edges": [{"type": "arc", "start": [40, 0], "radius": 6}]
            }"#,
        );
        let bounds = collect_bounds(&payload);
        let viewport = fit_viewport(&bounds);
        for point in [
            Point::new(-4.0, 2.0),
            Point::new(30.0, 18.0),
            Point::new(12.0, -3.0),
            Point::new(46.0, 6.0),
            Point::new(34.0, -6.0),
        ] {
            assert!(viewport.contains(point), "{point:?} outside viewport");
        }
    }

    #[test]
    fn degenerate_bounds_keep_zero_margin() {
        let payload = payload(r#"{"drawings": {"silkscreen": {"F": [{"ref": "U1", "pos": [3, 3]}]}}}"#);
        let viewport = fit_viewport(&collect_bounds(&payload));
        assert_eq!(viewport.width, 0.0);
        assert_eq!(viewport.height, 0.0);
        assert_eq!(viewport.min_x, 3.0);
    }
}
