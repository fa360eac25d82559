use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A finite 2D point in board units (millimeters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reads a `[x, y]` JSON array. Anything else (missing elements,
    /// non-numeric entries) is treated as absent, not as an error.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        let pair = value.as_array()?;
        let x = pair.first()?.as_f64()?;
        let y = pair.get(1)?.as_f64()?;
        if x.is_finite() && y.is_finite() {
            Some(Self { x, y })
        } else {
            None
        }
    }
}

/// One silkscreen or fabrication drawing record. Every geometric field is
/// optional; which subset is present decides how the record is drawn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphicRecord {
    #[serde(default, deserialize_with = "text_opt")]
    pub svgpath: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "text_opt")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "point_opt")]
    pub start: Option<Point>,
    #[serde(default, deserialize_with = "point_opt")]
    pub end: Option<Point>,
    #[serde(default, deserialize_with = "point_opt")]
    pub center: Option<Point>,
    #[serde(default, deserialize_with = "point_opt")]
    pub pos: Option<Point>,
    #[serde(default, deserialize_with = "num_opt")]
    pub radius: Option<f64>,
    #[serde(default, deserialize_with = "polygons_opt")]
    pub polygons: Vec<Vec<Point>>,
    #[serde(rename = "ref", default, deserialize_with = "text_opt")]
    pub reference: Option<String>,
    #[serde(rename = "val", default, deserialize_with = "text_opt")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "num_opt")]
    pub thickness: Option<f64>,
    #[serde(default, deserialize_with = "num_opt")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FootprintRecord {
    #[serde(default, deserialize_with = "nested_opt")]
    pub bbox: Option<Bbox>,
    #[serde(default, deserialize_with = "records")]
    pub pads: Vec<Pad>,
}

impl FootprintRecord {
    /// Anchor of the footprint, required before any of its pads are drawn.
    pub fn anchor(&self) -> Option<Point> {
        self.bbox.as_ref().and_then(|bbox| bbox.pos)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bbox {
    #[serde(default, deserialize_with = "point_opt")]
    pub pos: Option<Point>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pad {
    #[serde(rename = "type", default, deserialize_with = "text_opt")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "point_opt")]
    pub pos: Option<Point>,
    /// Pad extents as `[width, height]`.
    #[serde(default, deserialize_with = "point_opt")]
    pub size: Option<Point>,
}

impl Pad {
    pub fn is_through_hole(&self) -> bool {
        self.kind.as_deref() == Some("th")
    }
}

/// One board-outline record, either a straight segment or a circular arc.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeRecord {
    #[serde(rename = "type", default, deserialize_with = "text_opt")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "point_opt")]
    pub start: Option<Point>,
    #[serde(default, deserialize_with = "point_opt")]
    pub end: Option<Point>,
    #[serde(default, deserialize_with = "num_opt")]
    pub radius: Option<f64>,
    #[serde(rename = "startangle", default, deserialize_with = "num_opt")]
    pub start_angle: Option<f64>,
    #[serde(rename = "endangle", default, deserialize_with = "num_opt")]
    pub end_angle: Option<f64>,
    #[serde(default, deserialize_with = "num_opt")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerStack {
    #[serde(rename = "F", default, deserialize_with = "records")]
    pub front: Vec<GraphicRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Drawings {
    #[serde(default, deserialize_with = "lenient")]
    pub fabrication: LayerStack,
    #[serde(default, deserialize_with = "lenient")]
    pub silkscreen: LayerStack,
}

pub const STATUS_OK: &str = "ok";

/// The upload-endpoint response. A bare `pcbdata` document parses too: the
/// missing `status` defaults to `"ok"` and absent collections to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct Payload {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, deserialize_with = "text_opt")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub drawings: Drawings,
    #[serde(default, deserialize_with = "records")]
    pub footprints: Vec<FootprintRecord>,
    #[serde(default, deserialize_with = "records")]
    pub edges: Vec<EdgeRecord>,
}

impl Default for Payload {
    fn default() -> Self {
        Self {
            status: default_status(),
            message: None,
            drawings: Drawings::default(),
            footprints: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl Payload {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn fabrication(&self) -> &[GraphicRecord] {
        &self.drawings.fabrication.front
    }

    pub fn silkscreen(&self) -> &[GraphicRecord] {
        &self.drawings.silkscreen.front
    }
}

fn default_status() -> String {
    STATUS_OK.to_string()
}

fn point_opt<'de, D>(de: D) -> Result<Option<Point>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Point::from_value(&Value::deserialize(de)?))
}

fn num_opt<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(de)?.as_f64().filter(|n| n.is_finite()))
}

fn text_opt<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Polygon lists keep their order; vertices that are not `[x, y]` pairs are
/// dropped from the containing polygon.
fn polygons_opt<'de, D>(de: D) -> Result<Vec<Vec<Point>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(polygons) = Value::deserialize(de)? else {
        return Ok(Vec::new());
    };
    Ok(polygons
        .iter()
        .map(|polygon| match polygon {
            Value::Array(vertices) => vertices.iter().filter_map(Point::from_value).collect(),
            _ => Vec::new(),
        })
        .collect())
}

/// A collection field: anything that is not an array becomes empty, and an
/// element that fails to parse is skipped without dropping its siblings.
fn records<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(de)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A nested object field: malformed input reads as the type's default.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn nested_opt<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(serde_json::from_value(value).ok())
}
