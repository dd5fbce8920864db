use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::Point;

/// Which field of the drawing library's record carried the points.
///
/// Resolved once when a record is decoded so the rest of the engine only sees
/// `&[Point]`, and used again when the record is written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathShape {
    /// `{ "paths": [..] }`
    Paths,
    /// `{ "points": [..] }`
    Points,
    /// `{ "stroke": { "points": [..] } }`
    StrokePoints,
    /// `{ "path": [..] }`
    Path,
    /// No recognizable point field.
    Missing,
}

impl PathShape {
    fn resolve(fields: &Map<String, Value>) -> Self {
        if matches!(fields.get("paths"), Some(Value::Array(_))) {
            return PathShape::Paths;
        }
        if matches!(fields.get("points"), Some(Value::Array(_))) {
            return PathShape::Points;
        }
        if let Some(Value::Object(stroke)) = fields.get("stroke") {
            if matches!(stroke.get("points"), Some(Value::Array(_))) {
                return PathShape::StrokePoints;
            }
        }
        if matches!(fields.get("path"), Some(Value::Array(_))) {
            return PathShape::Path;
        }
        PathShape::Missing
    }
}

/// One stroke as exported by the drawing surface.
///
/// Attributes other than the point list are kept untouched so that a record
/// written back through `loadPaths` carries everything the surface gave us.
/// Per-point keys besides `x`/`y` (pressure, timestamps) ride along with their
/// point through moves, scales and rotations; a record re-cut by the area
/// eraser only carries coordinates. Points that failed to parse are not
/// written back.
#[derive(Clone, Debug, PartialEq)]
pub struct PathRecord {
    shape: PathShape,
    points: Vec<Point>,
    /// Extra keys of each point, index-aligned with `points`. `None` when no
    /// point had any.
    point_extras: Option<Vec<Map<String, Value>>>,
    attrs: Map<String, Value>,
}

impl PathRecord {
    pub fn new(shape: PathShape, points: Vec<Point>) -> Self {
        let shape = if shape == PathShape::Missing && !points.is_empty() {
            PathShape::Paths
        } else {
            shape
        };
        Self {
            shape,
            points,
            point_extras: None,
            attrs: Map::new(),
        }
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self::new(PathShape::Paths, points)
    }

    /// Decodes any JSON value. Never fails: unknown layouts become an empty
    /// `Missing` record and malformed points are dropped.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut attrs) = value else {
            return Self::new(PathShape::Missing, Vec::new());
        };
        let shape = PathShape::resolve(&attrs);
        let raw = match shape {
            PathShape::Paths => attrs.remove("paths"),
            PathShape::Points => attrs.remove("points"),
            PathShape::Path => attrs.remove("path"),
            PathShape::StrokePoints => attrs
                .get_mut("stroke")
                .and_then(Value::as_object_mut)
                .and_then(|stroke| stroke.remove("points")),
            PathShape::Missing => None,
        };
        let (points, extras): (Vec<Point>, Vec<Map<String, Value>>) = match raw {
            Some(Value::Array(items)) => items.into_iter().filter_map(parse_point).unzip(),
            _ => (Vec::new(), Vec::new()),
        };
        let point_extras = extras.iter().any(|extra| !extra.is_empty()).then_some(extras);
        Self {
            shape,
            points,
            point_extras,
            attrs,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut attrs = self.attrs.clone();
        let points = Value::Array(
            self.points
                .iter()
                .enumerate()
                .map(|(index, point)| {
                    let extra = self
                        .point_extras
                        .as_ref()
                        .and_then(|extras| extras.get(index));
                    point_value(point, extra)
                })
                .collect(),
        );
        match self.shape {
            PathShape::Paths => {
                attrs.insert("paths".to_string(), points);
            }
            PathShape::Points => {
                attrs.insert("points".to_string(), points);
            }
            PathShape::Path => {
                attrs.insert("path".to_string(), points);
            }
            PathShape::StrokePoints => match attrs.get_mut("stroke") {
                Some(Value::Object(stroke)) => {
                    stroke.insert("points".to_string(), points);
                }
                _ => {
                    let mut stroke = Map::new();
                    stroke.insert("points".to_string(), points);
                    attrs.insert("stroke".to_string(), Value::Object(stroke));
                }
            },
            PathShape::Missing => {}
        }
        Value::Object(attrs)
    }

    pub fn shape(&self) -> PathShape {
        self.shape
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Same attributes and shape, different geometry. Per-point keys are not
    /// carried over since the new points need not match the old ones.
    pub fn with_points(&self, points: Vec<Point>) -> Self {
        let shape = if self.shape == PathShape::Missing {
            PathShape::Paths
        } else {
            self.shape
        };
        Self {
            shape,
            points,
            point_extras: None,
            attrs: self.attrs.clone(),
        }
    }

    /// Rewrites every point in place; per-point keys stay with their point.
    pub fn map_points<F>(&mut self, mut map: F)
    where
        F: FnMut(Point) -> Point,
    {
        for point in &mut self.points {
            *point = map(*point);
        }
    }

    fn set_attr(&mut self, key: &str, value: Value) {
        self.attrs.insert(key.to_string(), value);
    }

    pub fn stroke_color(&self) -> Option<&str> {
        self.attrs.get("strokeColor").and_then(Value::as_str)
    }

    pub fn set_stroke_color(&mut self, color: &str) {
        self.set_attr("strokeColor", Value::String(color.to_string()));
    }

    pub fn stroke_width(&self) -> Option<f64> {
        self.attrs.get("strokeWidth").and_then(Value::as_f64)
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.set_attr("strokeWidth", Value::from(width));
    }
}

/// A finite point and whatever else its object carried.
fn parse_point(value: Value) -> Option<(Point, Map<String, Value>)> {
    let Value::Object(mut fields) = value else {
        return None;
    };
    let x = fields.get("x")?.as_f64()?;
    let y = fields.get("y")?.as_f64()?;
    let point = Point::finite(x, y)?;
    fields.remove("x");
    fields.remove("y");
    Some((point, fields))
}

fn point_value(point: &Point, extra: Option<&Map<String, Value>>) -> Value {
    let mut map = extra.cloned().unwrap_or_default();
    map.insert("x".to_string(), Value::from(point.x));
    map.insert("y".to_string(), Value::from(point.y));
    Value::Object(map)
}

impl Serialize for PathRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PathRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(PathRecord::from_value(value))
    }
}

/// The wrapper shapes `exportPaths()` may resolve to.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum ExportedPaths {
    List(Vec<PathRecord>),
    Wrapped { paths: Vec<PathRecord> },
}

impl ExportedPaths {
    pub fn into_records(self) -> Vec<PathRecord> {
        match self {
            ExportedPaths::List(paths) => paths,
            ExportedPaths::Wrapped { paths } => paths,
        }
    }
}
