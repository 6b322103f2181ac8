use foundation::math::LonLat;
use serde_json::{Map, Value};

/// A closed ring of positions; the first position is repeated at the end.
pub type Ring = Vec<LonLat>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// All polygons of the geometry, each as a list of rings (outer ring first).
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon(rings) => vec![rings.as_slice()],
            Geometry::MultiPolygon(polys) => polys.iter().map(|p| p.as_slice()).collect(),
        }
    }

    pub fn position_count(&self) -> usize {
        self.polygons()
            .iter()
            .flat_map(|rings| rings.iter())
            .map(|ring| ring.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// `None` for features whose geometry is null.
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(id: Option<String>, geometry: Option<Geometry>) -> Self {
        Self {
            id,
            properties: Map::new(),
            geometry,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeometryError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeometryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, GeometryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeometryError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, GeometryError> {
        let obj = value
            .as_object()
            .ok_or(GeometryError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeometryError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeometryError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeometryError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(GeometryError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str());
            if feat_type != Some("Feature") {
                return Err(GeometryError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type:?}"),
                });
            }

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(g) => Some(
                    parse_geometry(g)
                        .map_err(|reason| GeometryError::InvalidFeature { index, reason })?,
                ),
            };

            features.push(Feature {
                id: feat_obj.get("id").and_then(id_from_value),
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }
}

/// Feature ids may be strings or numbers; numbers are kept as their decimal text.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

pub(crate) fn parse_position(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_position(item)?);
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Ring>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Ring>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}
