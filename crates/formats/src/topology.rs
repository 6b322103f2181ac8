//! TopoJSON topology decoding.
//!
//! A topology stores shared boundaries once, as arcs; polygons reference arcs
//! by index (a negative index `~i` means arc `i` reversed). Quantized
//! topologies carry a `transform` and delta-encoded integer arcs.

use std::collections::BTreeMap;

use foundation::math::LonLat;
use serde_json::{Map, Value};

use crate::geometry::{Feature, FeatureCollection, Geometry, Ring, id_from_value};

/// Object name decoded when the host does not name one.
pub const DEFAULT_OBJECT_NAME: &str = "countries";

#[derive(Debug, Copy, Clone, PartialEq)]
struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone)]
pub struct Topology {
    arcs: Vec<Vec<LonLat>>,
    objects: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopologyError {
    Json(String),
    NotATopology,
    InvalidTransform,
    InvalidArc { index: usize, reason: String },
    MissingObject { name: String, available: Vec<String> },
    AmbiguousObject { available: Vec<String> },
    ArcIndexOutOfRange { index: i64, arc_count: usize },
    UnsupportedGeometry { kind: String },
    InvalidGeometry { reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Json(msg) => write!(f, "topology JSON parse error: {msg}"),
            TopologyError::NotATopology => write!(f, "expected a TopoJSON Topology"),
            TopologyError::InvalidTransform => write!(f, "topology transform is malformed"),
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopologyError::MissingObject { name, available } => {
                write!(
                    f,
                    "topology has no object named {name:?} (available: {})",
                    available.join(", ")
                )
            }
            TopologyError::AmbiguousObject { available } => {
                write!(
                    f,
                    "topology object must be named explicitly (available: {})",
                    available.join(", ")
                )
            }
            TopologyError::ArcIndexOutOfRange { index, arc_count } => {
                write!(f, "arc index {index} out of range ({arc_count} arcs)")
            }
            TopologyError::UnsupportedGeometry { kind } => {
                write!(f, "unsupported topology geometry type: {kind}")
            }
            TopologyError::InvalidGeometry { reason } => {
                write!(f, "invalid topology geometry: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| TopologyError::Json(e.to_string()))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, TopologyError> {
        let obj = value.as_object().ok_or(TopologyError::NotATopology)?;
        if obj.get("type").and_then(|v| v.as_str()) != Some("Topology") {
            return Err(TopologyError::NotATopology);
        }

        let transform = match obj.get("transform") {
            None | Some(Value::Null) => None,
            Some(t) => Some(parse_transform(t)?),
        };

        let raw_arcs = obj
            .get("arcs")
            .and_then(|v| v.as_array())
            .ok_or(TopologyError::NotATopology)?;
        let mut arcs = Vec::with_capacity(raw_arcs.len());
        for (index, arc) in raw_arcs.iter().enumerate() {
            arcs.push(
                decode_arc(arc, transform)
                    .map_err(|reason| TopologyError::InvalidArc { index, reason })?,
            );
        }

        let objects = obj
            .get("objects")
            .and_then(|v| v.as_object())
            .ok_or(TopologyError::NotATopology)?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            arcs,
            objects,
        })
    }

    pub fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    /// Pick the object to decode: the requested one, else `countries`, else the only object.
    pub fn resolve_object_name(&self, requested: Option<&str>) -> Result<String, TopologyError> {
        if let Some(name) = requested {
            return Ok(name.to_string());
        }
        if self.objects.contains_key(DEFAULT_OBJECT_NAME) {
            return Ok(DEFAULT_OBJECT_NAME.to_string());
        }
        if self.objects.len() == 1 {
            if let Some(name) = self.objects.keys().next() {
                return Ok(name.clone());
            }
        }
        Err(TopologyError::AmbiguousObject {
            available: self.object_names(),
        })
    }

    /// Convert one named object into a feature collection.
    pub fn feature_collection(&self, name: &str) -> Result<FeatureCollection, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject {
                name: name.to_string(),
                available: self.object_names(),
            })?;

        let is_collection =
            object.get("type").and_then(|v| v.as_str()) == Some("GeometryCollection");
        if !is_collection {
            return Ok(FeatureCollection::new(vec![self.feature(object)?]));
        }

        let members = object
            .get("geometries")
            .and_then(|v| v.as_array())
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: "GeometryCollection missing geometries".to_string(),
            })?;
        let mut features = Vec::with_capacity(members.len());
        for member in members {
            features.push(self.feature(member)?);
        }
        Ok(FeatureCollection::new(features))
    }

    fn feature(&self, object: &Value) -> Result<Feature, TopologyError> {
        let obj = object
            .as_object()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                reason: "geometry must be an object".to_string(),
            })?;

        let properties = obj
            .get("properties")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_else(Map::new);

        let geometry = match obj.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(kind)) => Some(self.geometry(kind, obj.get("arcs"))?),
            Some(other) => {
                return Err(TopologyError::InvalidGeometry {
                    reason: format!("geometry type must be a string, got {other}"),
                });
            }
        };

        Ok(Feature {
            id: obj.get("id").and_then(id_from_value),
            properties,
            geometry,
        })
    }

    fn geometry(&self, kind: &str, arcs: Option<&Value>) -> Result<Geometry, TopologyError> {
        let arcs = || {
            arcs.ok_or_else(|| TopologyError::InvalidGeometry {
                reason: format!("{kind} missing arcs"),
            })
        };
        match kind {
            "Polygon" => Ok(Geometry::Polygon(self.polygon(arcs()?)?)),
            "MultiPolygon" => {
                let polys = as_array(arcs()?, "MultiPolygon arcs")?;
                let mut out = Vec::with_capacity(polys.len());
                for poly in polys {
                    out.push(self.polygon(poly)?);
                }
                Ok(Geometry::MultiPolygon(out))
            }
            other => Err(TopologyError::UnsupportedGeometry {
                kind: other.to_string(),
            }),
        }
    }

    fn polygon(&self, rings: &Value) -> Result<Vec<Ring>, TopologyError> {
        let rings = as_array(rings, "Polygon arcs")?;
        let mut out = Vec::with_capacity(rings.len());
        for ring in rings {
            let indices = as_array(ring, "ring arcs")?
                .iter()
                .map(|v| {
                    v.as_i64().ok_or_else(|| TopologyError::InvalidGeometry {
                        reason: format!("arc index must be an integer, got {v}"),
                    })
                })
                .collect::<Result<Vec<i64>, _>>()?;
            out.push(self.ring(&indices)?);
        }
        Ok(out)
    }

    /// Stitch arcs into one ring; consecutive arcs share an endpoint that is kept once.
    fn ring(&self, indices: &[i64]) -> Result<Ring, TopologyError> {
        let mut points: Ring = Vec::new();
        for &index in indices {
            let (arc_index, reversed) = if index < 0 {
                (!index, true)
            } else {
                (index, false)
            };
            let arc = usize::try_from(arc_index)
                .ok()
                .and_then(|i| self.arcs.get(i))
                .ok_or(TopologyError::ArcIndexOutOfRange {
                    index,
                    arc_count: self.arcs.len(),
                })?;

            points.pop();
            if reversed {
                points.extend(arc.iter().rev().copied());
            } else {
                points.extend(arc.iter().copied());
            }
        }

        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, TopologyError> {
    value
        .as_array()
        .ok_or_else(|| TopologyError::InvalidGeometry {
            reason: format!("{what} must be an array"),
        })
}

fn parse_transform(value: &Value) -> Result<QuantizeTransform, TopologyError> {
    let pair = |key: &str| -> Result<[f64; 2], TopologyError> {
        let arr = value
            .get(key)
            .and_then(|v| v.as_array())
            .ok_or(TopologyError::InvalidTransform)?;
        match (
            arr.first().and_then(|v| v.as_f64()),
            arr.get(1).and_then(|v| v.as_f64()),
        ) {
            (Some(a), Some(b)) => Ok([a, b]),
            _ => Err(TopologyError::InvalidTransform),
        }
    };
    Ok(QuantizeTransform {
        scale: pair("scale")?,
        translate: pair("translate")?,
    })
}

fn decode_arc(arc: &Value, transform: Option<QuantizeTransform>) -> Result<Vec<LonLat>, String> {
    let positions = arc.as_array().ok_or("arc must be an array".to_string())?;
    let mut out = Vec::with_capacity(positions.len());
    let mut x = 0.0;
    let mut y = 0.0;
    for position in positions {
        let p = crate::geometry::parse_position(position)?;
        match transform {
            Some(t) => {
                x += p.lon_deg;
                y += p.lat_deg;
                out.push(LonLat::new(
                    x * t.scale[0] + t.translate[0],
                    y * t.scale[1] + t.translate[1],
                ));
            }
            None => out.push(p),
        }
    }
    Ok(out)
}
