use serde_json::Value;

use crate::geometry::{FeatureCollection, GeometryError};
use crate::topology::{Topology, TopologyError};

#[derive(Debug)]
pub enum DocumentError {
    Json(String),
    UnknownDocument(Option<String>),
    Topology(TopologyError),
    GeoJson(GeometryError),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Json(msg) => write!(f, "geometry JSON parse error: {msg}"),
            DocumentError::UnknownDocument(Some(ty)) => {
                write!(f, "unsupported geometry document type: {ty}")
            }
            DocumentError::UnknownDocument(None) => write!(f, "geometry document has no type"),
            DocumentError::Topology(e) => write!(f, "{e}"),
            DocumentError::GeoJson(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Decode a geometry document into features.
///
/// TopoJSON topologies are converted through `object` (see
/// [`Topology::resolve_object_name`]); GeoJSON feature collections are taken
/// as-is and `object` is ignored.
pub fn load_feature_collection(
    payload: &str,
    object: Option<&str>,
) -> Result<FeatureCollection, DocumentError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DocumentError::Json(e.to_string()))?;
    let ty = value.get("type").and_then(|v| v.as_str());
    match ty {
        Some("Topology") => {
            let topology = Topology::from_json_value(&value).map_err(DocumentError::Topology)?;
            let name = topology
                .resolve_object_name(object)
                .map_err(DocumentError::Topology)?;
            topology
                .feature_collection(&name)
                .map_err(DocumentError::Topology)
        }
        Some("FeatureCollection") => {
            FeatureCollection::from_geojson_value(&value).map_err(DocumentError::GeoJson)
        }
        other => Err(DocumentError::UnknownDocument(other.map(str::to_string))),
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentError, load_feature_collection};

    #[test]
    fn sniffs_topology_and_geojson() {
        let topo = r#"{"type":"Topology","arcs":[[[0,0],[0,1],[1,1],[0,0]]],
            "objects":{"land":{"type":"GeometryCollection","geometries":[
                {"type":"Polygon","id":"X","arcs":[[0]]}]}}}"#;
        let fc = load_feature_collection(topo, None).expect("topology");
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.features[0].id.as_deref(), Some("X"));

        let geojson = r#"{"type":"FeatureCollection","features":[]}"#;
        let fc = load_feature_collection(geojson, Some("ignored")).expect("geojson");
        assert!(fc.is_empty());
    }

    #[test]
    fn rejects_unknown_documents() {
        let err = load_feature_collection(r#"{"type":"Feature"}"#, None).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownDocument(Some(_))));
        let err = load_feature_collection("not json", None).unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }
}
