//! Keyed path elements: one persistent element per feature.

use std::collections::{BTreeMap, BTreeSet};

use formats::FeatureCollection;
use tracing::debug;

use crate::path::GeoPath;
use crate::symbology::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    Unavailable(String),
    UnknownHandle(String),
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceError::Unavailable(msg) => write!(f, "render surface unavailable: {msg}"),
            SurfaceError::UnknownHandle(key) => write!(f, "no path element for {key:?}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Something that can hold filled path elements: an SVG DOM, an in-memory
/// document, a test double.
pub trait PathSurface {
    type Handle;

    fn create_path(&mut self, key: &str, d: &str, fill: &str) -> Result<Self::Handle, SurfaceError>;
    fn update_path(&mut self, handle: &Self::Handle, d: &str) -> Result<(), SurfaceError>;
    fn remove_path(&mut self, handle: Self::Handle) -> Result<(), SurfaceError>;
    fn set_size(&mut self, width: f64, height: f64);
    /// Remove every element and any error message.
    fn clear(&mut self);
    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl RenderStats {
    pub fn paths(&self) -> usize {
        self.created + self.updated
    }
}

/// Element key for every feature, in order.
///
/// The feature id when present and unique, `#<index>` without an id, and
/// `<id>#<index>` for later repeats of an id.
pub fn feature_keys(features: &FeatureCollection) -> Vec<String> {
    let mut seen = BTreeSet::new();
    features
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| match &feature.id {
            None => format!("#{index}"),
            Some(id) if seen.insert(id.as_str()) => id.clone(),
            Some(id) => format!("{id}#{index}"),
        })
        .collect()
}

/// Owns the `key -> handle` map and upserts elements on every pass.
#[derive(Debug)]
pub struct PathRenderer<H> {
    elements: BTreeMap<String, H>,
}

impl<H> Default for PathRenderer<H> {
    fn default() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }
}

impl<H> PathRenderer<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn handle(&self, key: &str) -> Option<&H> {
        self.elements.get(key)
    }

    /// Draw `features` under `path`.
    ///
    /// New features get an element filled with `fill(id)`; features that
    /// already have one only get their path data replaced. Elements whose
    /// key is no longer present are removed.
    pub fn render<S, F>(
        &mut self,
        surface: &mut S,
        features: &FeatureCollection,
        path: &GeoPath,
        fill: F,
    ) -> Result<RenderStats, SurfaceError>
    where
        S: PathSurface<Handle = H>,
        F: Fn(Option<&str>) -> Color,
    {
        let keys = feature_keys(features);
        let mut stats = RenderStats::default();

        for (feature, key) in features.features.iter().zip(&keys) {
            let d = path.path_data(feature.geometry.as_ref());
            match self.elements.get(key) {
                Some(handle) => {
                    surface.update_path(handle, &d)?;
                    stats.updated += 1;
                }
                None => {
                    let color = fill(feature.id.as_deref()).to_css();
                    let handle = surface.create_path(key, &d, &color)?;
                    self.elements.insert(key.clone(), handle);
                    stats.created += 1;
                }
            }
        }

        let live: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
        let stale: Vec<String> = self
            .elements
            .keys()
            .filter(|k| !live.contains(k.as_str()))
            .cloned()
            .collect();
        for key in stale {
            if let Some(handle) = self.elements.remove(&key) {
                surface.remove_path(handle)?;
                stats.removed += 1;
            }
        }

        debug!(
            created = stats.created,
            updated = stats.updated,
            removed = stats.removed,
            "choropleth pass"
        );
        Ok(stats)
    }

    /// Forget every element and clear the surface.
    pub fn clear<S: PathSurface<Handle = H>>(&mut self, surface: &mut S) {
        self.elements.clear();
        surface.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{PathRenderer, feature_keys};
    use crate::path::GeoPath;
    use crate::svg::SvgDocument;
    use crate::symbology::Color;
    use formats::{Feature, FeatureCollection, Geometry};
    use foundation::math::{LonLat, Orthographic, SphereRotation, Vec2};
    use pretty_assertions::assert_eq;

    fn square(lon: f64, lat: f64) -> Option<Geometry> {
        Some(Geometry::Polygon(vec![vec![
            LonLat::new(lon, lat),
            LonLat::new(lon, lat + 5.0),
            LonLat::new(lon + 5.0, lat + 5.0),
            LonLat::new(lon + 5.0, lat),
            LonLat::new(lon, lat),
        ]]))
    }

    fn collection() -> FeatureCollection {
        FeatureCollection::new(vec![
            Feature::new(Some("A".into()), square(0.0, 0.0)),
            Feature::new(Some("B".into()), square(20.0, 0.0)),
            Feature::new(None, square(40.0, 0.0)),
        ])
    }

    fn path(lambda: f64) -> GeoPath {
        GeoPath::new(
            Orthographic::new(100.0, Vec2::new(100.0, 100.0), SphereRotation::new(lambda, 0.0, 0.0)),
            2,
        )
    }

    fn fill(id: Option<&str>) -> Color {
        match id {
            Some("A") => Color::rgb(0.0, 0.0, 0.0),
            _ => Color::rgb(255.0, 255.0, 255.0),
        }
    }

    #[test]
    fn keys_are_unique_per_feature() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Some("A".into()), None),
            Feature::new(None, None),
            Feature::new(Some("A".into()), None),
        ]);
        assert_eq!(feature_keys(&fc), vec!["A", "#1", "A#2"]);
    }

    #[test]
    fn rotation_updates_paths_without_touching_elements() {
        let mut doc = SvgDocument::new(200.0, 200.0);
        let mut renderer = PathRenderer::new();
        let fc = collection();

        let first = renderer.render(&mut doc, &fc, &path(0.0), fill).expect("first");
        assert_eq!(first.created, 3);
        let handle_a = *renderer.handle("A").expect("A");
        let d_before = doc.element("A").expect("A").d.clone();

        let second = renderer.render(&mut doc, &fc, &path(30.0), fill).expect("second");
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 3);
        assert_eq!(doc.len(), 3);
        assert_eq!(*renderer.handle("A").expect("A"), handle_a);
        assert_ne!(doc.element("A").expect("A").d, d_before);
        assert_eq!(doc.element("A").expect("A").fill, "#000000");
        assert_eq!(doc.element("B").expect("B").fill, "#ffffff");
    }

    #[test]
    fn dropped_features_lose_their_elements() {
        let mut doc = SvgDocument::new(200.0, 200.0);
        let mut renderer = PathRenderer::new();
        renderer.render(&mut doc, &collection(), &path(0.0), fill).expect("first");

        let fewer = FeatureCollection::new(vec![Feature::new(Some("B".into()), square(20.0, 0.0))]);
        let stats = renderer.render(&mut doc, &fewer, &path(0.0), fill).expect("second");
        assert_eq!(stats.removed, 2);
        assert_eq!(doc.len(), 1);
        assert!(doc.element("A").is_none());

        renderer.clear(&mut doc);
        assert!(renderer.is_empty());
        assert_eq!(doc.len(), 0);
    }
}
