use std::fmt::Write;

use formats::{FeatureCollection, Geometry};
use foundation::Aabb2;
use foundation::math::{Orthographic, Vec2};

use crate::clip::clip_ring;

/// Path generator bound to a projection: geometry in, SVG path data out.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPath {
    projection: Orthographic,
    digits: usize,
}

impl GeoPath {
    pub fn new(projection: Orthographic, digits: usize) -> Self {
        Self { projection, digits }
    }

    pub fn projection(&self) -> &Orthographic {
        &self.projection
    }

    /// Clipped, projected rings of every polygon in `geometry`.
    pub fn rings(&self, geometry: &Geometry) -> Vec<Vec<Vec2>> {
        geometry
            .polygons()
            .into_iter()
            .flat_map(|rings| rings.iter())
            .filter_map(|ring| clip_ring(&self.projection, ring))
            .collect()
    }

    /// `M x,y L x,y ... Z` per visible ring; empty when nothing is visible.
    pub fn path_data(&self, geometry: Option<&Geometry>) -> String {
        let Some(geometry) = geometry else {
            return String::new();
        };
        let mut d = String::new();
        for ring in self.rings(geometry) {
            for (i, p) in ring.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(
                    d,
                    "{cmd}{},{}",
                    format_coord(p.x, self.digits),
                    format_coord(p.y, self.digits)
                );
            }
            d.push('Z');
        }
        d
    }

    /// Screen bounds of the visible parts of a feature collection.
    pub fn bounds(&self, features: &FeatureCollection) -> Aabb2 {
        let mut out = Aabb2::empty();
        for geometry in features.features.iter().filter_map(|f| f.geometry.as_ref()) {
            for ring in self.rings(geometry) {
                for p in ring {
                    out.extend(p);
                }
            }
        }
        out
    }
}

/// Fixed-point text with trailing zeros trimmed; `-0` prints as `0`.
pub fn format_coord(v: f64, digits: usize) -> String {
    let mut s = format!("{v:.digits$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}
