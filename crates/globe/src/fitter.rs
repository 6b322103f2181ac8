use formats::FeatureCollection;
use foundation::Aabb2;
use foundation::math::{Orthographic, SphereRotation, Vec2};
use layers::GeoPath;

/// Scale and translation of a fitted orthographic projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionFit {
    pub scale: f64,
    pub translate: Vec2,
}

impl ProjectionFit {
    /// Whole globe centered in the viewport; used when nothing is visible to fit.
    pub fn whole_globe(width: f64, height: f64, margin_ratio: f64) -> Self {
        Self {
            scale: margin_ratio * width.min(height) / 2.0,
            translate: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn projection(&self, rotation: SphereRotation) -> Orthographic {
        Orthographic::new(self.scale, self.translate, rotation)
    }
}

/// Fit unit-scale projected `bounds` into a `width` x `height` viewport.
///
/// `None` when the viewport or the bounds have no extent.
pub fn fit_bounds(bounds: &Aabb2, width: f64, height: f64, margin_ratio: f64) -> Option<ProjectionFit> {
    if bounds.is_empty() || !(width > 0.0 && height > 0.0) {
        return None;
    }
    let k = (bounds.width() / width).max(bounds.height() / height);
    if !(k > 0.0 && k.is_finite()) {
        return None;
    }
    let scale = margin_ratio / k;
    let translate = Vec2::new(
        (width - scale * (bounds.min[0] + bounds.max[0])) / 2.0,
        (height - scale * (bounds.min[1] + bounds.max[1])) / 2.0,
    );
    Some(ProjectionFit { scale, translate })
}

/// Fit the visible part of `features` under `rotation` into the viewport.
pub fn fit(
    features: &FeatureCollection,
    width: f64,
    height: f64,
    margin_ratio: f64,
    rotation: SphereRotation,
) -> Option<ProjectionFit> {
    let unit = GeoPath::new(Orthographic::new(1.0, Vec2::ZERO, rotation), 0);
    fit_bounds(&unit.bounds(features), width, height, margin_ratio)
}
