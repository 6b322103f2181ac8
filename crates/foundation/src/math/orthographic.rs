use super::{LonLat, SphereRotation, Vec2, Vec3};

/// Orthographic projection of the unit sphere onto the screen plane.
///
/// Screen coordinates have y pointing down. A point is on the facing
/// hemisphere when its rotated x component (depth towards the viewer) is
/// positive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    pub scale: f64,
    pub translate: Vec2,
    pub rotation: SphereRotation,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
            rotation: SphereRotation::identity(),
        }
    }
}

impl Orthographic {
    pub fn new(scale: f64, translate: Vec2, rotation: SphereRotation) -> Self {
        Self {
            scale,
            translate,
            rotation,
        }
    }

    pub fn with_rotation(self, rotation: SphereRotation) -> Self {
        Self { rotation, ..self }
    }

    /// Rotated unit vector of a geographic point (view space).
    pub fn to_view(&self, p: LonLat) -> Vec3 {
        self.rotation.rotate_unit(p.to_unit())
    }

    /// Screen position of a view-space point, regardless of visibility.
    pub fn view_to_screen(&self, v: Vec3) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * v.y,
            self.translate.y - self.scale * v.z,
        )
    }

    /// Project a point, or `None` when it lies on the far hemisphere.
    pub fn project(&self, p: LonLat) -> Option<Vec2> {
        let v = self.to_view(p);
        if v.x < 0.0 {
            return None;
        }
        Some(self.view_to_screen(v))
    }

    /// Screen position of the visible disc center.
    pub fn center(&self) -> Vec2 {
        self.translate
    }

    /// Screen radius of the visible disc.
    pub fn radius(&self) -> f64 {
        self.scale
    }
}
