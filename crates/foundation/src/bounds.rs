use crate::math::Vec2;

/// Axis-aligned bounding box in screen space.
///
/// An empty box has `min > max`; extending it with a point makes it
/// degenerate at that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn extend(&mut self, p: Vec2) {
        if !p.is_finite() {
            return;
        }
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.max[1] - self.min[1]
    }
}
