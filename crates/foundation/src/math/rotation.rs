use super::Vec3;

/// Three-axis sphere rotation in degrees.
///
/// Applied in order: `lambda` about the polar axis, then `phi` about the
/// y axis, then `gamma` about the x axis. A rotation of `(90, 0, 0)` brings
/// longitude -90° to the center of an orthographic view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereRotation {
    pub lambda_deg: f64,
    pub phi_deg: f64,
    pub gamma_deg: f64,
}

impl Default for SphereRotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl SphereRotation {
    pub fn new(lambda_deg: f64, phi_deg: f64, gamma_deg: f64) -> Self {
        Self {
            lambda_deg,
            phi_deg,
            gamma_deg,
        }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn rotate_unit(&self, v: Vec3) -> Vec3 {
        let (sin_l, cos_l) = self.lambda_deg.to_radians().sin_cos();
        let (sin_p, cos_p) = self.phi_deg.to_radians().sin_cos();
        let (sin_g, cos_g) = self.gamma_deg.to_radians().sin_cos();

        // About z.
        let x0 = v.x * cos_l - v.y * sin_l;
        let y0 = v.x * sin_l + v.y * cos_l;
        let z0 = v.z;

        // About y.
        let x1 = x0 * cos_p - z0 * sin_p;
        let z1 = z0 * cos_p + x0 * sin_p;

        // About x.
        let y2 = y0 * cos_g - z1 * sin_g;
        let z2 = z1 * cos_g + y0 * sin_g;

        Vec3::new(x1, y2, z2)
    }
}
