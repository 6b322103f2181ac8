use super::Vec3;

/// Geographic coordinates in degrees on the unit sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Cartesian unit vector: x towards (0°, 0°), y towards (90°E, 0°), z towards the north pole.
    pub fn to_unit(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn from_unit(u: Vec3) -> Self {
        let lon = u.y.atan2(u.x).to_degrees();
        let lat = u.z.clamp(-1.0, 1.0).asin().to_degrees();
        Self::new(lon, lat)
    }
}

/// Sign-preserving remainder by a full turn, as used for rotation angles.
/// 450 maps to 90 and -450 maps to -90.
pub fn fmod_turn_deg(angle: f64) -> f64 {
    angle % 360.0
}
