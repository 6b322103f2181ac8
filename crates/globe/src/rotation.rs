use foundation::math::SphereRotation;

/// Current view orientation in degrees: `(longitude, latitude, roll)`.
///
/// Roll is carried but never changed by interaction.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RotationState {
    pub longitude: f64,
    pub latitude: f64,
    pub roll: f64,
}

impl RotationState {
    pub fn new(longitude: f64, latitude: f64, roll: f64) -> Self {
        Self {
            longitude,
            latitude,
            roll,
        }
    }

    pub fn from_array(r: [f64; 3]) -> Self {
        Self::new(r[0], r[1], r[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.longitude, self.latitude, self.roll]
    }

    pub fn to_sphere_rotation(self) -> SphereRotation {
        SphereRotation::new(self.longitude, self.latitude, self.roll)
    }
}
