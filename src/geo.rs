//! Great-circle distance between geographic coordinates.

/// Mean Earth radius in metres, as used throughout the catalogue.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const EPSILON: f64 = 1e-6;

/// A point on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Spherical distance between `a` and `b`, in metres, on a sphere of
/// radius [`EARTH_RADIUS_M`].
///
/// Returns exactly `0.0` for bit-equal coordinates without calling `acos`,
/// which can return `NaN` for arguments that land a hair past `1.0` due to
/// floating-point error.
pub fn great_circle(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (a.lng - b.lng).abs().to_radians();
    (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlng.cos()).acos() * EARTH_RADIUS_M
}

/// Used only by projection/rendering consumers outside this crate; the
/// router itself compares weights exactly.
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
