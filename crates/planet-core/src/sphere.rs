//! Vector math and the cube-to-sphere projection.
//! All operations use f64 precision.
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point or direction in planet-local Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit direction for a geographic position, z pointing at the north pole.
    pub fn from_latlon(lat_deg: f64, lon_deg: f64) -> Self {
        let lat = lat_deg.to_radians();
        let lon = lon_deg.to_radians();
        Self {
            x: lat.cos() * lon.cos(),
            y: lat.cos() * lon.sin(),
            z: lat.sin(),
        }
    }

    pub fn to_latlon(self) -> (f64, f64) {
        let n = self.normalize();
        let lat = n.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = n.y.atan2(n.x).to_degrees();
        (lat, lon)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let len = self.length();
        Self { x: self.x / len, y: self.y / len, z: self.z / len }
    }

    /// `self + (other - self) * t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Project a point on the [-1, 1] cube surface onto the unit sphere.
///
/// The per-axis correction spreads area more evenly than plain normalization,
/// so cells near cube edges and corners are not squeezed.
pub fn cube_to_sphere(v: Vec3) -> Vec3 {
    let (x2, y2, z2) = (v.x * v.x, v.y * v.y, v.z * v.z);
    Vec3 {
        x: v.x * (1.0 - y2 * 0.5 - z2 * 0.5 + y2 * z2 / 3.0).sqrt(),
        y: v.y * (1.0 - z2 * 0.5 - x2 * 0.5 + z2 * x2 / 3.0).sqrt(),
        z: v.z * (1.0 - x2 * 0.5 - y2 * 0.5 + x2 * y2 / 3.0).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn latlon_roundtrip() {
        let pairs = [(0.0, 0.0), (45.0, 90.0), (-60.0, -120.0), (89.0, 179.0)];
        for (lat, lon) in pairs {
            let v = Vec3::from_latlon(lat, lon);
            let (lat2, lon2) = v.to_latlon();
            assert!((lat - lat2).abs() < 1e-9, "lat mismatch: {lat} vs {lat2}");
            assert!((lon - lon2).abs() < 1e-9, "lon mismatch: {lon} vs {lon2}");
        }
    }

    #[test]
    fn axis_points_are_fixed() {
        for axis in [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ] {
            assert_eq!(cube_to_sphere(axis), axis);
        }
    }

    #[test]
    fn cube_surface_lands_on_unit_sphere() {
        let points = [
            Vec3::new(1.0, 0.5, 0.5),
            Vec3::new(-1.0, 0.3, -0.7),
            Vec3::new(0.5, 1.0, -0.2),
            Vec3::new(0.8, 0.8, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        for p in points {
            assert_abs_diff_eq!(cube_to_sphere(p).length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn corners_spread_less_than_normalization() {
        // Plain normalization pulls a face's edge midpoint toward the corner
        // direction more than the analytic mapping does.
        let edge = Vec3::new(1.0, 1.0, 0.0);
        let mapped = cube_to_sphere(edge);
        let naive = edge.normalize();
        assert_abs_diff_eq!(mapped.x, naive.x, epsilon = 1e-12);
        let near_corner = Vec3::new(1.0, 0.9, 0.9);
        let a = cube_to_sphere(near_corner);
        let b = near_corner.normalize();
        assert!(a.x > b.x, "analytic map should keep more weight on the face axis");
    }

    #[test]
    fn lerp_endpoints() {
        let a = Vec3::new(-1.0, 1.0, 1.0);
        let b = Vec3::new(1.0, -1.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec3::new(0.0, 0.0, 1.0));
    }
}
