//! Cube faces and the patch quadtree laid over them.
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::sphere::Vec3;

/// Corners of the [-1, 1] cube. The first four bound the +z face.
pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeFace {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Front,
        CubeFace::Back,
    ];

    /// Corner quad of the face, wound the same way on every face.
    pub fn corners(self) -> [Vec3; 4] {
        let [a, b, c, d] = match self {
            CubeFace::Right => [3, 2, 5, 4],
            CubeFace::Left => [7, 6, 1, 0],
            CubeFace::Top => [7, 0, 3, 4],
            CubeFace::Bottom => [1, 6, 5, 2],
            CubeFace::Front => [0, 1, 2, 3],
            CubeFace::Back => [4, 5, 6, 7],
        };
        [CUBE_VERTICES[a], CUBE_VERTICES[b], CUBE_VERTICES[c], CUBE_VERTICES[d]]
    }

    pub fn name(self) -> &'static str {
        match self {
            CubeFace::Right => "right",
            CubeFace::Left => "left",
            CubeFace::Top => "top",
            CubeFace::Bottom => "bottom",
            CubeFace::Front => "front",
            CubeFace::Back => "back",
        }
    }
}

/// Surface arc covered by half a patch at `level` on a sphere of `radius`.
/// Root patches are level 1.
pub fn arc_length(radius: f64, level: u32) -> f64 {
    PI * radius / 2f64.powi(level as i32 + 1)
}

/// One node of the quadtree. Corners lie on the cube surface; everything else
/// is measured on the displaced sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub corners: [Vec3; 4],
    pub level: u32,
    /// Displaced surface point under the patch midpoint.
    pub center: Vec3,
    pub bound_radius: f64,
    /// Coarse detail estimate, `log2(2 * arc)` truncated toward zero.
    pub lod: i32,
}

impl Patch {
    pub(crate) fn new(corners: [Vec3; 4], level: u32, center: Vec3, radius: f64) -> Self {
        let arc = arc_length(radius, level);
        Self {
            corners,
            level,
            center,
            bound_radius: (2.0 * arc * arc).sqrt(),
            lod: (arc * 2.0).log2().trunc() as i32,
        }
    }

    /// Cube-surface point halfway across the patch diagonal.
    pub fn midpoint(&self) -> Vec3 {
        self.corners[0].lerp(self.corners[2], 0.5)
    }

    /// Corner quads of the four children. Each child keeps the parent's
    /// winding, and child `k` touches parent corner `k`'s side of the grid.
    pub fn child_corners(&self) -> [[Vec3; 4]; 4] {
        let [c0, c1, c2, c3] = self.corners;
        let v = [
            c0,
            c0.lerp(c3, 0.5),
            c3,
            c0.lerp(c1, 0.5),
            c0.lerp(c2, 0.5),
            c2.lerp(c3, 0.5),
            c1,
            c1.lerp(c2, 0.5),
            c2,
        ];
        [
            [v[0], v[3], v[4], v[1]],
            [v[3], v[6], v[7], v[4]],
            [v[4], v[7], v[8], v[5]],
            [v[1], v[4], v[5], v[2]],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn normal(q: &[Vec3; 4]) -> Vec3 {
        let (a, b) = (q[1] - q[0], q[3] - q[0]);
        Vec3::new(a.y * b.z - a.z * b.y, a.z * b.x - a.x * b.z, a.x * b.y - a.y * b.x)
    }

    #[test]
    fn faces_are_outward_consistent() {
        // Every face quad winds the same way relative to its outward axis.
        let signs: Vec<f64> = CubeFace::ALL
            .iter()
            .map(|f| {
                let c = f.corners();
                let center = c[0].lerp(c[2], 0.5);
                normal(&c).dot(center).signum()
            })
            .collect();
        assert!(signs.iter().all(|&s| s == signs[0] && s != 0.0), "{signs:?}");
    }

    #[test]
    fn faces_cover_the_cube() {
        let mut axes: Vec<[i32; 3]> = CubeFace::ALL
            .iter()
            .map(|f| {
                let c = f.corners();
                let m = c[0].lerp(c[2], 0.5);
                [m.x as i32, m.y as i32, m.z as i32]
            })
            .collect();
        axes.sort();
        axes.dedup();
        assert_eq!(axes.len(), 6);
        assert_eq!(CubeFace::Front.corners()[0], CUBE_VERTICES[0]);
        assert_eq!(CubeFace::Right.corners()[0], CUBE_VERTICES[3]);
    }

    #[test]
    fn children_tile_the_parent() {
        let p = Patch::new(CubeFace::Front.corners(), 1, Vec3::ZERO, 1.0);
        let kids = p.child_corners();
        assert_eq!(kids[0][0], p.corners[0]);
        assert_eq!(kids[1][1], p.corners[1]);
        assert_eq!(kids[2][2], p.corners[2]);
        assert_eq!(kids[3][3], p.corners[3]);
        // All four share the parent midpoint.
        for k in &kids {
            assert!(k.contains(&p.midpoint()));
        }
        // Children keep the parent's winding.
        let parent_n = normal(&p.corners);
        for k in &kids {
            assert!(normal(k).dot(parent_n) > 0.0);
        }
    }

    #[test]
    fn bounds_shrink_by_half_per_level() {
        let r = 1000.0;
        let a = Patch::new(CubeFace::Top.corners(), 1, Vec3::ZERO, r);
        let b = Patch::new(CubeFace::Top.corners(), 2, Vec3::ZERO, r);
        assert_abs_diff_eq!(a.bound_radius, 2f64.sqrt() * PI * r / 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b.bound_radius * 2.0, a.bound_radius, epsilon = 1e-9);
        // 2 * arc = pi * 1000 / 2 ~ 1570.8 -> 10
        assert_eq!(a.lod, 10);
        assert_eq!(b.lod, 9);
    }

    #[test]
    fn sub_unit_arcs_truncate_toward_zero() {
        // 2 * arc = pi * 0.1 / 2 ~ 0.157, log2 ~ -2.67
        let p = Patch::new(CubeFace::Front.corners(), 1, Vec3::ZERO, 0.1);
        assert_eq!(p.lod, -2);
    }

    #[test]
    fn face_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CubeFace::Bottom).unwrap(), "\"bottom\"");
        let f: CubeFace = serde_json::from_str("\"back\"").unwrap();
        assert_eq!(f, CubeFace::Back);
        assert_eq!(f.name(), "back");
    }
}
