//! Displaced vertex grids for one cube patch.
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

use crate::error::PlanetError;
use crate::sphere::{cube_to_sphere, Vec3};

/// Height at a direction on the sphere: `radius + clamp(field, -1, 1) * scale`.
///
/// `v` need not be unit length; only its direction is used. A zero vector has
/// no direction and yields NaN.
pub fn query_height<F>(v: Vec3, radius: f64, scale: f64, field: &F) -> f64
where
    F: NoiseFn<f64, 3> + ?Sized,
{
    let n = v.normalize();
    radius + displacement(field, n) * scale
}

/// Field value at `dir`, clamped so malformed generators cannot push the
/// surface more than `scale` away from the base sphere.
#[inline]
fn displacement<F>(field: &F, dir: Vec3) -> f64
where
    F: NoiseFn<f64, 3> + ?Sized,
{
    field.get(dir.to_array()).clamp(-1.0, 1.0)
}

/// Fill `out` with a `size × size` grid of displaced vertices for the cube
/// patch spanned by `corners`, relative to `center`.
///
/// Column `i` runs from `corners[0]` toward `corners[3]`, row `j` from the
/// `corners[0]..corners[3]` edge toward `corners[1]..corners[2]`. Vertex
/// `(i, j)` is written to `out[(j * size + i) * 3..][..3]`.
#[allow(clippy::too_many_arguments)]
pub fn generate_vertices<F>(
    center: Vec3,
    corners: &[Vec3; 4],
    size: usize,
    radius: f64,
    scale: f64,
    field: &F,
    out: &mut [f32],
) -> Result<(), PlanetError>
where
    F: NoiseFn<f64, 3> + ?Sized,
{
    if size < 2 {
        return Err(PlanetError::GridTooSmall(size));
    }
    let needed = vertex_buffer_len(size)?;
    if out.len() < needed {
        return Err(PlanetError::BufferTooSmall { needed, got: out.len() });
    }

    let [v0, v1, v2, v3] = *corners;
    let last = (size - 1) as f64;
    for i in 0..size {
        let u = i as f64 / last;
        let lo = v0.lerp(v3, u);
        let hi = v1.lerp(v2, u);
        for j in 0..size {
            let dir = cube_to_sphere(lo.lerp(hi, j as f64 / last));
            let h = displacement(field, dir);
            let p = dir * (radius + h * scale) - center;

            let k = (j * size + i) * 3;
            out[k] = p.x as f32;
            out[k + 1] = p.y as f32;
            out[k + 2] = p.z as f32;
        }
    }
    Ok(())
}

/// Number of floats a `size × size` vertex grid occupies.
pub fn vertex_buffer_len(size: usize) -> Result<usize, PlanetError> {
    size.checked_mul(size)
        .and_then(|n| n.checked_mul(3))
        .ok_or(PlanetError::GridTooLarge(size))
}

/// Per-vertex texture coordinates for a `size × size` patch, two floats each.
///
/// Entry `i * size + j` holds `(i, j) / (size - 1)`.
pub fn tex_coords(size: usize) -> Vec<f32> {
    let last = size.saturating_sub(1).max(1) as f32;
    let mut coords = Vec::with_capacity(size * size * 2);
    for i in 0..size {
        for j in 0..size {
            coords.push(i as f32 / last);
            coords.push(j as f32 / last);
        }
    }
    coords
}

/// Vertex data of one built patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchMesh {
    /// Vertices per side.
    pub size: usize,
    /// Origin the vertex positions are relative to.
    pub center: Vec3,
    /// `size * size * 3` positions.
    pub vertices: Vec<f32>,
    /// `size * size * 2` texture coordinates.
    pub tex_coords: Vec<f32>,
}

impl PatchMesh {
    pub fn vertex(&self, i: usize, j: usize) -> [f32; 3] {
        let k = (j * self.size + i) * 3;
        [self.vertices[k], self.vertices[k + 1], self.vertices[k + 2]]
    }
}
