//! Planet surface: height queries, the patch quadtree and patch meshes.
//!
//! A [`Planet`] couples a base sphere with any 3-D scalar field. The field is
//! sampled on unit directions, clamped to [-1, 1] and scaled, so the surface
//! never leaves the shell `radius ± scale`.

pub mod indices;
pub mod mesh;
pub mod patch;

pub use indices::{IndexRange, PatchIndices};
pub use mesh::{generate_vertices, query_height, tex_coords, vertex_buffer_len, PatchMesh};
pub use patch::{arc_length, CubeFace, Patch, CUBE_VERTICES};

use std::f64::consts::PI;

use log::{debug, trace};
use noise::NoiseFn;

use crate::config::PlanetConfig;
use crate::error::PlanetError;
use crate::sphere::{cube_to_sphere, Vec3};

pub struct Planet<F> {
    radius: f64,
    scale: f64,
    tile_size: usize,
    indices: PatchIndices,
    field: F,
}

impl<F> Planet<F>
where
    F: NoiseFn<f64, 3>,
{
    /// Validate `config` and wrap `field` as the planet's height source.
    pub fn new(config: &PlanetConfig, field: F) -> Result<Self, PlanetError> {
        config.validate()?;
        Ok(Self {
            radius: config.radius,
            scale: config.scale,
            tile_size: config.tile_size,
            indices: PatchIndices::new(config.tile_size)?,
            field,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    /// Index buffer shared by every patch of this planet.
    pub fn indices(&self) -> &PatchIndices {
        &self.indices
    }

    /// Distance from the planet centre to the surface along `dir`.
    pub fn height(&self, dir: Vec3) -> f64 {
        query_height(dir, self.radius, self.scale, &self.field)
    }

    pub fn surface_point(&self, dir: Vec3) -> Vec3 {
        let n = dir.normalize();
        n * self.height(n)
    }

    /// Deepest level worth subdividing to: one level per halving of the
    /// quarter circumference down to a metre.
    pub fn max_lod(&self) -> f64 {
        (PI * self.radius / 2.0).log2()
    }

    pub fn patch(&self, corners: [Vec3; 4], level: u32) -> Patch {
        let mid = corners[0].lerp(corners[2], 0.5);
        let center = self.surface_point(cube_to_sphere(mid));
        Patch::new(corners, level, center, self.radius)
    }

    /// The six level-1 patches, in [`CubeFace::ALL`] order.
    pub fn root_patches(&self) -> [Patch; 6] {
        CubeFace::ALL.map(|face| self.patch(face.corners(), 1))
    }

    pub fn can_subdivide(&self, patch: &Patch) -> bool {
        (patch.level as f64) < self.max_lod()
    }

    /// Split `patch` into four children one level deeper, or `None` once the
    /// maximum level has been reached.
    pub fn subdivide(&self, patch: &Patch) -> Option<[Patch; 4]> {
        if !self.can_subdivide(patch) {
            return None;
        }
        trace!("subdividing level {} patch at {:?}", patch.level, patch.center);
        let level = patch.level + 1;
        Some(patch.child_corners().map(|c| self.patch(c, level)))
    }

    /// Displaced vertices and texture coordinates for one patch, relative to
    /// the patch centre.
    pub fn build_patch(&self, patch: &Patch) -> Result<PatchMesh, PlanetError> {
        let size = self.tile_size;
        let mut vertices = vec![0.0f32; vertex_buffer_len(size)?];
        generate_vertices(
            patch.center,
            &patch.corners,
            size,
            self.radius,
            self.scale,
            &self.field,
            &mut vertices,
        )?;
        debug!("built level {} patch: {} vertices", patch.level, size * size);
        Ok(PatchMesh {
            size,
            center: patch.center,
            vertices,
            tex_coords: tex_coords(size),
        })
    }

    /// Build several patches. With the `threading` feature they are built in
    /// parallel.
    #[cfg(feature = "threading")]
    pub fn build_patches(&self, patches: &[Patch]) -> Result<Vec<PatchMesh>, PlanetError>
    where
        F: Sync,
    {
        use rayon::prelude::*;
        patches.par_iter().map(|p| self.build_patch(p)).collect()
    }

    /// Build several patches in order.
    #[cfg(not(feature = "threading"))]
    pub fn build_patches(&self, patches: &[Patch]) -> Result<Vec<PatchMesh>, PlanetError> {
        patches.iter().map(|p| self.build_patch(p)).collect()
    }
}
