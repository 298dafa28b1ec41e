//! Procedural planet height fields.
//!
//! Noise generators are composed as node trees ([`noise::GeneratorTree`]) and
//! sampled over a cube-mapped sphere ([`planet::Planet`]) to produce displaced
//! patch meshes.

pub mod config;
pub mod error;
pub mod noise;
pub mod planet;
pub mod sphere;

pub use config::PlanetConfig;
pub use error::PlanetError;
pub use planet::{CubeFace, Patch, PatchIndices, PatchMesh, Planet};
pub use sphere::{cube_to_sphere, Vec3};
