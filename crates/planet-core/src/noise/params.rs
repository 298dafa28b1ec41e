use serde::{Deserialize, Serialize};

use super::generator::{GeneratorTree, NodeId};
use crate::error::PlanetError;

/// Parameter vector for the ridged terrain generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RidgedParams {
    /// Octave count; truncated toward zero when evaluated.
    pub octaves: f64,
    pub lacunarity: f64,
    pub gain: f64,
    pub offset: f64,
    /// Spectral exponent (0.5 gives a rough, mountainous profile).
    pub h: f64,
    pub weight: f64,
    pub freq: f64,
}

impl Default for RidgedParams {
    fn default() -> Self {
        Self {
            octaves: 16.0,
            lacunarity: 2.0,
            gain: 2.0,
            offset: 1.0,
            h: 0.5,
            weight: 1.0,
            freq: 1.0,
        }
    }
}

/// Node ids of a terrain tree built by [`GeneratorTree::ridged_terrain`].
///
/// The parameter ids are Constant nodes and can be retuned in place with
/// [`GeneratorTree::set_constant_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainNodes {
    pub root: NodeId,
    pub basis: NodeId,
    pub octaves: NodeId,
    pub lacunarity: NodeId,
    pub gain: NodeId,
    pub offset: NodeId,
    pub h: NodeId,
    pub weight: NodeId,
    pub freq: NodeId,
}

impl TerrainNodes {
    /// Write a new parameter vector into the Constant nodes.
    pub fn retune(&self, tree: &mut GeneratorTree, params: &RidgedParams) -> Result<(), PlanetError> {
        tree.set_constant_value(self.octaves, params.octaves)?;
        tree.set_constant_value(self.lacunarity, params.lacunarity)?;
        tree.set_constant_value(self.gain, params.gain)?;
        tree.set_constant_value(self.offset, params.offset)?;
        tree.set_constant_value(self.h, params.h)?;
        tree.set_constant_value(self.weight, params.weight)?;
        tree.set_constant_value(self.freq, params.freq)
    }

    /// Destroy every node of the terrain tree.
    pub fn destroy(self, tree: &mut GeneratorTree) -> Result<(), PlanetError> {
        for id in [
            self.root,
            self.basis,
            self.octaves,
            self.lacunarity,
            self.gain,
            self.offset,
            self.h,
            self.weight,
            self.freq,
        ] {
            tree.destroy(id)?;
        }
        Ok(())
    }
}

impl GeneratorTree {
    /// Build a ridged multifractal over a Simplex basis with Constant parameters.
    pub fn ridged_terrain(&mut self, params: &RidgedParams) -> Result<TerrainNodes, PlanetError> {
        let basis = self.simplex();
        let octaves = self.constant(params.octaves);
        let lacunarity = self.constant(params.lacunarity);
        let gain = self.constant(params.gain);
        let offset = self.constant(params.offset);
        let h = self.constant(params.h);
        let weight = self.constant(params.weight);
        let freq = self.constant(params.freq);
        let root = self.ridged_multifractal(basis, octaves, lacunarity, gain, offset, h, weight, freq)?;
        Ok(TerrainNodes { root, basis, octaves, lacunarity, gain, offset, h, weight, freq })
    }
}
