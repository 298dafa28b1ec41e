//! Fractional Brownian Motion over the simplex kernel.
//!
//! fBm: sum of octaves with amplitude = gain^i and frequency = lacunarity^i.
//! Both factors are fixed here (lacunarity 1.9, gain 0.65).
use noise::NoiseFn;

use super::simplex::simplex;

/// Per-octave frequency multiplier.
pub const FBM_LACUNARITY: f64 = 1.9;
/// Per-octave amplitude decay.
pub const FBM_GAIN: f64 = 0.65;

/// Evaluate `octaves` layers of simplex fBm at `(x, y, z)`.
///
/// Zero octaves returns exactly 0.
pub fn fbm(octaves: u32, x: f64, y: f64, z: f64) -> f64 {
    let (mut x, mut y, mut z) = (x, y, z);
    let mut sum = 0.0f64;
    let mut amp = 1.0f64;
    for _ in 0..octaves {
        sum += amp * simplex(x, y, z);
        amp *= FBM_GAIN;
        x *= FBM_LACUNARITY;
        y *= FBM_LACUNARITY;
        z *= FBM_LACUNARITY;
    }
    sum
}

/// fBm with a fixed octave count, usable anywhere a [`NoiseFn`] is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fbm {
    pub octaves: u32,
}

impl Fbm {
    pub fn new(octaves: u32) -> Self {
        Self { octaves }
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        fbm(self.octaves, x, y, z)
    }
}

impl NoiseFn<f64, 3> for Fbm {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}
