//! Ridged multifractal accumulation.
//!
//! Each octave folds the basis signal around `offset` (`offset - |n|`), squares
//! it, and weights it by the previous octave's clamped result, so detail piles
//! up along ridges and dies out in valleys.
use serde::{Deserialize, Serialize};

use super::simplex::simplex;

/// Turn a floating octave parameter into an iteration count by truncation
/// toward zero. Non-positive and NaN values give 0; values past `u32::MAX`
/// saturate there.
pub fn octave_count(raw: f64) -> u32 {
    let t = raw.trunc();
    if t.is_nan() || t <= 0.0 {
        0
    } else {
        t as u32
    }
}

/// Scalar parameters of one ridged multifractal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ridged {
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Scales each octave's signal into the next octave's weight.
    pub gain: f64,
    /// Fold level for `offset - |noise|`.
    pub offset: f64,
    /// Spectral exponent; octave `i` is attenuated by `freq_i^(-h)`.
    pub h: f64,
    /// Weight applied to the first octave.
    pub weight: f64,
    /// Frequency of the first octave (attenuation only, the coordinate is not
    /// pre-scaled by it).
    pub freq: f64,
}

impl Default for Ridged {
    fn default() -> Self {
        Self { lacunarity: 2.0, gain: 2.0, offset: 1.0, h: 0.5, weight: 1.0, freq: 1.0 }
    }
}

/// Running state after one octave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgedOctave {
    /// Weighted, squared signal contributed by this octave (before attenuation).
    pub signal: f64,
    /// Weight carried into the next octave, always in [0, 1].
    pub weight: f64,
    /// Accumulated value so far (not yet halved).
    pub value: f64,
}

/// Iterator over the octaves of a ridged accumulation driven by `basis`.
pub struct RidgedOctaves<F> {
    basis: F,
    params: Ridged,
    remaining: u32,
    point: [f64; 3],
    weight: f64,
    freq: f64,
    value: f64,
}

impl<F: FnMut(f64, f64, f64) -> f64> Iterator for RidgedOctaves<F> {
    type Item = RidgedOctave;

    fn next(&mut self) -> Option<RidgedOctave> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let [x, y, z] = self.point;
        let mut signal = self.params.offset - (self.basis)(x, y, z).abs();
        signal *= signal * self.weight;

        self.weight = (signal * self.params.gain).clamp(0.0, 1.0);
        // A NaN basis sample would survive `clamp`; keep the weight bounded.
        if self.weight.is_nan() {
            self.weight = 0.0;
        }

        self.value += signal * self.freq.powf(-self.params.h);
        self.freq *= self.params.lacunarity;
        self.point = [
            x * self.params.lacunarity,
            y * self.params.lacunarity,
            z * self.params.lacunarity,
        ];

        Some(RidgedOctave { signal, weight: self.weight, value: self.value })
    }
}

impl Ridged {
    /// Step through `octaves` octaves at `(x, y, z)`, sampling `basis` at the
    /// octave-scaled coordinate each time.
    pub fn octaves<F>(&self, basis: F, octaves: u32, x: f64, y: f64, z: f64) -> RidgedOctaves<F>
    where
        F: FnMut(f64, f64, f64) -> f64,
    {
        RidgedOctaves {
            basis,
            params: *self,
            remaining: octaves,
            point: [x, y, z],
            weight: self.weight,
            freq: self.freq,
            value: 0.0,
        }
    }

    /// Full accumulation over an arbitrary basis field. Returns `value * 0.5`.
    pub fn sample_with<F>(&self, basis: F, octaves: u32, x: f64, y: f64, z: f64) -> f64
    where
        F: FnMut(f64, f64, f64) -> f64,
    {
        self.octaves(basis, octaves, x, y, z).last().map_or(0.0, |o| o.value) * 0.5
    }

    /// Accumulation over the built-in simplex kernel.
    pub fn sample(&self, octaves: u32, x: f64, y: f64, z: f64) -> f64 {
        self.sample_with(simplex, octaves, x, y, z)
    }
}

/// Ridged multifractal over the simplex kernel with explicit parameters.
#[allow(clippy::too_many_arguments)]
pub fn ridged(
    octaves: u32,
    x: f64,
    y: f64,
    z: f64,
    lacunarity: f64,
    gain: f64,
    offset: f64,
    h: f64,
    weight: f64,
    freq: f64,
) -> f64 {
    Ridged { lacunarity, gain, offset, h, weight, freq }.sample(octaves, x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn zero_octaves_is_zero() {
        assert_eq!(ridged(0, 0.4, 0.1, -0.3, 2.0, 2.0, 1.0, 0.5, 1.0, 1.0), 0.0);
        assert_eq!(ridged(0, 1e4, -3.0, 7.0, 1.5, 9.0, 3.0, 2.0, 0.3, 4.0), 0.0);
    }

    #[test]
    fn weight_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..300 {
            let params = Ridged {
                lacunarity: rng.gen_range(0.5..3.0),
                gain: rng.gen_range(-5.0..10.0),
                offset: rng.gen_range(-2.0..3.0),
                h: rng.gen_range(-1.0..2.0),
                weight: rng.gen_range(-2.0..4.0),
                freq: rng.gen_range(0.1..4.0),
            };
            let p: [f64; 3] = [
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            ];
            for o in params.octaves(simplex, 12, p[0], p[1], p[2]) {
                assert!((0.0..=1.0).contains(&o.weight), "weight {} escaped [0, 1]", o.weight);
            }
        }
    }

    #[test]
    fn single_octave_matches_hand_computation() {
        let (x, y, z) = (0.25, 0.5, -0.75);
        let n = simplex(x, y, z);
        let (offset, weight, freq, h) = (1.0_f64, 0.8_f64, 2.0_f64, 0.5_f64);
        let signal = (offset - n.abs()).powi(2) * weight;
        let expected = signal * freq.powf(-h) * 0.5;
        let got = ridged(1, x, y, z, 2.0, 2.0, offset, h, weight, freq);
        assert_relative_eq!(got, expected, epsilon = 1e-12);
    }

    #[test]
    fn constant_basis_follows_recurrence() {
        // |basis| = 0.5, offset 1 => raw signal 0.25 before weighting.
        let params = Ridged { lacunarity: 2.0, gain: 2.0, offset: 1.0, h: 1.0, weight: 1.0, freq: 1.0 };
        let got = params.sample_with(|_, _, _| -0.5, 3, 0.0, 0.0, 0.0);
        // weights in: 1.0, 0.5, 0.25 ; signals: 0.25, 0.125, 0.0625
        let expected = (0.25 / 1.0 + 0.125 / 2.0 + 0.0625 / 4.0) * 0.5;
        assert_relative_eq!(got, expected, epsilon = 1e-12);
    }

    #[test]
    fn basis_sampled_at_scaled_coordinates() {
        let params = Ridged { lacunarity: 3.0, ..Ridged::default() };
        let mut seen = Vec::new();
        params.sample_with(
            |x, y, z| {
                seen.push([x, y, z]);
                0.0
            },
            3,
            1.0,
            2.0,
            -1.0,
        );
        assert_eq!(seen, vec![[1.0, 2.0, -1.0], [3.0, 6.0, -3.0], [9.0, 18.0, -9.0]]);
    }

    #[test]
    fn octave_count_truncates_toward_zero() {
        assert_eq!(octave_count(3.9), 3);
        assert_eq!(octave_count(1.0), 1);
        assert_eq!(octave_count(0.99), 0);
        assert_eq!(octave_count(-0.5), 0);
        assert_eq!(octave_count(-4.0), 0);
        assert_eq!(octave_count(f64::NAN), 0);
        assert_eq!(octave_count(100.7), 100);
        assert_eq!(octave_count(1e12), u32::MAX);
    }

    #[test]
    fn long_octave_runs_are_not_shortened() {
        // With unit lacunarity and gain at the origin every octave adds 1.
        let params = Ridged { lacunarity: 1.0, gain: 1.0, offset: 1.0, h: 0.0, weight: 1.0, freq: 1.0 };
        assert_eq!(params.sample(100, 0.0, 0.0, 0.0), 50.0);
        assert_eq!(params.octaves(simplex, 100, 0.0, 0.0, 0.0).count(), 100);
    }
}
