//! 3D simplex noise kernel.
//!
//! Deterministic and stateless: the lattice hash comes from the fixed tables in
//! [`super::tables`], so the same point always yields the same value on every
//! call and every thread.
use super::tables::{perm3, GRAD3, GRADIENT_COUNT};

/// Skew factor for 3D: (sqrt(4) - 1) / 3.
const F3: f64 = 1.0 / 3.0;
/// Unskew factor for 3D: (1 - 1/sqrt(4)) / 3.
const G3: f64 = 1.0 / 6.0;
/// Squared radius of each corner's influence sphere.
const FALLOFF: f64 = 0.6;
/// Output scale. Keeps typical values inside [-1, 1]; not a hard bound.
pub const SIMPLEX_SCALE: f64 = 32.0;

/// Evaluate simplex noise at `(x, y, z)`.
pub fn simplex(x: f64, y: f64, z: f64) -> f64 {
    // Skew into the lattice to find the containing cell.
    let s = (x + y + z) * F3;
    let i = (x + s).floor();
    let j = (y + s).floor();
    let k = (z + s).floor();

    // Unskew the cell origin back into (x, y, z) space.
    let t = (i + j + k) * G3;
    let x0 = x - (i - t);
    let y0 = y - (j - t);
    let z0 = z - (k - t);

    let ([i1, j1, k1], [i2, j2, k2]) = simplex_corners(x0, y0, z0);

    let d0 = [x0, y0, z0];
    let d1 = [x0 - i1 as f64 + G3, y0 - j1 as f64 + G3, z0 - k1 as f64 + G3];
    let d2 = [
        x0 - i2 as f64 + 2.0 * G3,
        y0 - j2 as f64 + 2.0 * G3,
        z0 - k2 as f64 + 2.0 * G3,
    ];
    let d3 = [
        x0 - 1.0 + 3.0 * G3,
        y0 - 1.0 + 3.0 * G3,
        z0 - 1.0 + 3.0 * G3,
    ];

    let ii = wrap_lattice(i);
    let jj = wrap_lattice(j);
    let kk = wrap_lattice(k);

    let g0 = perm3(ii, jj, kk) % GRADIENT_COUNT;
    let g1 = perm3(ii + i1, jj + j1, kk + k1) % GRADIENT_COUNT;
    let g2 = perm3(ii + i2, jj + j2, kk + k2) % GRADIENT_COUNT;
    let g3 = perm3(ii + 1, jj + 1, kk + 1) % GRADIENT_COUNT;

    SIMPLEX_SCALE * (corner(g0, d0) + corner(g1, d1) + corner(g2, d2) + corner(g3, d3))
}

/// Offsets of the second and third simplex corners for a point at local
/// offset `(x0, y0, z0)` inside its skewed cell. The branches follow the
/// magnitude ordering of the three components.
#[inline]
fn simplex_corners(x0: f64, y0: f64, z0: f64) -> ([usize; 3], [usize; 3]) {
    if x0 >= y0 {
        if y0 >= z0 {
            ([1, 0, 0], [1, 1, 0]) // X Y Z
        } else if x0 >= z0 {
            ([1, 0, 0], [1, 0, 1]) // X Z Y
        } else {
            ([0, 0, 1], [1, 0, 1]) // Z X Y
        }
    } else if y0 < z0 {
        ([0, 0, 1], [0, 1, 1]) // Z Y X
    } else if x0 < z0 {
        ([0, 1, 0], [0, 1, 1]) // Y Z X
    } else {
        ([0, 1, 0], [1, 1, 0]) // Y X Z
    }
}

/// Lattice coordinate modulo 256, always non-negative.
#[inline]
fn wrap_lattice(c: f64) -> usize {
    (c as i64).rem_euclid(256) as usize
}

#[inline]
fn corner(gradient: usize, d: [f64; 3]) -> f64 {
    let t = FALLOFF - d[0] * d[0] - d[1] * d[1] - d[2] * d[2];
    if t < 0.0 {
        return 0.0;
    }
    let g = GRAD3[gradient];
    let t2 = t * t;
    t2 * t2 * (g[0] as f64 * d[0] + g[1] as f64 * d[1] + g[2] as f64 * d[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn lattice_origin_is_zero() {
        // Every corner either lies outside the falloff radius or sits exactly
        // on the sample point, so the sum vanishes.
        assert_eq!(simplex(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p: [f64; 3] = [
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            ];
            let a = simplex(p[0], p[1], p[2]);
            let b = simplex(p[0], p[1], p[2]);
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn output_stays_near_unit_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for _ in 0..20_000 {
            let v = simplex(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            assert!(v.is_finite());
            min = min.min(v);
            max = max.max(v);
        }
        assert!(min > -1.1 && max < 1.1, "range [{min:.3}, {max:.3}] drifted");
        assert!(max - min > 1.0, "noise range [{min:.3}, {max:.3}] is too flat");
    }

    #[test]
    fn field_is_continuous() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let (x, y, z) = (
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let d = (simplex(x, y, z) - simplex(x + 1e-6, y, z)).abs();
            assert!(d < 1e-3, "jump of {d} at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn lattice_repeats_every_256_cells() {
        // One skewed-lattice step of -256 along i, expressed in input space.
        let a = simplex(0.3, 0.7, 0.2);
        let b = simplex(0.3 - 256.0 * (1.0 - G3), 0.7 + 256.0 * G3, 0.2 + 256.0 * G3);
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    #[test]
    fn corner_ordering_covers_all_branches() {
        assert_eq!(simplex_corners(0.3, 0.2, 0.1), ([1, 0, 0], [1, 1, 0]));
        assert_eq!(simplex_corners(0.3, 0.1, 0.2), ([1, 0, 0], [1, 0, 1]));
        assert_eq!(simplex_corners(0.2, 0.1, 0.3), ([0, 0, 1], [1, 0, 1]));
        assert_eq!(simplex_corners(0.1, 0.2, 0.3), ([0, 0, 1], [0, 1, 1]));
        assert_eq!(simplex_corners(0.1, 0.3, 0.2), ([0, 1, 0], [0, 1, 1]));
        assert_eq!(simplex_corners(0.2, 0.3, 0.1), ([0, 1, 0], [1, 1, 0]));
    }

    #[test]
    fn wrap_lattice_is_non_negative() {
        assert_eq!(wrap_lattice(-1.0), 255);
        assert_eq!(wrap_lattice(-256.0), 0);
        assert_eq!(wrap_lattice(257.0), 1);
    }
}
