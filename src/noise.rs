//! Classic 2D gradient noise and its fractal (fBm) composition.

use crate::config::NoiseParameters;
use crate::permutation::PermutationTable;

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linearly interpolate between two values
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of one of 8 fixed gradients with the offset `(x, y)`
///
/// The low three bits of `hash` select the gradient:
/// (1,1), (-1,1), (1,-1), (-1,-1), (1,0), (-1,0), (0,1), (0,-1).
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Sample 2D gradient noise
///
/// # Arguments
/// * `x` - X coordinate in noise space
/// * `y` - Y coordinate in noise space
/// * `table` - Permutation table used to hash the cell corners
///
/// # Returns
/// * `f64` - Noise value within [-1, 1]
pub fn gradient_noise_2d(x: f64, y: f64, table: &PermutationTable) -> f64 {
    let x_floor = x.floor();
    let y_floor = y.floor();

    // Cell coordinates wrap every 256 units
    let xi = (x_floor as i64 & 255) as usize;
    let yi = (y_floor as i64 & 255) as usize;

    let xf = x - x_floor;
    let yf = y - y_floor;

    let u = fade(xf);
    let v = fade(yf);

    // Hash the four corners of the cell
    let aa = table.get(table.get(xi) as usize + yi);
    let ab = table.get(table.get(xi) as usize + yi + 1);
    let ba = table.get(table.get(xi + 1) as usize + yi);
    let bb = table.get(table.get(xi + 1) as usize + yi + 1);

    let grad_aa = grad(aa, xf, yf);
    let grad_ba = grad(ba, xf - 1.0, yf);
    let grad_ab = grad(ab, xf, yf - 1.0);
    let grad_bb = grad(bb, xf - 1.0, yf - 1.0);

    let bottom = lerp(grad_aa, grad_ba, u);
    let top = lerp(grad_ab, grad_bb, u);

    lerp(bottom, top, v).clamp(-1.0, 1.0)
}

/// Sample fractal Brownian motion built from [`gradient_noise_2d`]
///
/// Each octave multiplies the frequency by `lacunarity` and the amplitude by
/// `persistence`. The first octave always has amplitude 1; the `amplitude`
/// field of `params` is not used.
///
/// # Arguments
/// * `x` - X coordinate, scaled by `params.frequency` for the first octave
/// * `y` - Y coordinate, scaled by `params.frequency` for the first octave
/// * `params` - Octave count, frequency, lacunarity and persistence
/// * `table` - Permutation table built from `params.seed`
///
/// # Returns
/// * `f64` - Value within [0, 1]; exactly 0.5 when there are no octaves
pub fn fbm(x: f64, y: f64, params: &NoiseParameters, table: &PermutationTable) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = params.frequency;
    let mut max_value = 0.0;

    for _ in 0..params.octaves {
        total += gradient_noise_2d(x * frequency, y * frequency, table) * amplitude;
        max_value += amplitude;

        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    if max_value == 0.0 {
        return 0.5;
    }

    ((total / max_value + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn base_params() -> NoiseParameters {
        NoiseParameters {
            seed: 12345,
            frequency: 1.0,
            amplitude: 1.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_noise_in_range() {
        let table = PermutationTable::new(12345);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..2000 {
            let x = rng.gen_range(-50.0..50.0);
            let y = rng.gen_range(-50.0..50.0);
            let value = gradient_noise_2d(x, y, &table);
            assert!((-1.0..=1.0).contains(&value), "noise({}, {}) = {}", x, y, value);
        }
    }

    #[test]
    fn test_noise_is_deterministic() {
        let table = PermutationTable::new(12345);
        let a = gradient_noise_2d(3.31, 2.93, &table);
        let b = gradient_noise_2d(3.31, 2.93, &table);
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_is_continuous() {
        let table = PermutationTable::new(12345);
        let (x, y, delta) = (5.5, 7.3, 0.001);
        let base = gradient_noise_2d(x, y, &table);
        assert!((base - gradient_noise_2d(x + delta, y, &table)).abs() < 0.1);
        assert!((base - gradient_noise_2d(x, y + delta, &table)).abs() < 0.1);
    }

    #[test]
    fn test_noise_is_zero_on_lattice() {
        let table = PermutationTable::new(5);
        for i in -3..3 {
            assert_eq!(gradient_noise_2d(i as f64, (i * 2) as f64, &table), 0.0);
        }
    }

    #[test]
    fn test_noise_varies() {
        let table = PermutationTable::new(12345);
        let mut values: Vec<f64> = (0..100)
            .map(|i| gradient_noise_2d(i as f64 * 0.5, i as f64 * 0.3, &table))
            .collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values.dedup();
        assert!(values.len() > 50, "only {} distinct values", values.len());
    }

    #[test]
    fn test_fbm_in_range() {
        let params = base_params();
        let table = PermutationTable::new(params.seed);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let x = rng.gen_range(-50.0..50.0);
            let y = rng.gen_range(-50.0..50.0);
            let value = fbm(x, y, &params, &table);
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_single_octave_matches_normalized_noise() {
        let params = NoiseParameters {
            octaves: 1,
            ..base_params()
        };
        let table = PermutationTable::new(params.seed);
        let expected = (gradient_noise_2d(3.5, 2.7, &table) + 1.0) / 2.0;
        assert!((fbm(3.5, 2.7, &params, &table) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_zero_octaves_is_midpoint() {
        let params = NoiseParameters {
            octaves: 0,
            ..base_params()
        };
        let table = PermutationTable::new(params.seed);
        assert_eq!(fbm(5.0, 5.0, &params, &table), 0.5);
    }

    #[test]
    fn test_frequency_scales_coordinates() {
        let table = PermutationTable::new(12345);
        let high = NoiseParameters {
            frequency: 4.0,
            ..base_params()
        };
        let low = base_params();
        let a = fbm(2.5, 1.5, &high, &table);
        let b = fbm(10.0, 6.0, &low, &table);
        assert!((a - b).abs() < 1e-5, "{} vs {}", a, b);
    }

    #[test]
    fn test_amplitude_is_ignored() {
        let table = PermutationTable::new(12345);
        let loud = NoiseParameters {
            amplitude: 25.0,
            ..base_params()
        };
        assert_eq!(fbm(1.3, 0.4, &loud, &table), fbm(1.3, 0.4, &base_params(), &table));
    }
}
