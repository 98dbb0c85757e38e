//! Height and slope driven texture splatting.
//!
//! Each texture slot owns a height band and a slope band. A band weighs 1 at
//! its midpoint and falls off with smoothstep to 0 at its ends.

use glam::Vec3;
use image::{Rgba, RgbaImage};

use crate::config::{TextureSlot, TextureSlots, SLOT_COUNT};
use crate::error::{Result, TerrainError};
use crate::heightmap::Heightmap;

/// Normalized weights at or below this are dropped
const MIN_WEIGHT: f32 = 1e-6;

/// Blend weight of one texture slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatWeight {
    pub texture_index: usize,
    pub weight: f32,
}

/// Cubic Hermite step: 0 below `edge0`, 1 above `edge1`
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Weight of `value` inside the band `[start, end]`
///
/// 0 outside the band, 1 at its midpoint. A zero-width band only
/// matches its single value.
fn range_weight(value: f32, start: f32, end: f32) -> f32 {
    if !value.is_finite() || value < start || value > end {
        return 0.0;
    }
    if start == end {
        return 1.0;
    }

    let mid = (start + end) / 2.0;
    if value <= mid {
        smoothstep(start, mid, value)
    } else {
        1.0 - smoothstep(mid, end, value)
    }
}

/// Slope of a surface from its unit normal: 0 flat, 1 vertical
pub fn calculate_slope(normal: Vec3) -> f32 {
    1.0 - normal.y
}

/// Compute the texture blend for one surface point
///
/// # Arguments
/// * `height` - Normalized height in [0, 1]
/// * `slope` - Normalized slope in [0, 1]
/// * `slots` - Texture slots with their height and slope bands
///
/// # Returns
/// * `Vec<SplatWeight>` - Non-zero weights summing to 1. When no slot
///   matches, a single full weight on texture 0.
pub fn compute_splat_weights(height: f32, slope: f32, slots: &[TextureSlot]) -> Vec<SplatWeight> {
    let mut weights: Vec<SplatWeight> = slots
        .iter()
        .filter_map(|slot| {
            let height_weight = range_weight(height, slot.height_start, slot.height_end);
            let slope_weight = range_weight(slope, slot.slope_start, slot.slope_end);
            let weight = height_weight * (1.0 - slot.slope_influence)
                + slope_weight * slot.slope_influence;

            (weight > 0.0).then_some(SplatWeight {
                texture_index: slot.index,
                weight,
            })
        })
        .collect();

    if weights.is_empty() {
        return vec![SplatWeight {
            texture_index: 0,
            weight: 1.0,
        }];
    }

    let total: f32 = weights.iter().map(|w| w.weight).sum();
    for w in weights.iter_mut() {
        w.weight /= total;
    }
    weights.retain(|w| w.weight > MIN_WEIGHT);

    weights
}

/// Dense per-vertex weights for the three texture slots
///
/// Height comes from the heightmap and slope from the vertex normal, so the
/// result matches what the terrain material blends on screen. The slots are
/// validated first so every weight lands in its own channel.
pub fn bake_vertex_weights(
    heightmap: &Heightmap,
    normals: &[f32],
    slots: &TextureSlots,
) -> Result<Vec<[f32; SLOT_COUNT]>> {
    slots.validate()?;

    let vertex_count = heightmap.values().len();
    if normals.len() != vertex_count * 3 {
        return Err(TerrainError::invalid(
            "normals",
            format!("expected {} components, got {}", vertex_count * 3, normals.len()),
        ));
    }

    let baked = heightmap
        .values()
        .iter()
        .zip(normals.chunks_exact(3))
        .map(|(&height, normal)| {
            let slope = calculate_slope(Vec3::from_slice(normal)).clamp(0.0, 1.0);
            let mut dense = [0.0; SLOT_COUNT];
            for w in compute_splat_weights(height, slope, slots) {
                dense[w.texture_index] = w.weight;
            }
            dense
        })
        .collect();

    Ok(baked)
}

/// Bake the blend of a terrain into an RGBA splat map
///
/// R, G and B hold the weights of slots 0, 1 and 2; alpha is opaque.
/// The image has one pixel per heightmap cell.
pub fn bake_splat_map(
    heightmap: &Heightmap,
    normals: &[f32],
    slots: &TextureSlots,
) -> Result<RgbaImage> {
    let weights = bake_vertex_weights(heightmap, normals, slots)?;
    let resolution = heightmap.resolution() as u32;

    let to_byte = |w: f32| (w * 255.0).round().clamp(0.0, 255.0) as u8;
    let image = RgbaImage::from_fn(resolution, resolution, |x, y| {
        let [r, g, b] = weights[(y * resolution + x) as usize];
        Rgba([to_byte(r), to_byte(g), to_byte(b), 255])
    });

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normals::estimate_normals;

    fn test_slots() -> TextureSlots {
        TextureSlots::new([
            TextureSlot::new(0, "grass").with_height(0.0, 0.4).with_slope(0.7, 1.0, 0.5),
            TextureSlot::new(1, "rock").with_height(0.3, 0.7).with_slope(0.5, 0.8, 0.5),
            TextureSlot::new(2, "snow").with_height(0.6, 1.0).with_slope(0.8, 1.0, 0.3),
        ])
    }

    fn weight_of(weights: &[SplatWeight], index: usize) -> Option<f32> {
        weights.iter().find(|w| w.texture_index == index).map(|w| w.weight)
    }

    fn sum(weights: &[SplatWeight]) -> f32 {
        weights.iter().map(|w| w.weight).sum()
    }

    #[test]
    fn test_slope_flat() {
        assert_eq!(calculate_slope(Vec3::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn test_slope_vertical() {
        for normal in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            assert_eq!(calculate_slope(normal), 1.0);
        }
    }

    #[test]
    fn test_slope_45_degrees() {
        let half_sqrt2 = std::f32::consts::SQRT_2 / 2.0;
        let slope = calculate_slope(Vec3::new(half_sqrt2, half_sqrt2, 0.0));
        assert!((slope - 0.293).abs() < 1e-3);
    }

    #[test]
    fn test_range_weight_shape() {
        assert_eq!(range_weight(0.5, 0.0, 1.0), 1.0);
        assert_eq!(range_weight(0.0, 0.0, 1.0), 0.0);
        assert_eq!(range_weight(1.0, 0.0, 1.0), 0.0);
        assert_eq!(range_weight(1.5, 0.0, 1.0), 0.0);
        assert_eq!(range_weight(0.25, 0.0, 1.0), 0.5);
        assert_eq!(range_weight(0.3, 0.3, 0.3), 1.0);
        assert_eq!(range_weight(0.4, 0.3, 0.3), 0.0);
        assert_eq!(range_weight(f32::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let slots = test_slots();
        let mut height = 0.0;
        while height <= 1.0 {
            let mut slope = 0.0;
            while slope <= 1.0 {
                let weights = compute_splat_weights(height, slope, &slots);
                assert!((sum(&weights) - 1.0).abs() < 1e-5, "h={} s={}", height, slope);
                assert!(weights.iter().all(|w| w.weight > 0.0));
                assert!(weights.len() <= slots.len());
                slope += 0.05;
            }
            height += 0.05;
        }
    }

    #[test]
    fn test_low_flat_favors_grass() {
        let weights = compute_splat_weights(0.1, 0.0, &test_slots());
        assert!(weight_of(&weights, 0).unwrap() > 0.5);
    }

    #[test]
    fn test_high_flat_favors_snow() {
        let weights = compute_splat_weights(0.9, 0.0, &test_slots());
        assert!(weight_of(&weights, 2).unwrap() > 0.5);
    }

    #[test]
    fn test_steep_slope_brings_rock() {
        let slots = test_slots();
        for height in [0.1, 0.9] {
            let weights = compute_splat_weights(height, 0.65, &slots);
            assert!(weight_of(&weights, 1).unwrap() > 0.2, "height {}", height);
        }
    }

    #[test]
    fn test_mid_height_blends_neighbours() {
        let weights = compute_splat_weights(0.35, 0.0, &test_slots());
        assert!(weight_of(&weights, 0).unwrap() > 0.0);
        assert!(weight_of(&weights, 1).unwrap() > 0.0);
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let slots = [TextureSlot::new(0, "only").with_height(0.5, 0.6)];
        let weights = compute_splat_weights(0.0, 0.0, &slots);
        assert_eq!(
            weights,
            vec![SplatWeight {
                texture_index: 0,
                weight: 1.0
            }]
        );
    }

    #[test]
    fn test_splat_map_channels() {
        let heightmap = Heightmap::from_values(2, vec![0.1, 0.35, 0.5, 0.9]).unwrap();
        let normals = estimate_normals(&heightmap, 10.0).unwrap();
        let slots = test_slots();

        let weights = bake_vertex_weights(&heightmap, &normals, &slots).unwrap();
        assert_eq!(weights.len(), 4);
        for dense in &weights {
            let total: f32 = dense.iter().sum();
            assert!((total - 1.0).abs() < 1e-5);
        }

        let image = bake_splat_map(&heightmap, &normals, &slots).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        for pixel in image.pixels() {
            let total: u32 = pixel.0[..3].iter().map(|&c| c as u32).sum();
            assert!((253..=257).contains(&total), "channel sum {}", total);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn test_bake_rejects_mismatched_normals() {
        let heightmap = Heightmap::flat(2, 0.5).unwrap();
        assert!(bake_vertex_weights(&heightmap, &[0.0; 6], &test_slots()).is_err());
    }

    #[test]
    fn test_bake_rejects_out_of_range_slot_index() {
        let heightmap = Heightmap::flat(2, 0.2).unwrap();
        let normals = estimate_normals(&heightmap, 10.0).unwrap();
        let mut slots = test_slots();
        slots[0].index = SLOT_COUNT;

        let err = bake_vertex_weights(&heightmap, &normals, &slots).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidParameter { name: "index", .. }));
        assert!(bake_splat_map(&heightmap, &normals, &slots).is_err());
    }
}
