use glam::Vec3;

use crate::error::{ensure_positive, Result};
use crate::heightmap::Heightmap;

/// Estimate per-vertex normals from a heightmap
///
/// Uses central differences between the left/right and back/front
/// neighbours. At the grid border the missing neighbour is clamped to the
/// vertex itself, which halves the horizontal distance of that difference.
///
/// # Arguments
/// * `heightmap` - Source heights in [0, 1]
/// * `world_size` - Horizontal extent and height scale of the mesh
///
/// # Returns
/// * `Result<Vec<f32>>` - Unit `[x, y, z]` normal per vertex
pub fn estimate_normals(heightmap: &Heightmap, world_size: f32) -> Result<Vec<f32>> {
    ensure_positive("world_size", world_size as f64)?;

    let resolution = heightmap.resolution();
    let last = resolution - 1;
    let spacing = world_size / last as f32;

    let mut normals = Vec::with_capacity(resolution * resolution * 3);
    for z in 0..resolution {
        for x in 0..resolution {
            let normal = vertex_normal(heightmap, x, z, last, spacing, world_size);
            normals.extend_from_slice(&normal.to_array());
        }
    }

    Ok(normals)
}

fn vertex_normal(
    heightmap: &Heightmap,
    x: usize,
    z: usize,
    last: usize,
    spacing: f32,
    world_size: f32,
) -> Vec3 {
    let (xi, zi) = (x as isize, z as isize);

    let h_left = heightmap.get_clamped(xi - 1, zi) * world_size;
    let h_right = heightmap.get_clamped(xi + 1, zi) * world_size;
    let h_back = heightmap.get_clamped(xi, zi - 1) * world_size;
    let h_front = heightmap.get_clamped(xi, zi + 1) * world_size;

    let dx_scale = if x == 0 || x == last { 1.0 } else { 2.0 };
    let dz_scale = if z == 0 || z == last { 1.0 } else { 2.0 };

    let tangent_x = Vec3::new(spacing * dx_scale, h_right - h_left, 0.0);
    let tangent_z = Vec3::new(0.0, h_front - h_back, spacing * dz_scale);

    // Z x X keeps the normal on the same side as the counter-clockwise faces
    let normal = tangent_z.cross(tangent_x);
    let length = normal.length();
    if length > 0.0 && length.is_finite() {
        normal / length
    } else {
        Vec3::Y
    }
}
