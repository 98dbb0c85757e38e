//! Terrain mesh buffers built from a heightmap.
//!
//! The grid is centered on the origin in X/Z and spans `world_size` along
//! both axes. Heights are scaled by the same `world_size`.

use crate::config::TerrainParameters;
use crate::error::{ensure_positive, ensure_resolution, Result};
use crate::heightmap::{synthesize_heightmap, Heightmap};
use crate::normals::estimate_normals;

/// Positions, UVs and triangle indices of a terrain grid
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    /// `[x, y, z]` per vertex
    pub positions: Vec<f32>,
    /// `[u, v]` per vertex
    pub uvs: Vec<f32>,
    /// Three indices per counter-clockwise triangle
    pub indices: Vec<u32>,
}

/// Everything a renderer needs to draw the terrain
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffers {
    pub positions: Vec<f32>,
    /// Unit normal `[x, y, z]` per vertex
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A synthesized heightmap together with the geometry built from it
#[derive(Debug, Clone)]
pub struct Terrain {
    pub heightmap: Heightmap,
    pub geometry: GeometryBuffers,
    pub world_size: f32,
}

/// Build vertex positions
///
/// # Arguments
/// * `heightmap` - Source heights in [0, 1]
/// * `world_size` - Horizontal extent and height scale
///
/// # Returns
/// * `Result<Vec<f32>>` - `[x, y, z]` per vertex, row-major like the heightmap
pub fn build_positions(heightmap: &Heightmap, world_size: f32) -> Result<Vec<f32>> {
    ensure_positive("world_size", world_size as f64)?;

    let resolution = heightmap.resolution();
    let half_size = world_size / 2.0;
    let spacing = world_size / (resolution - 1) as f32;

    let mut positions = Vec::with_capacity(resolution * resolution * 3);
    for (index, &height) in heightmap.values().iter().enumerate() {
        let x = index % resolution;
        let z = index / resolution;
        positions.push(-half_size + x as f32 * spacing);
        positions.push(height * world_size);
        positions.push(-half_size + z as f32 * spacing);
    }

    Ok(positions)
}

/// Build texture coordinates spanning [0, 1] across the grid
pub fn build_uvs(resolution: usize) -> Result<Vec<f32>> {
    ensure_resolution(resolution)?;

    let denominator = (resolution - 1) as f32;
    let mut uvs = Vec::with_capacity(resolution * resolution * 2);
    for z in 0..resolution {
        for x in 0..resolution {
            uvs.push(x as f32 / denominator);
            uvs.push(z as f32 / denominator);
        }
    }

    Ok(uvs)
}

/// Build triangle indices, two counter-clockwise triangles per grid cell
pub fn build_indices(resolution: usize) -> Result<Vec<u32>> {
    ensure_resolution(resolution)?;

    let quads_per_row = resolution - 1;
    let mut indices = Vec::with_capacity(quads_per_row * quads_per_row * 6);

    for z in 0..quads_per_row {
        for x in 0..quads_per_row {
            let top_left = (z * resolution + x) as u32;
            let top_right = (z * resolution + x + 1) as u32;
            let bottom_left = ((z + 1) * resolution + x) as u32;
            let bottom_right = ((z + 1) * resolution + x + 1) as u32;

            indices.extend_from_slice(&[top_left, bottom_left, bottom_right]);
            indices.extend_from_slice(&[top_left, bottom_right, top_right]);
        }
    }

    Ok(indices)
}

/// Build positions, UVs and indices for a heightmap
pub fn build_mesh_buffers(heightmap: &Heightmap, world_size: f32) -> Result<MeshBuffers> {
    let positions = build_positions(heightmap, world_size)?;
    let uvs = build_uvs(heightmap.resolution())?;
    let indices = build_indices(heightmap.resolution())?;

    Ok(MeshBuffers {
        positions,
        uvs,
        indices,
    })
}

/// Build the full geometry, normals included, for a heightmap
pub fn assemble_geometry(heightmap: &Heightmap, world_size: f32) -> Result<GeometryBuffers> {
    let MeshBuffers {
        positions,
        uvs,
        indices,
    } = build_mesh_buffers(heightmap, world_size)?;
    let normals = estimate_normals(heightmap, world_size)?;

    Ok(GeometryBuffers {
        positions,
        normals,
        uvs,
        indices,
    })
}

/// Synthesize a heightmap and build its geometry in one step
///
/// Every call recomputes from scratch; nothing is cached between calls.
pub fn generate_terrain(params: &TerrainParameters) -> Result<Terrain> {
    params.validate()?;

    let heightmap = synthesize_heightmap(params.resolution, &params.noise)?;
    let geometry = assemble_geometry(&heightmap, params.world_size)?;

    log::debug!(
        "built terrain mesh: {} vertices, {} triangles",
        geometry.vertex_count(),
        geometry.triangle_count()
    );

    Ok(Terrain {
        heightmap,
        geometry,
        world_size: params.world_size,
    })
}
