use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::RgbaImage;
use mesh_tools::GltfBuilder;
use mesh_tools::Triangle;

use crate::error::{Result, TerrainError};
use crate::heightmap::Heightmap;
use crate::mesh::GeometryBuffers;

/// Exports terrain geometry as a 3D mesh in GLB format
///
/// # Arguments
/// * `geometry` - Positions, normals, UVs and indices of the terrain
/// * `output_path` - Path where the GLB file will be saved
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn export_geometry_to_glb(geometry: &GeometryBuffers, output_path: &Path) -> Result<()> {
    let mut builder = GltfBuilder::new();

    let positions: Vec<_> = geometry
        .positions
        .chunks_exact(3)
        .map(|p| mesh_tools::compat::point3::new(p[0], p[1], p[2]))
        .collect();

    let normals: Vec<_> = geometry
        .normals
        .chunks_exact(3)
        .map(|n| mesh_tools::compat::vector3::new(n[0], n[1], n[2]))
        .collect();

    let texcoords: Vec<_> = geometry
        .uvs
        .chunks_exact(2)
        .map(|uv| mesh_tools::compat::vector2::new(uv[0], uv[1]))
        .collect();

    let triangles: Vec<_> = geometry
        .indices
        .chunks_exact(3)
        .map(|t| Triangle::new(t[0], t[1], t[2]))
        .collect();

    let mesh_index = builder.create_simple_mesh(
        Some("TerrainMesh".to_string()),
        &positions,
        &triangles,
        Some(normals),
        Some(texcoords),
        None, // No material
    );

    let node = builder.add_node(
        Some("Terrain".to_string()),
        Some(mesh_index),
        None, // Default position
        None, // Default rotation
        None, // Default scale
    );

    builder.add_scene(Some("Main Scene".to_string()), Some(vec![node]));

    builder
        .export_glb(&output_path.to_string_lossy())
        .map_err(|e| TerrainError::Export(e.to_string()))?;

    log::debug!(
        "wrote {} vertices / {} triangles to {}",
        positions.len(),
        triangles.len(),
        output_path.display()
    );
    Ok(())
}

/// Export a heightmap as a CSV grid, one row per line
///
/// A header comment records the grid dimensions. Exact 0 and 1 are
/// written as integers, everything else with three decimals.
pub fn export_heightmap_csv(heightmap: &Heightmap, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_heightmap_csv(heightmap, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_heightmap_csv<W: Write>(heightmap: &Heightmap, writer: &mut W) -> Result<()> {
    let resolution = heightmap.resolution();
    writeln!(writer, "# Grid dimensions: {} x {}", resolution, resolution)?;

    for row in heightmap.values().chunks(resolution) {
        let line = row
            .iter()
            .map(|&value| {
                if value == 0.0 || value == 1.0 {
                    format!("{}", value as i32)
                } else {
                    format!("{:.3}", value)
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
    }

    Ok(())
}

/// Dump heightmap samples as raw native-endian `f32`, row-major
pub fn export_heightmap_raw(heightmap: &Heightmap, output_path: &Path) -> Result<()> {
    let bytes: &[u8] = bytemuck::cast_slice(heightmap.values());
    std::fs::write(output_path, bytes)?;
    Ok(())
}

/// Load any supported image as RGBA
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}

/// Save an RGBA image; the format follows the file extension
pub fn save_image(image: &RgbaImage, output_path: &Path) -> Result<()> {
    image.save(output_path)?;
    Ok(())
}
