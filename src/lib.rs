//! Procedural terrain synthesis
//!
//! A deterministic pipeline from a noise seed to renderable terrain:
//! permutation table, gradient noise, fractal composition, heightmap,
//! mesh buffers and vertex normals. Alongside it, height/slope texture
//! splatting and luminance-derived normal maps for the terrain textures.
//!
//! Every function is a pure computation over caller-owned values; nothing
//! is cached between calls.

pub mod config;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod mesh;
pub mod noise;
pub mod normal_map;
pub mod normals;
pub mod permutation;
pub mod splat;

pub use config::{
    NoiseParameters, RenderSettings, TerrainConfig, TerrainParameters, TextureSlot, TextureSlots,
};
pub use error::{Result, TerrainError};
pub use heightmap::{synthesize_heightmap, Heightmap};
pub use mesh::{
    assemble_geometry, build_mesh_buffers, generate_terrain, GeometryBuffers, MeshBuffers, Terrain,
};
pub use noise::{fbm, gradient_noise_2d};
pub use normal_map::derive_normal_map;
pub use normals::estimate_normals;
pub use permutation::PermutationTable;
pub use splat::{calculate_slope, compute_splat_weights, SplatWeight};
