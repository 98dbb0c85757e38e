//! Terrain, texture and render configuration.
//!
//! The whole configuration is one caller-held [`TerrainConfig`] value. It is
//! loaded from TOML, validated once at the boundary, and passed by reference
//! into the pure synthesis functions.

use std::ops::{Deref, Index, IndexMut};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_in_range, ensure_positive, ensure_resolution, Result, TerrainError};

/// Number of texture blend slots.
pub const SLOT_COUNT: usize = 3;

/// Parameters controlling the fractal noise used for the heightmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParameters {
    /// Seed for the permutation table
    pub seed: i64,
    /// Frequency of the first octave
    pub frequency: f64,
    /// Declared for the editor but never applied: fractal composition
    /// always starts each sample at amplitude 1.
    pub amplitude: f64,
    /// Number of octaves to sum (0 yields a flat 0.5 terrain)
    pub octaves: u32,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves, in (0, 1]
    pub persistence: f64,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        NoiseParameters {
            seed: 12345,
            frequency: 2.0,
            amplitude: 1.0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl NoiseParameters {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("frequency", self.frequency)?;
        ensure_positive("lacunarity", self.lacunarity)?;
        ensure_positive("persistence", self.persistence)?;
        ensure_in_range("persistence", self.persistence, 0.0, 1.0)?;
        if self.amplitude != 1.0 {
            log::warn!(
                "noise amplitude {} is ignored; fractal octaves always start at amplitude 1",
                self.amplitude
            );
        }
        Ok(())
    }
}

/// Size and sampling density of the terrain grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParameters {
    /// Edge length of the square terrain in world units; also the height scale
    pub world_size: f32,
    /// Vertices per edge
    pub resolution: usize,
    pub noise: NoiseParameters,
}

impl Default for TerrainParameters {
    fn default() -> Self {
        TerrainParameters {
            world_size: 100.0,
            resolution: 128,
            noise: NoiseParameters::default(),
        }
    }
}

impl TerrainParameters {
    pub fn validate(&self) -> Result<()> {
        ensure_resolution(self.resolution)?;
        ensure_positive("world_size", self.world_size as f64)?;
        self.noise.validate()
    }
}

/// One texture blend layer with its height and slope bands.
///
/// All ranges are normalized to `[0, 1]`. The weight calculator does not
/// check `start <= end`; [`TerrainConfig::validate`] does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    pub index: usize,
    pub name: String,
    /// Diffuse image; `None` leaves the slot untextured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse: Option<PathBuf>,
    /// Normal map image; `None` means derive one from the diffuse image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<PathBuf>,
    pub height_start: f32,
    pub height_end: f32,
    pub slope_start: f32,
    pub slope_end: f32,
    /// How much the slope band outweighs the height band
    pub slope_influence: f32,
}

impl TextureSlot {
    pub fn new(index: usize, name: &str) -> Self {
        TextureSlot {
            index,
            name: name.to_string(),
            diffuse: None,
            normal: None,
            height_start: 0.0,
            height_end: 1.0,
            slope_start: 0.0,
            slope_end: 1.0,
            slope_influence: 0.0,
        }
    }

    /// Set the height band
    pub fn with_height(mut self, start: f32, end: f32) -> Self {
        self.height_start = start;
        self.height_end = end;
        self
    }

    /// Set the slope band and its influence
    pub fn with_slope(mut self, start: f32, end: f32, influence: f32) -> Self {
        self.slope_start = start;
        self.slope_end = end;
        self.slope_influence = influence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name, value: f32| ensure_in_range(name, value as f64, 0.0, 1.0);
        unit("height_start", self.height_start)?;
        unit("height_end", self.height_end)?;
        unit("slope_start", self.slope_start)?;
        unit("slope_end", self.slope_end)?;
        unit("slope_influence", self.slope_influence)?;

        if self.height_start > self.height_end {
            return Err(TerrainError::invalid(
                "height_start",
                format!("slot `{}` starts above its end", self.name),
            ));
        }
        if self.slope_start > self.slope_end {
            return Err(TerrainError::invalid(
                "slope_start",
                format!("slot `{}` starts above its end", self.name),
            ));
        }
        Ok(())
    }
}

/// The three texture blend slots, addressed by slot index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureSlots([TextureSlot; SLOT_COUNT]);

impl TextureSlots {
    pub fn new(slots: [TextureSlot; SLOT_COUNT]) -> Self {
        TextureSlots(slots)
    }

    pub fn validate(&self) -> Result<()> {
        for (position, slot) in self.0.iter().enumerate() {
            if slot.index != position {
                return Err(TerrainError::invalid(
                    "index",
                    format!("slot `{}` at position {} has index {}", slot.name, position, slot.index),
                ));
            }
            slot.validate()?;
        }
        Ok(())
    }
}

impl Default for TextureSlots {
    fn default() -> Self {
        TextureSlots([
            TextureSlot::new(0, "Grass").with_height(0.0, 0.4).with_slope(0.7, 1.0, 0.3),
            TextureSlot::new(1, "Rock").with_height(0.3, 0.7).with_slope(0.4, 0.7, 0.7),
            TextureSlot::new(2, "Wood").with_height(0.6, 1.0).with_slope(0.8, 1.0, 0.2),
        ])
    }
}

impl Deref for TextureSlots {
    type Target = [TextureSlot];

    fn deref(&self) -> &[TextureSlot] {
        &self.0
    }
}

impl Index<usize> for TextureSlots {
    type Output = TextureSlot;

    fn index(&self, index: usize) -> &TextureSlot {
        &self.0[index]
    }
}

impl IndexMut<usize> for TextureSlots {
    fn index_mut(&mut self, index: usize) -> &mut TextureSlot {
        &mut self.0[index]
    }
}

/// Material toggles consumed by the renderer, not by the synthesis core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub triplanar_enabled: bool,
    /// 1-8, higher means a sharper blend between projection axes
    pub triplanar_sharpness: f32,
    pub height_blend_enabled: bool,
    pub height_blend_strength: f32,
    pub anti_tile_enabled: bool,
    pub wireframe: bool,
    /// UV tiling factor
    pub texture_scale: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            triplanar_enabled: true,
            triplanar_sharpness: 4.0,
            height_blend_enabled: true,
            height_blend_strength: 0.3,
            anti_tile_enabled: true,
            wireframe: false,
            texture_scale: 0.1,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        ensure_in_range("triplanar_sharpness", self.triplanar_sharpness as f64, 1.0, 8.0)?;
        ensure_in_range("height_blend_strength", self.height_blend_strength as f64, 0.0, 1.0)?;
        ensure_positive("texture_scale", self.texture_scale as f64)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub terrain: TerrainParameters,
    pub textures: TextureSlots,
    pub render: RenderSettings,
}

impl TerrainConfig {
    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: TerrainConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded terrain config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.textures.validate()?;
        self.render.validate()
    }
}
