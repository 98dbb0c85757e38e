//! Error types for terrain synthesis, configuration and export.

/// Errors produced at the boundary of the terrain pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A configuration value is out of its allowed range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The heightmap data does not match its declared resolution.
    #[error("heightmap of resolution {resolution} needs {expected} values, got {actual}")]
    HeightmapSize {
        resolution: usize,
        expected: usize,
        actual: usize,
    },

    /// The heightmap holds a NaN or infinite sample.
    #[error("heightmap value at index {index} is not finite ({value})")]
    NonFiniteHeight { index: usize, value: f32 },

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode or encode an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Failed to serialize configuration to TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The glTF builder refused to write the mesh.
    #[error("failed to export mesh: {0}")]
    Export(String),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::invalid(name, format!("must be finite and > 0, got {}", value)))
    }
}

/// Reject values outside the closed interval `[min, max]` (NaN included).
pub(crate) fn ensure_in_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(TerrainError::invalid(
            name,
            format!("must be within [{}, {}], got {}", min, max, value),
        ))
    }
}

/// Resolutions below 2 make the grid spacing divide by zero, and every
/// vertex must stay addressable by a `u32` index.
pub(crate) fn ensure_resolution(resolution: usize) -> Result<()> {
    if resolution < 2 {
        return Err(TerrainError::invalid(
            "resolution",
            format!("must be at least 2, got {}", resolution),
        ));
    }

    match resolution.checked_mul(resolution) {
        Some(vertices) if vertices - 1 <= u32::MAX as usize => Ok(()),
        _ => Err(TerrainError::invalid(
            "resolution",
            format!("{} x {} vertices do not fit u32 indices", resolution, resolution),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("x", 0.5).is_ok());
        assert!(ensure_positive("x", 0.0).is_err());
        assert!(ensure_positive("x", -1.0).is_err());
        assert!(ensure_positive("x", f64::NAN).is_err());
        assert!(ensure_positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_ensure_in_range() {
        assert!(ensure_in_range("p", 1.0, 0.0, 1.0).is_ok());
        assert!(ensure_in_range("p", 1.5, 0.0, 1.0).is_err());
        assert!(ensure_in_range("p", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = ensure_resolution(1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("resolution"), "unexpected message: {}", message);
        assert!(message.contains("at least 2"));
    }

    #[test]
    fn test_ensure_resolution_fits_u32_indices() {
        assert!(ensure_resolution(2).is_ok());
        assert!(ensure_resolution(65_536).is_ok());
        assert!(ensure_resolution(65_537).is_err());
        assert!(ensure_resolution(usize::MAX).is_err());
    }
}
