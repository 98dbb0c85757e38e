//! Tangent-space normal maps derived from image luminance
//!
//! Treats the luminance of a diffuse texture as a height field and runs a
//! Sobel operator over it. Flat regions encode to (128, 128, 255).

use image::{Rgba, RgbaImage};

use crate::error::{Result, TerrainError};

/// Rec. 601 luminance of an RGB pixel
fn luminance(pixel: &Rgba<u8>) -> f64 {
    0.299 * pixel[0] as f64 + 0.587 * pixel[1] as f64 + 0.114 * pixel[2] as f64
}

/// Luminance at `(x, y)`, clamping coordinates to the image edges
fn luminance_clamped(image: &RgbaImage, x: i64, y: i64) -> f64 {
    let cx = x.clamp(0, image.width() as i64 - 1) as u32;
    let cy = y.clamp(0, image.height() as i64 - 1) as u32;
    luminance(image.get_pixel(cx, cy))
}

/// Encode a tangent-space normal vector to RGBA bytes
///
/// X and Y map from [-1, 1] to [0, 255]; Z is stored directly as
/// `z * 255` since it never points below the surface.
///
/// # Arguments
/// * `nx` - X component of normal vector (tangent direction)
/// * `ny` - Y component of normal vector (bitangent direction)
/// * `nz` - Z component of normal vector (surface normal)
///
/// # Returns
/// * `[u8; 4]` - RGBA bytes with RGB encoding normal, A=255
fn encode_tangent_normal(nx: f64, ny: f64, nz: f64) -> [u8; 4] {
    let length = (nx * nx + ny * ny + nz * nz).sqrt();
    let (nx, ny, nz) = if length > 0.0 {
        (nx / length, ny / length, nz / length)
    } else {
        (0.0, 0.0, 1.0)
    };

    let r = ((nx + 1.0) / 2.0 * 255.0).round().clamp(0.0, 255.0) as u8;
    let g = ((ny + 1.0) / 2.0 * 255.0).round().clamp(0.0, 255.0) as u8;
    let b = (nz * 255.0).round().clamp(0.0, 255.0) as u8;

    [r, g, b, 255]
}

/// Derive a normal map from the luminance of an image
///
/// # Arguments
/// * `source` - Any RGBA image; alpha is ignored
/// * `strength` - Gradient multiplier; 0 gives a flat map
///
/// # Returns
/// * `Result<RgbaImage>` - Normal map with the dimensions of `source`
pub fn derive_normal_map(source: &RgbaImage, strength: f32) -> Result<RgbaImage> {
    if !strength.is_finite() || strength < 0.0 {
        return Err(TerrainError::invalid(
            "strength",
            format!("must be finite and >= 0, got {}", strength),
        ));
    }

    let scale = strength as f64 / 255.0;
    let (width, height) = source.dimensions();
    let mut output = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let (xi, yi) = (x as i64, y as i64);
            let lum = |dx: i64, dy: i64| luminance_clamped(source, xi + dx, yi + dy);

            let tl = lum(-1, -1);
            let t = lum(0, -1);
            let tr = lum(1, -1);
            let l = lum(-1, 0);
            let r = lum(1, 0);
            let bl = lum(-1, 1);
            let b = lum(0, 1);
            let br = lum(1, 1);

            // Sobel kernels, written as pairwise differences: flat regions give exactly 0
            let gx = (tr - tl) + 2.0 * (r - l) + (br - bl);
            let gy = (bl - tl) + 2.0 * (b - t) + (br - tr);

            let pixel = encode_tangent_normal(-gx * scale, -gy * scale, 1.0);
            output.put_pixel(x, y, Rgba(pixel));
        }
    }

    log::debug!("derived {}x{} normal map (strength {})", width, height, strength);
    Ok(output)
}
