//! Texture sub-regions in normalized coordinates.

use crate::backend::Texture;

/// A rectangular sub-region of a texture, in normalized UV coordinates.
///
/// `(u, v)` is the top of the region and `(u2, v2)` the bottom: the batch
/// flips V vertically when emitting quad corners, so the bottom row of a quad
/// samples `v2` and the top row samples `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
}

impl TextureRegion {
    pub const fn new(u: f32, v: f32, u2: f32, v2: f32) -> Self {
        Self { u, v, u2, v2 }
    }

    /// Region from a pixel rectangle on the given texture.
    pub fn from_pixels(texture: &dyn Texture, x: u32, y: u32, width: u32, height: u32) -> Self {
        let inv_width = 1.0 / texture.width() as f32;
        let inv_height = 1.0 / texture.height() as f32;
        Self {
            u: x as f32 * inv_width,
            v: y as f32 * inv_height,
            u2: (x + width) as f32 * inv_width,
            v2: (y + height) as f32 * inv_height,
        }
    }
}

impl Default for TextureRegion {
    /// The full texture.
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}
