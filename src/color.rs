//! RGBA color with 32-bit packed encoding for compact vertex storage.
//!
//! Vertex tint colors are stored as a single `f32` whose bit pattern is a
//! packed RGBA value (R in the lowest byte, A in the highest). The top bit of
//! the alpha byte is masked off so the bit pattern can never form a signaling
//! NaN on upload; the vertex shader compensates by rescaling alpha by 255/254.

/// An RGBA color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Mask clearing the top alpha bit of a packed color, keeping the float
/// bit pattern out of NaN space.
const PACKED_ALPHA_MASK: u32 = 0xfeff_ffff;

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Pack into an RGBA8888 value: R in the lowest byte, A in the highest.
    pub fn to_bits(self) -> u32 {
        let r = (self.r.clamp(0.0, 1.0) * 255.0) as u32;
        let g = (self.g.clamp(0.0, 1.0) * 255.0) as u32;
        let b = (self.b.clamp(0.0, 1.0) * 255.0) as u32;
        let a = (self.a.clamp(0.0, 1.0) * 255.0) as u32;
        (a << 24) | (b << 16) | (g << 8) | r
    }

    /// Unpack from an RGBA8888 value.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            r: (bits & 0xff) as f32 / 255.0,
            g: ((bits >> 8) & 0xff) as f32 / 255.0,
            b: ((bits >> 16) & 0xff) as f32 / 255.0,
            a: ((bits >> 24) & 0xff) as f32 / 255.0,
        }
    }

    /// Pack into the float-bits form stored per vertex. The top alpha bit is
    /// masked off, so round-tripping loses one bit of alpha precision.
    pub fn to_packed_float(self) -> f32 {
        f32::from_bits(self.to_bits() & PACKED_ALPHA_MASK)
    }

    /// Unpack from the float-bits vertex form.
    pub fn from_packed_float(packed: f32) -> Self {
        Self::from_bits(packed.to_bits())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
