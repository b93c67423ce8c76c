//! Common types shared between backends.

/// Blend factor enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Separate source/destination blend factors for the color and alpha
/// channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendFunction {
    pub src_color: BlendFactor,
    pub dst_color: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl BlendFunction {
    /// Standard alpha blending.
    pub const ALPHA: Self = Self::uniform(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    /// Blending for premultiplied-alpha sources.
    pub const PREMULTIPLIED_ALPHA: Self =
        Self::uniform(BlendFactor::One, BlendFactor::OneMinusSrcAlpha);

    /// The same factors for color and alpha channels.
    pub const fn uniform(src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            src_color: src,
            dst_color: dst,
            src_alpha: src,
            dst_alpha: dst,
        }
    }

    pub const fn separate(
        src_color: BlendFactor,
        dst_color: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        Self {
            src_color,
            dst_color,
            src_alpha,
            dst_alpha,
        }
    }
}

impl Default for BlendFunction {
    fn default() -> Self {
        Self::ALPHA
    }
}
