//! Batch vertex layout.

use bytemuck::{Pod, Zeroable};

/// Floats per vertex: position (2), packed light color (1), packed dark
/// color (1), texture coordinates (2). All cursor arithmetic in the batch
/// divides by this stride.
pub const VERTEX_STRIDE: usize = 6;

/// Floats occupied by one 4-vertex quad.
pub const QUAD_FLOATS: usize = 4 * VERTEX_STRIDE;

/// Indices emitted per quad: two triangles, (0,1,2) and (2,3,0).
pub const QUAD_INDICES: usize = 6;

/// A two-color tinted vertex.
///
/// Both tint colors are RGBA values bit-packed into a single float
/// (see [`Color::to_packed_float`](crate::Color::to_packed_float)). The dark
/// color's alpha channel is unused by the shader but keeps the two color
/// attributes packed uniformly as 4-byte values.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BatchVertex {
    pub position: [f32; 2],
    pub light: f32,
    pub dark: f32,
    pub texcoord: [f32; 2],
}
