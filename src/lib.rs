//! Polygon Batch - a dynamic geometry batching engine for 2D rendering
//!
//! Accumulates two-color tinted, textured polygon geometry into
//! fixed-capacity vertex and index buffers and flushes to the graphics
//! device as few indexed draws as possible: a flush happens only when a
//! buffer would overflow, the bound texture changes, or render state that
//! affects pending geometry (matrices, shader, blending) is mutated.
//!
//! The engine is backend-agnostic: it drives the [`Device`], [`Shader`] and
//! [`Texture`] traits in [`backend`], so it runs unchanged over any graphics
//! API a backend implements them for.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = PolygonBatch::new(&mut device, 4096, 8192)?;
//! batch.set_projection_matrix(&mut device, camera_projection);
//!
//! batch.begin(&mut device)?;
//! batch.set_color(Color::WHITE);
//! batch.draw_region(&mut device, &texture, TextureRegion::default(), x, y, w, h)?;
//! batch.draw_vertices(&mut device, &texture, &mesh_vertices, &mesh_indices)?;
//! batch.end(&mut device)?;
//!
//! batch.dispose(&mut device);
//! ```

pub mod backend;
pub mod batch;
pub mod color;
pub mod error;
pub mod region;
pub mod shader;
pub mod vertex;

pub use backend::{
    BlendFactor, BlendFunction, BufferHandle, Device, Shader, Texture, TextureHandle,
};
pub use batch::PolygonBatch;
pub use color::Color;
pub use error::{BatchError, BatchResult};
pub use region::TextureRegion;
pub use vertex::{BatchVertex, QUAD_FLOATS, QUAD_INDICES, VERTEX_STRIDE};
