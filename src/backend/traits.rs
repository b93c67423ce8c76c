//! Core collaborator traits.
//!
//! These traits define the interface the batch engine consumes. A backend
//! implements [`Device`] over its graphics API; [`Shader`] and [`Texture`]
//! wrap the backend's program and texture objects.

use glam::Mat4;

use crate::backend::types::BlendFunction;

/// Handle to the GPU-side vertex/index buffer pair owned by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle identifying a texture.
///
/// The batch holds this as a weak, non-owning reference: equality of handles
/// drives texture-switch detection, and the handle is what gets bound before
/// each flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Graphics device collaborator.
///
/// All GPU state the batch touches is set through these verbs; the engine
/// keeps its own copy of that state in explicit fields and passes it by
/// reference rather than mutating global bindings.
pub trait Device {
    /// Allocate the GPU-side vertex/index buffer pair for a batch.
    fn create_buffers(&mut self, max_vertices: usize, max_indices: usize) -> BufferHandle;

    /// Release a buffer pair created by [`create_buffers`](Self::create_buffers).
    fn destroy_buffers(&mut self, buffers: BufferHandle);

    /// Compile a shader program from source. On failure returns the
    /// compiler's diagnostic log.
    fn compile_shader(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Box<dyn Shader>, String>;

    /// Enable the blend capability.
    fn enable_blending(&mut self);

    /// Disable the blend capability.
    fn disable_blending(&mut self);

    /// Set separate blend factors for the color and alpha channels.
    fn set_blend_function(&mut self, function: BlendFunction);

    /// Enable or disable depth-mask writes.
    fn set_depth_mask(&mut self, enabled: bool);

    /// Bind a texture to a texture unit.
    fn bind_texture(&mut self, texture: TextureHandle, unit: u32);

    /// Upload vertex data to the buffer pair.
    fn upload_vertices(&mut self, buffers: BufferHandle, vertices: &[f32]);

    /// Upload index data to the buffer pair.
    fn upload_indices(&mut self, buffers: BufferHandle, indices: &[u16]);

    /// Issue one indexed triangle-list draw for `index_count` indices.
    fn draw_indexed(&mut self, buffers: BufferHandle, index_count: usize);
}

/// Shader program collaborator.
pub trait Shader {
    /// Activate the program.
    fn begin(&mut self);

    /// Deactivate the program.
    fn end(&mut self);

    /// Set a named 4x4 matrix uniform.
    fn set_uniform_mat4(&mut self, name: &str, value: &Mat4);

    /// Set a named float uniform.
    fn set_uniform_f32(&mut self, name: &str, value: f32);

    /// Set a named sampler uniform to a texture unit index.
    fn set_uniform_sampler(&mut self, name: &str, unit: i32);

    /// Release the program's GPU resources.
    fn dispose(&mut self);
}

/// Texture collaborator.
pub trait Texture {
    /// Identity handle used for switch detection and binding.
    fn handle(&self) -> TextureHandle;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;
}
