//! The polygon batch engine.
//!
//! [`PolygonBatch`] accumulates two-color tinted vertex and index data into
//! fixed-capacity buffers and flushes them to the device as one indexed draw
//! whenever capacity runs out or the bound texture changes. Batching is a
//! pure performance optimization: the geometry reaching the device is
//! identical to what per-primitive drawing would produce.

use glam::{Affine2, Mat4, Vec2};

use crate::backend::{
    BlendFactor, BlendFunction, BufferHandle, Device, Shader, Texture, TextureHandle,
};
use crate::color::Color;
use crate::error::{BatchError, BatchResult};
use crate::region::TextureRegion;
use crate::shader::{
    TWO_COLOR_FRAGMENT_SHADER, TWO_COLOR_VERTEX_SHADER, UNIFORM_PMA, UNIFORM_PROJ_TRANS,
    UNIFORM_TEXTURE,
};
use crate::vertex::{BatchVertex, QUAD_FLOATS, QUAD_INDICES, VERTEX_STRIDE};

/// Maximum vertices per batch; indices are signed 16-bit on the wire.
const MAX_VERTEX_COUNT: usize = 32767;

/// A dynamic geometry batch for 2D textured polygons with two-color tinting.
///
/// Usage follows a strict session bracket: [`begin`](Self::begin), any number
/// of draw calls, [`end`](Self::end). Draw calls outside a session, nested
/// `begin`s, and `end` without `begin` are caller bugs reported as
/// [`BatchError::InvalidState`].
///
/// The batch owns its CPU buffers, a GPU buffer pair and the default shader;
/// it never owns textures or a caller-supplied custom shader. Call
/// [`dispose`](Self::dispose) exactly once at end of life.
pub struct PolygonBatch {
    vertices: Vec<f32>,
    indices: Vec<u16>,
    max_vertex_floats: usize,
    max_indices: usize,
    buffers: BufferHandle,

    default_shader: Box<dyn Shader>,
    custom_shader: Option<Box<dyn Shader>>,

    projection: Mat4,
    transform: Mat4,
    combined: Mat4,

    last_texture: Option<TextureHandle>,
    inv_tex_width: f32,
    inv_tex_height: f32,

    drawing: bool,
    color: f32,
    dark_color: f32,
    blend_function: Option<BlendFunction>,
    blending_disabled: bool,
    premultiplied_alpha: bool,

    render_calls: u32,
    total_render_calls: u32,
    max_triangles_in_batch: usize,
}

impl std::fmt::Debug for PolygonBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonBatch")
            .field("max_vertex_floats", &self.max_vertex_floats)
            .field("max_indices", &self.max_indices)
            .field("buffers", &self.buffers)
            .field("drawing", &self.drawing)
            .field("render_calls", &self.render_calls)
            .finish_non_exhaustive()
    }
}

impl PolygonBatch {
    /// Create a batch sized for `max_vertices` vertices and
    /// `max_triangle_indices` indices.
    ///
    /// Compiles the default two-color shader and allocates the GPU buffer
    /// pair. Fails with [`BatchError::InvalidArgument`] if `max_vertices`
    /// exceeds 32767 and with [`BatchError::ShaderCompile`] if the default
    /// shader does not compile.
    pub fn new(
        device: &mut dyn Device,
        max_vertices: usize,
        max_triangle_indices: usize,
    ) -> BatchResult<Self> {
        if max_vertices > MAX_VERTEX_COUNT {
            return Err(BatchError::InvalidArgument { max_vertices });
        }

        let default_shader = device
            .compile_shader(TWO_COLOR_VERTEX_SHADER, TWO_COLOR_FRAGMENT_SHADER)
            .map_err(|log| BatchError::ShaderCompile { log })?;
        let buffers = device.create_buffers(max_vertices, max_triangle_indices);

        log::debug!(
            "created polygon batch: {} vertices, {} indices",
            max_vertices,
            max_triangle_indices
        );

        Ok(Self {
            vertices: Vec::with_capacity(max_vertices * VERTEX_STRIDE),
            indices: Vec::with_capacity(max_triangle_indices),
            max_vertex_floats: max_vertices * VERTEX_STRIDE,
            max_indices: max_triangle_indices,
            buffers,
            default_shader,
            custom_shader: None,
            projection: Mat4::IDENTITY,
            transform: Mat4::IDENTITY,
            combined: Mat4::IDENTITY,
            last_texture: None,
            inv_tex_width: 0.0,
            inv_tex_height: 0.0,
            drawing: false,
            color: Color::WHITE.to_packed_float(),
            dark_color: Color::TRANSPARENT.to_packed_float(),
            blend_function: Some(BlendFunction::ALPHA),
            blending_disabled: false,
            premultiplied_alpha: false,
            render_calls: 0,
            total_render_calls: 0,
            max_triangles_in_batch: 0,
        })
    }

    // ------------------------------------------------------------------
    // Session control
    // ------------------------------------------------------------------

    /// Start a draw session.
    pub fn begin(&mut self, device: &mut dyn Device) -> BatchResult<()> {
        if self.drawing {
            return Err(BatchError::InvalidState("end must be called before begin"));
        }
        self.render_calls = 0;
        device.set_depth_mask(false);
        self.active_shader().begin();
        self.setup_uniforms();
        self.drawing = true;
        Ok(())
    }

    /// End the current draw session, flushing any pending geometry.
    pub fn end(&mut self, device: &mut dyn Device) -> BatchResult<()> {
        if !self.drawing {
            return Err(BatchError::InvalidState("begin must be called before end"));
        }
        self.flush_pending(device);
        self.last_texture = None;
        self.drawing = false;
        device.set_depth_mask(true);
        if self.is_blending_enabled() {
            device.disable_blending();
        }
        self.active_shader().end();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Geometry submission
    // ------------------------------------------------------------------

    /// Draw an axis-aligned quad sampling `region` of `texture`.
    pub fn draw_region(
        &mut self,
        device: &mut dyn Device,
        texture: &dyn Texture,
        region: TextureRegion,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> BatchResult<()> {
        self.prepare_quad(device, texture)?;

        let x2 = x + width;
        let y2 = y + height;
        // Bottom row samples v2, top row samples v.
        let (u, v, u2, v2) = (region.u, region.v2, region.u2, region.v);

        self.push_vertex(x, y, u, v);
        self.push_vertex(x, y2, u, v2);
        self.push_vertex(x2, y2, u2, v2);
        self.push_vertex(x2, y, u2, v);
        Ok(())
    }

    /// Draw a `width` x `height` quad sampling `region` of `texture`, with
    /// corners run through an affine transform.
    pub fn draw_region_transformed(
        &mut self,
        device: &mut dyn Device,
        texture: &dyn Texture,
        region: TextureRegion,
        width: f32,
        height: f32,
        transform: &Affine2,
    ) -> BatchResult<()> {
        self.prepare_quad(device, texture)?;

        let p1 = transform.transform_point2(Vec2::ZERO);
        let p2 = transform.transform_point2(Vec2::new(0.0, height));
        let p3 = transform.transform_point2(Vec2::new(width, height));
        let p4 = transform.transform_point2(Vec2::new(width, 0.0));
        let (u, v, u2, v2) = (region.u, region.v2, region.u2, region.v);

        self.push_vertex(p1.x, p1.y, u, v);
        self.push_vertex(p2.x, p2.y, u, v2);
        self.push_vertex(p3.x, p3.y, u2, v2);
        self.push_vertex(p4.x, p4.y, u2, v);
        Ok(())
    }

    /// Draw a pre-triangulated mesh.
    ///
    /// `vertices` is a span of whole [`VERTEX_STRIDE`]-float vertices;
    /// `indices` are local to that span, with values in
    /// `[0, vertices.len() / VERTEX_STRIDE)`. Every index is rebased onto the
    /// batch's current vertex cursor before being appended.
    pub fn draw_vertices(
        &mut self,
        device: &mut dyn Device,
        texture: &dyn Texture,
        vertices: &[f32],
        indices: &[u16],
    ) -> BatchResult<()> {
        if !self.drawing {
            return Err(BatchError::InvalidState(
                "begin must be called before draw",
            ));
        }
        debug_assert_eq!(vertices.len() % VERTEX_STRIDE, 0);

        if self.last_texture != Some(texture.handle()) {
            self.switch_texture(device, texture);
        } else if self.indices.len() + indices.len() > self.max_indices
            || self.vertices.len() + vertices.len() > self.max_vertex_floats
        {
            self.flush_pending(device);
        }

        let start_vertex = (self.vertices.len() / VERTEX_STRIDE) as u16;
        self.indices
            .extend(indices.iter().map(|&index| index + start_vertex));
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    /// Draw a span of consecutive 4-vertex quads, synthesizing the
    /// (0,1,2),(2,3,0) index template for each.
    ///
    /// `vertices` must hold a whole number of quads
    /// ([`QUAD_FLOATS`] floats each).
    pub fn draw_sprites(
        &mut self,
        device: &mut dyn Device,
        texture: &dyn Texture,
        vertices: &[f32],
    ) -> BatchResult<()> {
        if !self.drawing {
            return Err(BatchError::InvalidState(
                "begin must be called before draw",
            ));
        }
        debug_assert_eq!(vertices.len() % QUAD_FLOATS, 0);
        let index_count = vertices.len() / QUAD_FLOATS * QUAD_INDICES;

        if self.last_texture != Some(texture.handle()) {
            self.switch_texture(device, texture);
        } else if self.indices.len() + index_count > self.max_indices
            || self.vertices.len() + vertices.len() > self.max_vertex_floats
        {
            self.flush_pending(device);
        }

        let mut vertex = (self.vertices.len() / VERTEX_STRIDE) as u16;
        for _ in 0..vertices.len() / QUAD_FLOATS {
            self.indices.extend_from_slice(&[
                vertex,
                vertex + 1,
                vertex + 2,
                vertex + 2,
                vertex + 3,
                vertex,
            ]);
            vertex += 4;
        }
        self.vertices.extend_from_slice(vertices);
        Ok(())
    }

    /// Legacy overload parameterized by origin/scale/rotation. Deliberately
    /// not implemented; use [`draw_region_transformed`](Self::draw_region_transformed).
    pub fn draw_scaled_rotated(
        &mut self,
        _texture: &dyn Texture,
        _region: TextureRegion,
        _origin: Vec2,
        _scale: Vec2,
        _rotation: f32,
    ) -> BatchResult<()> {
        Err(BatchError::Unsupported(
            "rotation/scale draw parameters; use draw_region_transformed",
        ))
    }

    /// Legacy overload parameterized by axis-flip flags. Deliberately not
    /// implemented; flip the [`TextureRegion`] coordinates instead.
    pub fn draw_flipped(
        &mut self,
        _texture: &dyn Texture,
        _region: TextureRegion,
        _flip_x: bool,
        _flip_y: bool,
    ) -> BatchResult<()> {
        Err(BatchError::Unsupported(
            "flip draw parameters; swap the region's texture coordinates",
        ))
    }

    // ------------------------------------------------------------------
    // Flush
    // ------------------------------------------------------------------

    /// Flush pending geometry to the device.
    ///
    /// No device calls are made and no counters change when nothing is
    /// pending.
    pub fn flush(&mut self, device: &mut dyn Device) -> BatchResult<()> {
        if !self.drawing {
            return Err(BatchError::InvalidState(
                "begin must be called before flush",
            ));
        }
        self.flush_pending(device);
        Ok(())
    }

    fn flush_pending(&mut self, device: &mut dyn Device) {
        if self.vertices.is_empty() {
            return;
        }

        self.render_calls += 1;
        self.total_render_calls += 1;
        let indices_in_batch = self.indices.len();
        if indices_in_batch > self.max_triangles_in_batch {
            self.max_triangles_in_batch = indices_in_batch;
        }

        log::trace!(
            "flush: {} vertices, {} indices",
            self.vertices.len() / VERTEX_STRIDE,
            indices_in_batch
        );

        if let Some(texture) = self.last_texture {
            device.bind_texture(texture, 0);
        }
        device.upload_vertices(self.buffers, &self.vertices);
        device.upload_indices(self.buffers, &self.indices);

        if self.blending_disabled {
            device.disable_blending();
        } else {
            device.enable_blending();
            if let Some(function) = self.blend_function {
                device.set_blend_function(function);
            }
        }

        device.draw_indexed(self.buffers, indices_in_batch);

        self.vertices.clear();
        self.indices.clear();
    }

    // ------------------------------------------------------------------
    // State mutation with flush-on-change semantics
    // ------------------------------------------------------------------

    /// Set the projection matrix. Flushes pending geometry first when
    /// drawing.
    pub fn set_projection_matrix(&mut self, device: &mut dyn Device, projection: Mat4) {
        if self.drawing {
            self.flush_pending(device);
        }
        self.projection = projection;
        if self.drawing {
            self.setup_uniforms();
        }
    }

    /// Set the transform matrix. Flushes pending geometry first when
    /// drawing.
    pub fn set_transform_matrix(&mut self, device: &mut dyn Device, transform: Mat4) {
        if self.drawing {
            self.flush_pending(device);
        }
        self.transform = transform;
        if self.drawing {
            self.setup_uniforms();
        }
    }

    /// Declare whether texture colors have premultiplied alpha. Required for
    /// correct dark-color tinting; does not change the blend function.
    /// No-op when the value is unchanged; otherwise flushes when drawing.
    pub fn set_premultiplied_alpha(&mut self, device: &mut dyn Device, premultiplied_alpha: bool) {
        if self.premultiplied_alpha == premultiplied_alpha {
            return;
        }
        if self.drawing {
            self.flush_pending(device);
        }
        self.premultiplied_alpha = premultiplied_alpha;
        if self.drawing {
            self.setup_uniforms();
        }
    }

    /// Set the same blend factors for color and alpha channels.
    pub fn set_blend_function(&mut self, device: &mut dyn Device, src: BlendFactor, dst: BlendFactor) {
        self.set_blend_function_separate(device, Some(BlendFunction::uniform(src, dst)));
    }

    /// Set separate blend factors for color and alpha channels. `None`
    /// leaves the device's factors untouched on flush. No-op when the value
    /// is unchanged; otherwise flushes pending geometry before the change
    /// takes effect.
    pub fn set_blend_function_separate(
        &mut self,
        device: &mut dyn Device,
        function: Option<BlendFunction>,
    ) {
        if self.blend_function == function {
            return;
        }
        self.flush_pending(device);
        self.blend_function = function;
    }

    /// Enable blending. Always flushes pending geometry first.
    pub fn enable_blending(&mut self, device: &mut dyn Device) {
        self.flush_pending(device);
        self.blending_disabled = false;
    }

    /// Disable blending. Always flushes pending geometry first.
    pub fn disable_blending(&mut self, device: &mut dyn Device) {
        self.flush_pending(device);
        self.blending_disabled = true;
    }

    /// Install or clear a custom shader, returning the previously installed
    /// one so the caller keeps ownership.
    ///
    /// When drawing, pending geometry is flushed and the outgoing shader is
    /// deactivated before the incoming one is activated and re-uniformed.
    pub fn set_shader(
        &mut self,
        device: &mut dyn Device,
        shader: Option<Box<dyn Shader>>,
    ) -> Option<Box<dyn Shader>> {
        if self.drawing {
            self.flush_pending(device);
            self.active_shader().end();
        }
        let previous = std::mem::replace(&mut self.custom_shader, shader);
        if self.drawing {
            self.active_shader().begin();
            self.setup_uniforms();
        }
        previous
    }

    // ------------------------------------------------------------------
    // Tint colors
    // ------------------------------------------------------------------

    /// Set the light tint applied to subsequently submitted vertices.
    pub fn set_color(&mut self, color: Color) {
        self.color = color.to_packed_float();
    }

    /// Set the light tint from RGBA components.
    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = Color::new(r, g, b, a).to_packed_float();
    }

    /// Set the light tint from an already packed value.
    pub fn set_packed_color(&mut self, packed: f32) {
        self.color = packed;
    }

    pub fn color(&self) -> Color {
        Color::from_packed_float(self.color)
    }

    pub fn packed_color(&self) -> f32 {
        self.color
    }

    /// Set the dark tint applied to subsequently submitted vertices.
    pub fn set_dark_color(&mut self, color: Color) {
        self.dark_color = color.to_packed_float();
    }

    /// Set the dark tint from an already packed value.
    pub fn set_packed_dark_color(&mut self, packed: f32) {
        self.dark_color = packed;
    }

    pub fn dark_color(&self) -> Color {
        Color::from_packed_float(self.dark_color)
    }

    pub fn packed_dark_color(&self) -> f32 {
        self.dark_color
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn transform_matrix(&self) -> Mat4 {
        self.transform
    }

    pub fn blend_function(&self) -> Option<BlendFunction> {
        self.blend_function
    }

    /// The shader draws currently go through: the custom shader if one is
    /// installed, else the default two-color shader.
    pub fn shader(&self) -> &dyn Shader {
        match &self.custom_shader {
            Some(shader) => shader.as_ref(),
            None => self.default_shader.as_ref(),
        }
    }

    pub fn premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    pub fn is_blending_enabled(&self) -> bool {
        !self.blending_disabled
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Render calls issued since the last [`begin`](Self::begin).
    pub fn render_calls(&self) -> u32 {
        self.render_calls
    }

    /// Render calls issued over the batch's lifetime.
    pub fn total_render_calls(&self) -> u32 {
        self.total_render_calls
    }

    /// High-water mark of indices flushed in a single render call.
    pub fn max_triangles_in_batch(&self) -> usize {
        self.max_triangles_in_batch
    }

    /// Reciprocals of the last-bound texture's dimensions, refreshed on each
    /// texture switch. Zero before the first switch.
    pub fn inv_tex_size(&self) -> (f32, f32) {
        (self.inv_tex_width, self.inv_tex_height)
    }

    // ------------------------------------------------------------------
    // Disposal
    // ------------------------------------------------------------------

    /// Release the GPU buffer pair and the default shader. Consumes the
    /// batch, so disposal happens exactly once. A custom shader installed
    /// via [`set_shader`](Self::set_shader) is caller-owned and is not
    /// disposed; retrieve it beforehand if it must outlive the batch.
    pub fn dispose(mut self, device: &mut dyn Device) {
        if self.drawing {
            log::warn!("disposing a polygon batch with an open draw session");
        }
        self.default_shader.dispose();
        device.destroy_buffers(self.buffers);
        log::debug!("disposed polygon batch");
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn active_shader(&mut self) -> &mut dyn Shader {
        match &mut self.custom_shader {
            Some(shader) => shader.as_mut(),
            None => self.default_shader.as_mut(),
        }
    }

    fn setup_uniforms(&mut self) {
        self.combined = self.projection * self.transform;
        let combined = self.combined;
        let pma = if self.premultiplied_alpha { 1.0 } else { 0.0 };
        let shader = self.active_shader();
        shader.set_uniform_mat4(UNIFORM_PROJ_TRANS, &combined);
        shader.set_uniform_f32(UNIFORM_PMA, pma);
        shader.set_uniform_sampler(UNIFORM_TEXTURE, 0);
    }

    /// Flush-or-switch check shared by the quad paths, then append the
    /// rebased two-triangle index template.
    fn prepare_quad(&mut self, device: &mut dyn Device, texture: &dyn Texture) -> BatchResult<()> {
        if !self.drawing {
            return Err(BatchError::InvalidState(
                "begin must be called before draw",
            ));
        }

        if self.last_texture != Some(texture.handle()) {
            // A fresh flush empties both buffers, so no capacity check is
            // needed after a switch.
            self.switch_texture(device, texture);
        } else if self.indices.len() + QUAD_INDICES > self.max_indices
            || self.vertices.len() + QUAD_FLOATS > self.max_vertex_floats
        {
            self.flush_pending(device);
        }

        let start_vertex = (self.vertices.len() / VERTEX_STRIDE) as u16;
        self.indices.extend_from_slice(&[
            start_vertex,
            start_vertex + 1,
            start_vertex + 2,
            start_vertex + 2,
            start_vertex + 3,
            start_vertex,
        ]);
        Ok(())
    }

    fn switch_texture(&mut self, device: &mut dyn Device, texture: &dyn Texture) {
        self.flush_pending(device);
        self.last_texture = Some(texture.handle());
        self.inv_tex_width = 1.0 / texture.width() as f32;
        self.inv_tex_height = 1.0 / texture.height() as f32;
    }

    #[inline]
    fn push_vertex(&mut self, x: f32, y: f32, u: f32, v: f32) {
        let vertex = BatchVertex {
            position: [x, y],
            light: self.color,
            dark: self.dark_color,
            texcoord: [u, v],
        };
        self.vertices
            .extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(&vertex)));
    }
}
