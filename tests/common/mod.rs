//! Shared test doubles: a device that records every call it receives.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;

use polygon_batch::{
    BlendFunction, BufferHandle, Device, Shader, Texture, TextureHandle, VERTEX_STRIDE,
};

/// One recorded device or shader call.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CreateBuffers { max_vertices: usize, max_indices: usize },
    DestroyBuffers,
    EnableBlending,
    DisableBlending,
    SetBlendFunction(BlendFunction),
    SetDepthMask(bool),
    BindTexture { texture: TextureHandle, unit: u32 },
    UploadVertices(Vec<f32>),
    UploadIndices(Vec<u16>),
    DrawIndexed { index_count: usize },
    ShaderBegin,
    ShaderEnd,
    ShaderUniformMat4(String, Mat4),
    ShaderUniformF32(String, f32),
    ShaderUniformSampler(String, i32),
    ShaderDispose,
}

/// A [`Device`] that records every call, including calls made through the
/// shaders it compiles. Shaders share the device's event log so cross-object
/// ordering is observable.
pub struct RecordingDevice {
    events: Rc<RefCell<Vec<Event>>>,
    next_buffer: u64,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            next_buffer: 1,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&mut self) {
        self.events.borrow_mut().clear();
    }

    /// Number of indexed draws issued so far.
    pub fn draw_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, Event::DrawIndexed { .. }))
            .count()
    }

    /// Index counts of every issued draw, in order.
    pub fn draw_sizes(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::DrawIndexed { index_count } => Some(*index_count),
                _ => None,
            })
            .collect()
    }

    /// Every uploaded index span, in order.
    pub fn index_uploads(&self) -> Vec<Vec<u16>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::UploadIndices(indices) => Some(indices.clone()),
                _ => None,
            })
            .collect()
    }

    /// Dereference every issued draw into its flat vertex stream: for each
    /// draw, each index is resolved against the vertex upload preceding it.
    /// Two runs render identical geometry iff their resolved streams are
    /// identical, regardless of how the runs were batched.
    pub fn resolved_geometry(&self) -> Vec<f32> {
        let events = self.events.borrow();
        let mut geometry = Vec::new();
        let mut last_vertices: Option<&Vec<f32>> = None;
        let mut last_indices: Option<&Vec<u16>> = None;
        for event in events.iter() {
            match event {
                Event::UploadVertices(vertices) => last_vertices = Some(vertices),
                Event::UploadIndices(indices) => last_indices = Some(indices),
                Event::DrawIndexed { index_count } => {
                    let vertices = last_vertices.expect("draw without a vertex upload");
                    let indices = last_indices.expect("draw without an index upload");
                    for &index in &indices[..*index_count] {
                        let base = index as usize * VERTEX_STRIDE;
                        geometry.extend_from_slice(&vertices[base..base + VERTEX_STRIDE]);
                    }
                }
                _ => {}
            }
        }
        geometry
    }
}

impl Device for RecordingDevice {
    fn create_buffers(&mut self, max_vertices: usize, max_indices: usize) -> BufferHandle {
        self.events.borrow_mut().push(Event::CreateBuffers {
            max_vertices,
            max_indices,
        });
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        handle
    }

    fn destroy_buffers(&mut self, _buffers: BufferHandle) {
        self.events.borrow_mut().push(Event::DestroyBuffers);
    }

    fn compile_shader(
        &mut self,
        _vertex_src: &str,
        _fragment_src: &str,
    ) -> Result<Box<dyn Shader>, String> {
        Ok(Box::new(RecordingShader {
            events: Rc::clone(&self.events),
        }))
    }

    fn enable_blending(&mut self) {
        self.events.borrow_mut().push(Event::EnableBlending);
    }

    fn disable_blending(&mut self) {
        self.events.borrow_mut().push(Event::DisableBlending);
    }

    fn set_blend_function(&mut self, function: BlendFunction) {
        self.events
            .borrow_mut()
            .push(Event::SetBlendFunction(function));
    }

    fn set_depth_mask(&mut self, enabled: bool) {
        self.events.borrow_mut().push(Event::SetDepthMask(enabled));
    }

    fn bind_texture(&mut self, texture: TextureHandle, unit: u32) {
        self.events
            .borrow_mut()
            .push(Event::BindTexture { texture, unit });
    }

    fn upload_vertices(&mut self, _buffers: BufferHandle, vertices: &[f32]) {
        self.events
            .borrow_mut()
            .push(Event::UploadVertices(vertices.to_vec()));
    }

    fn upload_indices(&mut self, _buffers: BufferHandle, indices: &[u16]) {
        self.events
            .borrow_mut()
            .push(Event::UploadIndices(indices.to_vec()));
    }

    fn draw_indexed(&mut self, _buffers: BufferHandle, index_count: usize) {
        self.events
            .borrow_mut()
            .push(Event::DrawIndexed { index_count });
    }
}

/// A [`Shader`] recording into its device's shared event log.
pub struct RecordingShader {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Shader for RecordingShader {
    fn begin(&mut self) {
        self.events.borrow_mut().push(Event::ShaderBegin);
    }

    fn end(&mut self) {
        self.events.borrow_mut().push(Event::ShaderEnd);
    }

    fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
        self.events
            .borrow_mut()
            .push(Event::ShaderUniformMat4(name.to_string(), *value));
    }

    fn set_uniform_f32(&mut self, name: &str, value: f32) {
        self.events
            .borrow_mut()
            .push(Event::ShaderUniformF32(name.to_string(), value));
    }

    fn set_uniform_sampler(&mut self, name: &str, unit: i32) {
        self.events
            .borrow_mut()
            .push(Event::ShaderUniformSampler(name.to_string(), unit));
    }

    fn dispose(&mut self) {
        self.events.borrow_mut().push(Event::ShaderDispose);
    }
}

/// A texture identified by a bare handle.
pub struct TestTexture {
    handle: u64,
    width: u32,
    height: u32,
}

impl TestTexture {
    pub fn new(handle: u64, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }
}

impl Texture for TestTexture {
    fn handle(&self) -> TextureHandle {
        TextureHandle(self.handle)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
