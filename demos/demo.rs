//! Headless batching demo.
//!
//! Drives a [`PolygonBatch`] through a device that logs every call instead
//! of touching a GPU, then prints the batching statistics. Run with:
//!
//! ```bash
//! RUST_LOG=info cargo run --example demo
//! ```

use glam::Mat4;

use polygon_batch::{
    BlendFunction, BufferHandle, Color, Device, PolygonBatch, Shader, Texture, TextureHandle,
    TextureRegion,
};

/// A device that logs calls instead of submitting them to a GPU.
struct LogDevice {
    next_buffer: u64,
}

impl Device for LogDevice {
    fn create_buffers(&mut self, max_vertices: usize, max_indices: usize) -> BufferHandle {
        log::info!("create_buffers: {max_vertices} vertices, {max_indices} indices");
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        handle
    }

    fn destroy_buffers(&mut self, buffers: BufferHandle) {
        log::info!("destroy_buffers: {buffers:?}");
    }

    fn compile_shader(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Box<dyn Shader>, String> {
        log::info!(
            "compile_shader: {} + {} bytes of GLSL",
            vertex_src.len(),
            fragment_src.len()
        );
        Ok(Box::new(LogShader))
    }

    fn enable_blending(&mut self) {
        log::info!("enable_blending");
    }

    fn disable_blending(&mut self) {
        log::info!("disable_blending");
    }

    fn set_blend_function(&mut self, function: BlendFunction) {
        log::info!("set_blend_function: {function:?}");
    }

    fn set_depth_mask(&mut self, enabled: bool) {
        log::info!("set_depth_mask: {enabled}");
    }

    fn bind_texture(&mut self, texture: TextureHandle, unit: u32) {
        log::info!("bind_texture: {texture:?} to unit {unit}");
    }

    fn upload_vertices(&mut self, _buffers: BufferHandle, vertices: &[f32]) {
        log::info!("upload_vertices: {} floats", vertices.len());
    }

    fn upload_indices(&mut self, _buffers: BufferHandle, indices: &[u16]) {
        log::info!("upload_indices: {} indices", indices.len());
    }

    fn draw_indexed(&mut self, _buffers: BufferHandle, index_count: usize) {
        log::info!("draw_indexed: {index_count} indices");
    }
}

struct LogShader;

impl Shader for LogShader {
    fn begin(&mut self) {
        log::info!("shader begin");
    }

    fn end(&mut self) {
        log::info!("shader end");
    }

    fn set_uniform_mat4(&mut self, name: &str, _value: &Mat4) {
        log::info!("uniform {name} = <mat4>");
    }

    fn set_uniform_f32(&mut self, name: &str, value: f32) {
        log::info!("uniform {name} = {value}");
    }

    fn set_uniform_sampler(&mut self, name: &str, unit: i32) {
        log::info!("uniform {name} = unit {unit}");
    }

    fn dispose(&mut self) {
        log::info!("shader dispose");
    }
}

struct DemoTexture {
    handle: u64,
    size: u32,
}

impl Texture for DemoTexture {
    fn handle(&self) -> TextureHandle {
        TextureHandle(self.handle)
    }

    fn width(&self) -> u32 {
        self.size
    }

    fn height(&self) -> u32 {
        self.size
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut device = LogDevice { next_buffer: 1 };
    let mut batch = PolygonBatch::new(&mut device, 4096, 8192)?;
    batch.set_projection_matrix(
        &mut device,
        Mat4::orthographic_rh(0.0, 800.0, 0.0, 600.0, -1.0, 1.0),
    );

    let atlas = DemoTexture {
        handle: 1,
        size: 256,
    };
    let overlay = DemoTexture {
        handle: 2,
        size: 64,
    };

    batch.begin(&mut device)?;

    // A row of tinted sprites from the atlas: one render call.
    batch.set_color(Color::new(1.0, 0.9, 0.8, 1.0));
    batch.set_dark_color(Color::new(0.2, 0.0, 0.1, 0.0));
    for i in 0..32 {
        batch.draw_region(
            &mut device,
            &atlas,
            TextureRegion::from_pixels(&atlas, 0, 0, 32, 32),
            i as f32 * 24.0,
            100.0,
            32.0,
            32.0,
        )?;
    }

    // Switching to the overlay texture forces one flush.
    batch.draw_region(
        &mut device,
        &overlay,
        TextureRegion::default(),
        400.0,
        300.0,
        64.0,
        64.0,
    )?;

    batch.end(&mut device)?;

    println!("render calls this session: {}", batch.render_calls());
    println!("total render calls:        {}", batch.total_render_calls());
    println!("max indices in one batch:  {}", batch.max_triangles_in_batch());

    batch.dispose(&mut device);
    Ok(())
}
