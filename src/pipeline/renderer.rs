use crate::core::color::Rgba;
use crate::core::framebuffer::FrameBuffer;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::shadow::ShadowMap;
use crate::scene::mesh::Mesh;
use log::debug;

/// Owns a framebuffer and a rasterizer; drives whole meshes through
/// the pipeline.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.framebuffer.clear(color);
    }

    /// Renders one mesh: runs the vertex stage once per vertex, then
    /// dispatches every triangle to the rasterizer.
    ///
    /// Index bounds are validated up front so the hot loop can index
    /// directly.
    pub fn draw_mesh<S: Shader>(
        &self,
        mesh: &Mesh,
        shader: &S,
        shadow: Option<&ShadowMap>,
    ) -> Result<(), String> {
        mesh.validate()?;

        let transformed: Vec<_> = mesh.vertices.iter().map(|v| shader.vertex(v)).collect();

        for triangle in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            );

            let clip_coords = [transformed[i0].0, transformed[i1].0, transformed[i2].0];
            let varyings = [transformed[i0].1, transformed[i1].1, transformed[i2].1];

            self.rasterizer
                .draw_triangle(&self.framebuffer, shader, &clip_coords, &varyings, shadow);
        }

        debug!("drew mesh with {} triangles", mesh.triangle_count());
        Ok(())
    }
}
