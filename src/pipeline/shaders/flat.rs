use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use crate::pipeline::shaders::{LitVarying, VertexTransform};
use nalgebra::{Point3, Vector4};

/// Unlit shader: no lighting, no shadows.
///
/// With the default white `color` the interpolated vertex color passes
/// through unchanged; any other value overrides the whole surface with
/// that constant.
pub struct FlatShader {
    transform: VertexTransform,
    camera_pos: Point3<f32>,
    pub color: Rgba,
}

impl FlatShader {
    pub fn new(transform: VertexTransform, camera_pos: Point3<f32>) -> Self {
        Self {
            transform,
            camera_pos,
            color: Rgba::WHITE,
        }
    }
}

impl Shader for FlatShader {
    type Varying = LitVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, LitVarying) {
        self.transform.apply(vertex)
    }

    fn fragment(&self, varying: LitVarying, _shadow_factor: f32) -> Rgba {
        if self.color == Rgba::WHITE {
            Rgba::from_vec(varying.color)
        } else {
            self.color
        }
    }

    fn camera_position(&self) -> Option<Point3<f32>> {
        Some(self.camera_pos)
    }
}
