use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use crate::core::pipeline::{Interpolatable, Shader};
use nalgebra::{Matrix4, Vector4};
use std::ops::{Add, Mul};

/// Varying of the depth-only pass. Carries nothing: the pass only
/// needs interpolated depth, which the rasterizer computes from the
/// clip-space positions.
#[derive(Debug, Clone, Copy)]
pub struct DepthVarying;

impl Add for DepthVarying {
    type Output = Self;

    fn add(self, _rhs: Self) -> Self {
        DepthVarying
    }
}

impl Mul<f32> for DepthVarying {
    type Output = Self;

    fn mul(self, _t: f32) -> Self {
        DepthVarying
    }
}

impl Interpolatable for DepthVarying {}

/// Depth-only shader used to build the shadow map from the light's
/// point of view. Reports no camera position, so nothing is backface
/// culled: shadow casters must occlude with both sides.
pub struct DepthShader {
    light_mvp: Matrix4<f32>,
}

impl DepthShader {
    pub fn new(model: &Matrix4<f32>, light_view_projection: &Matrix4<f32>) -> Self {
        Self {
            light_mvp: light_view_projection * model,
        }
    }
}

impl Shader for DepthShader {
    type Varying = DepthVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, DepthVarying) {
        (self.light_mvp * vertex.position.to_homogeneous(), DepthVarying)
    }

    fn fragment(&self, _varying: DepthVarying, _shadow_factor: f32) -> Rgba {
        Rgba::BLACK
    }
}
