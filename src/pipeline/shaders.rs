pub mod depth;
pub mod flat;
pub mod phong;
pub mod toon;

use crate::core::geometry::Vertex;
use crate::core::pipeline::Interpolatable;
use nalgebra::{Matrix4, Point3, Vector2, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Per-vertex output of the lit shaders, interpolated through clipping
/// and scan conversion.
///
/// Color channels are carried as continuous `f32` values in 0..255
/// units so that repeated lerps do not accumulate rounding error; they
/// are rounded to 8 bits once, in the fragment stage.
#[derive(Debug, Clone, Copy)]
pub struct LitVarying {
    pub world_pos: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub color: Vector4<f32>,
}

impl Add for LitVarying {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords + rhs.world_pos.coords),
            normal: self.normal + rhs.normal,
            uv: self.uv + rhs.uv,
            color: self.color + rhs.color,
        }
    }
}

impl Mul<f32> for LitVarying {
    type Output = Self;

    fn mul(self, t: f32) -> Self {
        Self {
            world_pos: Point3::from(self.world_pos.coords * t),
            normal: self.normal * t,
            uv: self.uv * t,
            color: self.color * t,
        }
    }
}

impl Interpolatable for LitVarying {
    fn world_pos(&self) -> Option<Point3<f32>> {
        Some(self.world_pos)
    }

    fn world_normal(&self) -> Option<Vector3<f32>> {
        Some(self.normal)
    }
}

/// The shared vertex stage: model/view/projection transform plus
/// world-space attribute setup, used by every lit shader.
#[derive(Debug, Clone)]
pub struct VertexTransform {
    model: Matrix4<f32>,
    mvp: Matrix4<f32>,
}

impl VertexTransform {
    pub fn new(model: &Matrix4<f32>, view: &Matrix4<f32>, projection: &Matrix4<f32>) -> Self {
        Self {
            model: *model,
            mvp: projection * view * model,
        }
    }

    /// Transforms one vertex into clip space and builds its varying.
    ///
    /// The normal is transformed by the model matrix directly rather
    /// than its inverse-transpose, which is exact only for rotations
    /// and uniform scale. Kept that way on purpose: correcting it
    /// would change the rendered output under non-uniform scale.
    pub fn apply(&self, vertex: &Vertex) -> (Vector4<f32>, LitVarying) {
        let model_pos = vertex.position.to_homogeneous();
        let world_pos = self.model * model_pos;
        let clip_pos = self.mvp * model_pos;

        let world_normal = (self.model * vertex.normal.to_homogeneous()).xyz();
        let world_normal = if world_normal.norm() > 1e-6 {
            world_normal.normalize()
        } else {
            world_normal
        };

        let varying = LitVarying {
            world_pos: Point3::new(world_pos.x, world_pos.y, world_pos.z),
            normal: world_normal,
            uv: vertex.texcoord,
            color: vertex.color.to_vec(),
        };

        (clip_pos, varying)
    }
}
