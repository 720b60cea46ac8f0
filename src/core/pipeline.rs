use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use nalgebra::{Point3, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Per-vertex data that is linearly interpolated across a triangle.
///
/// `Add` and `Mul<f32>` must act uniformly on every field so that the
/// clipper's lerp-by-t and the rasterizer's barycentric blend produce
/// consistent attributes.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
    /// World-space position, when the varying carries one. The
    /// rasterizer uses it for backface culling, the slope-scaled depth
    /// bias and shadow-map lookup.
    fn world_pos(&self) -> Option<Point3<f32>> {
        None
    }

    /// World-space normal, when the varying carries one.
    fn world_normal(&self) -> Option<Vector3<f32>> {
        None
    }
}

/// The programmable stages of the pipeline.
///
/// Implementations must be `Send + Sync`: fragments are shaded
/// concurrently across rows.
pub trait Shader: Send + Sync {
    type Varying: Interpolatable;

    /// Vertex stage: transform a mesh vertex into homogeneous clip
    /// space and produce the varying to interpolate.
    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Fragment stage: compute the pixel color from the interpolated
    /// varying and the shadow visibility factor in [0, 1] (1 = fully
    /// lit).
    fn fragment(&self, varying: Self::Varying, shadow_factor: f32) -> Rgba;

    /// Camera position in world space, when the shader knows it.
    /// Required for backface culling; shaders without one (the
    /// depth-only shadow shader) render unculled.
    fn camera_position(&self) -> Option<Point3<f32>> {
        None
    }
}
