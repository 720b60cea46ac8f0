use crate::core::color::Rgba;
use nalgebra::{Point3, Vector2, Vector3};

/// A single mesh vertex. Immutable during rendering.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in model space.
    pub position: Point3<f32>,
    /// Normal vector for lighting.
    pub normal: Vector3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Base vertex color.
    pub color: Rgba,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>, color: Rgba) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color,
        }
    }
}
