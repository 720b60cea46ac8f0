use crate::core::math::transform::TransformFactory;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector3};

/// Which fixed shading strategy an object is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Flat,
    Phong,
    Toon,
}

/// Per-object overrides for the lighting coefficients. `None` fields
/// keep the shader's own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialParams {
    pub ambient: Option<f32>,
    pub diffuse: Option<f32>,
    pub specular: Option<f32>,
    pub shininess: Option<f32>,
}

/// A mesh placed in the world. The transform is per-object draw state
/// handed to the shader at draw time, never baked into the vertices.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    pub shading: ShadingMode,
    pub material: MaterialParams,
    /// Whether the object renders into the shadow map.
    pub casts_shadow: bool,
}

impl SceneObject {
    pub fn new(mesh: Mesh, transform: Matrix4<f32>) -> Self {
        Self {
            mesh,
            transform,
            shading: ShadingMode::Phong,
            material: MaterialParams::default(),
            casts_shadow: true,
        }
    }

    /// Builds the model matrix from translation, rotation (degrees,
    /// XYZ order) and scale, matching the config file layout.
    pub fn compose_transform(
        position: &Vector3<f32>,
        rotation_deg: &Vector3<f32>,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        TransformFactory::translation(position)
            * TransformFactory::rotation_z(rotation_deg.z.to_radians())
            * TransformFactory::rotation_y(rotation_deg.y.to_radians())
            * TransformFactory::rotation_x(rotation_deg.x.to_radians())
            * TransformFactory::scaling(scale)
    }
}
