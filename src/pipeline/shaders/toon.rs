use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use crate::pipeline::shaders::{LitVarying, VertexTransform};
use crate::scene::light::Light;
use nalgebra::{Point3, Vector4};

/// Cel shading: the Phong light loop with banded diffuse, binary
/// specular, stepped shadows and a view-angle silhouette outline.
pub struct ToonShader {
    transform: VertexTransform,
    camera_pos: Point3<f32>,
    pub lights: Vec<Light>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    /// Number of diffuse bands.
    pub levels: u32,
    pub outline_threshold: f32,
    pub outline_color: Rgba,
    pub enable_outline: bool,
}

impl ToonShader {
    pub fn new(
        transform: VertexTransform,
        camera_pos: Point3<f32>,
        lights: Vec<Light>,
    ) -> Self {
        Self {
            transform,
            camera_pos,
            lights,
            ambient: 0.2,
            diffuse: 0.8,
            specular: 0.5,
            shininess: 32.0,
            levels: 4,
            outline_threshold: 0.3,
            outline_color: Rgba::BLACK,
            enable_outline: true,
        }
    }
}

/// Near-horizontal normals (ground planes) get finer bands and a much
/// tighter outline threshold, otherwise flat floors band coarsely and
/// outline all over.
fn is_horizontal(normal: &nalgebra::Vector3<f32>) -> bool {
    normal.y.abs() > 0.99
}

impl Shader for ToonShader {
    type Varying = LitVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, LitVarying) {
        self.transform.apply(vertex)
    }

    fn fragment(&self, varying: LitVarying, shadow_factor: f32) -> Rgba {
        let base = Rgba::from_vec(varying.color);
        let normal = if varying.normal.norm() > 1e-6 {
            varying.normal.normalize()
        } else {
            varying.normal
        };
        let view_dir = (self.camera_pos - varying.world_pos).normalize();

        if self.enable_outline {
            let edge_factor = normal.dot(&view_dir);
            let threshold = if is_horizontal(&normal) {
                0.05
            } else {
                self.outline_threshold
            };
            if edge_factor < threshold {
                return self.outline_color;
            }
        }

        let mut result = base * self.ambient;

        for light in &self.lights {
            let attenuation = light.attenuation(&varying.world_pos);
            if attenuation <= 0.0 {
                continue;
            }
            let light_dir = light.direction_to(&varying.world_pos);

            let mut diffuse_factor = normal.dot(&light_dir).max(0.0);
            if diffuse_factor > 0.0 {
                let bands = if is_horizontal(&normal) {
                    (self.levels + 2) as f32
                } else {
                    self.levels as f32
                };
                diffuse_factor = (diffuse_factor * bands).ceil() / bands;
            }
            let diffuse =
                base * (diffuse_factor * self.diffuse * light.intensity() * attenuation);

            let specular = if diffuse_factor > 0.0 {
                let reflect_dir = normal * (2.0 * normal.dot(&light_dir)) - light_dir;
                let specular_factor = view_dir.dot(&reflect_dir).max(0.0).powf(self.shininess);
                // Hard highlight: fully on or fully off.
                let specular_factor = if specular_factor > 0.7 { 1.0 } else { 0.0 };
                Rgba::WHITE
                    * (specular_factor * self.specular * light.intensity() * attenuation)
            } else {
                Rgba::BLACK
            };

            let diffuse = diffuse.modulate(light.color());
            let specular = specular.modulate(light.color());

            // Shadows band as well, so a shadow edge reads as a clean
            // boundary instead of a gradient.
            let stepped_shadow = if is_horizontal(&normal) {
                if shadow_factor < 0.8 { 0.4 } else { 1.0 }
            } else if shadow_factor < 0.75 {
                0.5
            } else {
                1.0
            };

            result = result + diffuse * stepped_shadow + specular * stepped_shadow;
        }

        result
    }

    fn camera_position(&self) -> Option<Point3<f32>> {
        Some(self.camera_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Vector2, Vector3};

    fn shader_with(lights: Vec<Light>) -> ToonShader {
        let id = Matrix4::identity();
        ToonShader::new(
            VertexTransform::new(&id, &id, &id),
            Point3::new(0.0, 0.0, 5.0),
            lights,
        )
    }

    fn varying(normal: Vector3<f32>, color: Rgba) -> LitVarying {
        LitVarying {
            world_pos: Point3::origin(),
            normal,
            uv: Vector2::zeros(),
            color: color.to_vec(),
        }
    }

    #[test]
    fn grazing_normals_return_the_outline_color() {
        let mut shader = shader_with(Vec::new());
        shader.outline_color = Rgba::rgb(10, 0, 30);
        // Normal perpendicular to the view direction: edge factor 0.
        let v = varying(Vector3::x(), Rgba::WHITE);
        assert_eq!(shader.fragment(v, 1.0), Rgba::rgb(10, 0, 30));
    }

    #[test]
    fn outline_can_be_disabled() {
        let mut shader = shader_with(Vec::new());
        shader.enable_outline = false;
        shader.ambient = 0.25;
        let v = varying(Vector3::x(), Rgba::rgb(200, 100, 40));
        assert_eq!(shader.fragment(v, 1.0), Rgba::rgb(50, 25, 10));
    }

    #[test]
    fn diffuse_is_quantized_into_bands() {
        let light = Light::directional(Vector3::new(0.0, 0.0, -1.0), Rgba::WHITE, 1.0);
        let shader = shader_with(vec![light]);

        // Two normals whose raw N.L values differ but land in the same
        // band of 4 must shade identically.
        let near_a = Vector3::new(0.1, 0.0, 1.0).normalize();
        let near_b = Vector3::new(0.2, 0.0, 1.0).normalize();
        let va = varying(near_a, Rgba::rgb(100, 100, 100));
        let vb = varying(near_b, Rgba::rgb(100, 100, 100));
        assert_eq!(shader.fragment(va, 1.0), shader.fragment(vb, 1.0));
    }

    #[test]
    fn partial_shadow_steps_to_a_discrete_multiplier() {
        let light = Light::directional(Vector3::new(0.0, 0.0, -1.0), Rgba::WHITE, 1.0);
        let shader = shader_with(vec![light]);
        let v = varying(Vector3::z(), Rgba::rgb(100, 100, 100));

        // Every factor below the step threshold lands on the same
        // output; at or above it, the fragment is fully lit.
        let deep = shader.fragment(v, 0.5);
        let mid = shader.fragment(v, 0.6);
        let lit = shader.fragment(v, 1.0);
        assert_eq!(deep, mid);
        assert!(deep.r < lit.r);
        assert_eq!(shader.fragment(v, 0.75), lit);
    }
}
