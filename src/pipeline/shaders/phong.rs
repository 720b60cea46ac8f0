use crate::core::color::Rgba;
use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use crate::pipeline::shaders::{LitVarying, VertexTransform};
use crate::scene::light::Light;
use nalgebra::{Point3, Vector4};

/// Classic ambient + diffuse + specular lighting with a reflection-
/// vector specular term.
pub struct PhongShader {
    transform: VertexTransform,
    camera_pos: Point3<f32>,
    pub lights: Vec<Light>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
}

impl PhongShader {
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
            diffuse: 0.7,
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

impl Shader for PhongShader {
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

        let mut result = base * self.ambient;

        for light in &self.lights {
            let attenuation = light.attenuation(&varying.world_pos);
            if attenuation <= 0.0 {
                continue;
            }
            let light_dir = light.direction_to(&varying.world_pos);

            let diffuse_factor = normal.dot(&light_dir).max(0.0);
            let diffuse =
                base * (diffuse_factor * self.diffuse * light.intensity() * attenuation);

            // Highlights sit on a white base so the albedo does not
            // tint them.
            let specular = if diffuse_factor > 0.0 {
                let reflect_dir = normal * (2.0 * normal.dot(&light_dir)) - light_dir;
                let specular_factor = view_dir.dot(&reflect_dir).max(0.0).powf(self.shininess);
                Rgba::WHITE
                    * (specular_factor * self.specular * light.intensity() * attenuation)
            } else {
                Rgba::BLACK
            };

            // Shadows dim the directional terms only; ambient stays.
            let diffuse = diffuse.modulate(light.color()) * shadow_factor;
            let specular = specular.modulate(light.color()) * shadow_factor;

            result = result + diffuse + specular;
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

    fn shader_with(lights: Vec<Light>) -> PhongShader {
        let id = Matrix4::identity();
        PhongShader::new(
            VertexTransform::new(&id, &id, &id),
            Point3::new(0.0, 0.0, 5.0),
            lights,
        )
    }

    fn varying_at_origin(color: Rgba) -> LitVarying {
        LitVarying {
            world_pos: Point3::origin(),
            normal: Vector3::y(),
            uv: Vector2::zeros(),
            color: color.to_vec(),
        }
    }

    #[test]
    fn no_lights_leaves_exactly_the_ambient_term() {
        let mut shader = shader_with(Vec::new());
        shader.ambient = 0.25;
        let out = shader.fragment(varying_at_origin(Rgba::rgb(200, 100, 40)), 1.0);
        assert_eq!(out, Rgba::rgb(50, 25, 10));
    }

    #[test]
    fn overhead_light_brightens_an_upward_normal() {
        let light = Light::directional(Vector3::new(0.0, -1.0, 0.0), Rgba::WHITE, 1.0);
        let shader = shader_with(vec![light]);
        let base = Rgba::rgb(100, 100, 100);

        let lit = shader.fragment(varying_at_origin(base), 1.0);
        let ambient_only = base * shader.ambient;
        assert!(lit.r > ambient_only.r);
        assert!(lit.g > ambient_only.g);
    }

    #[test]
    fn light_facing_away_contributes_nothing() {
        // Light travelling upward hits the underside of an up-facing
        // surface: N.L <= 0, so only ambient remains.
        let light = Light::directional(Vector3::new(0.0, 1.0, 0.0), Rgba::WHITE, 1.0);
        let shader = shader_with(vec![light]);
        let base = Rgba::rgb(100, 100, 100);

        let out = shader.fragment(varying_at_origin(base), 1.0);
        assert_eq!(out, base * shader.ambient);
    }

    #[test]
    fn shadow_factor_scales_diffuse_but_not_ambient() {
        let light = Light::directional(Vector3::new(0.0, -1.0, 0.0), Rgba::WHITE, 1.0);
        let shader = shader_with(vec![light]);
        let base = Rgba::rgb(100, 100, 100);

        let lit = shader.fragment(varying_at_origin(base), 1.0);
        let shadowed = shader.fragment(varying_at_origin(base), 0.5);
        let ambient_only = base * shader.ambient;

        assert!(shadowed.r < lit.r);
        assert!(shadowed.r >= ambient_only.r);
    }

    #[test]
    fn light_color_tints_the_diffuse_term() {
        let red = Light::directional(Vector3::new(0.0, -1.0, 0.0), Rgba::rgb(255, 0, 0), 1.0);
        let shader = shader_with(vec![red]);
        let base = Rgba::rgb(100, 100, 100);

        let out = shader.fragment(varying_at_origin(base), 1.0);
        let ambient_only = base * shader.ambient;
        assert!(out.r > ambient_only.r);
        // Green and blue get no diffuse from a pure red light.
        assert_eq!(out.g, ambient_only.g);
        assert_eq!(out.b, ambient_only.b);
    }
}
