use crate::core::color::Rgba;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::VertexTransform;
use crate::pipeline::shaders::depth::DepthShader;
use crate::pipeline::shaders::flat::FlatShader;
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::shaders::toon::ToonShader;
use crate::pipeline::shadow::{ShadowMap, ShadowSettings, light_view_projection};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::scene_object::{MaterialParams, SceneObject, ShadingMode};
use log::{info, warn};
use nalgebra::Point3;

/// Everything one frame renders: placed objects, lights and the camera.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub camera: Camera,
}

/// Distance at which a virtual shadow caster stands in for a
/// directional light, which has no position of its own.
const DIRECTIONAL_CASTER_DISTANCE: f32 = 20.0;

/// Position the shadow pass renders from: the first light that has one,
/// or a virtual position backed off along a directional light's rays.
fn shadow_caster_position(lights: &[Light]) -> Option<Point3<f32>> {
    let light = lights.first()?;
    match light {
        Light::Directional { direction, .. } => {
            Some(Point3::origin() - direction * DIRECTIONAL_CASTER_DISTANCE)
        }
        _ => light.position(),
    }
}

/// Depth-only pass over every shadow caster, from the first light's
/// point of view. Returns `None` when there is nothing to cast from
/// (no lights, or shadows disabled upstream).
pub fn shadow_pass(
    objects: &[SceneObject],
    lights: &[Light],
    settings: &ShadowSettings,
) -> Result<Option<ShadowMap>, String> {
    let Some(light_pos) = shadow_caster_position(lights) else {
        warn!("shadow pass skipped: no light to cast from");
        return Ok(None);
    };

    let light_matrix = light_view_projection(&light_pos, settings);

    let mut depth_renderer = Renderer::new(settings.size, settings.size);
    depth_renderer.clear(Rgba::BLACK);

    let mut casters = 0usize;
    for object in objects.iter().filter(|o| o.casts_shadow) {
        let shader = DepthShader::new(&object.transform, &light_matrix);
        depth_renderer.draw_mesh(&object.mesh, &shader, None)?;
        casters += 1;
    }
    info!(
        "shadow pass: {} casters into {}x{} map",
        casters, settings.size, settings.size
    );

    Ok(Some(ShadowMap::from_depth_pass(
        &depth_renderer.framebuffer,
        light_matrix,
        settings,
    )))
}

/// Main pass: draws every object with the shader its shading mode
/// selects, sampling the shadow map if one was produced.
pub fn main_pass(
    renderer: &Renderer,
    scene: &Scene,
    shadow: Option<&ShadowMap>,
) -> Result<(), String> {
    let view = scene.camera.view_matrix();
    let projection = scene.camera.projection_matrix();

    for object in &scene.objects {
        let transform = VertexTransform::new(&object.transform, &view, &projection);

        let m = &object.material;
        match object.shading {
            ShadingMode::Flat => {
                let shader = FlatShader::new(transform, scene.camera.position);
                renderer.draw_mesh(&object.mesh, &shader, shadow)?;
            }
            ShadingMode::Phong => {
                let mut shader =
                    PhongShader::new(transform, scene.camera.position, scene.lights.clone());
                apply_material(
                    m,
                    &mut shader.ambient,
                    &mut shader.diffuse,
                    &mut shader.specular,
                    &mut shader.shininess,
                );
                renderer.draw_mesh(&object.mesh, &shader, shadow)?;
            }
            ShadingMode::Toon => {
                let mut shader =
                    ToonShader::new(transform, scene.camera.position, scene.lights.clone());
                apply_material(
                    m,
                    &mut shader.ambient,
                    &mut shader.diffuse,
                    &mut shader.specular,
                    &mut shader.shininess,
                );
                renderer.draw_mesh(&object.mesh, &shader, shadow)?;
            }
        }
    }

    Ok(())
}

fn apply_material(
    m: &MaterialParams,
    ambient: &mut f32,
    diffuse: &mut f32,
    specular: &mut f32,
    shininess: &mut f32,
) {
    if let Some(v) = m.ambient {
        *ambient = v;
    }
    if let Some(v) = m.diffuse {
        *diffuse = v;
    }
    if let Some(v) = m.specular {
        *specular = v;
    }
    if let Some(v) = m.shininess {
        *shininess = v;
    }
}
