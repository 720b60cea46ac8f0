use crate::core::color::Rgba;
use crate::io::obj_loader::load_obj;
use crate::pipeline::passes::Scene;
use crate::pipeline::shadow::ShadowSettings;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::{MaterialParams, SceneObject, ShadingMode};
use log::info;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    #[serde(default)]
    pub wireframe: bool,

    // --- Shadow system ---
    #[serde(default = "default_true")]
    pub use_shadows: bool,
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: usize,
    #[serde(default = "default_shadow_ortho_size")]
    pub shadow_ortho_size: f32,
    #[serde(default = "default_shadow_bias")]
    pub shadow_bias: f32,
    #[serde(default = "default_pcf_radius")]
    pub pcf_radius: i32,
    #[serde(default = "default_shadow_strength")]
    pub shadow_strength: f32,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_camera_up")]
    pub up: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    /// "directional", "point" or "spot".
    pub r#type: String,
    pub direction: Option<[f32; 3]>,
    pub position: Option<[f32; 3]>,
    #[serde(default = "default_light_color")]
    pub color: [u8; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_range")]
    pub range: f32,
    /// Spot cone half-angle.
    #[serde(default = "default_spot_angle")]
    pub angle_degrees: f32,
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    /// "cube", "sphere", "plane" or "triangle". Ignored when `path`
    /// points at an OBJ file.
    pub primitive: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [u8; 3],
    #[serde(default = "default_shading")]
    pub shading: String,
    #[serde(default = "default_true")]
    pub casts_shadow: bool,

    // Sphere / plane parameters.
    #[serde(default = "default_slices")]
    pub slices: u32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    #[serde(default = "default_plane_size")]
    pub plane_size: [f32; 2],

    // Optional lighting coefficient overrides.
    pub ambient: Option<f32>,
    pub diffuse: Option<f32>,
    pub specular: Option<f32>,
    pub shininess: Option<f32>,
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_output() -> String {
    "render.png".to_string()
}
fn default_background() -> [u8; 3] {
    [30, 30, 40]
}
fn default_true() -> bool {
    true
}
fn default_shadow_map_size() -> usize {
    512
}
fn default_shadow_ortho_size() -> f32 {
    10.0
}
fn default_shadow_bias() -> f32 {
    0.005
}
fn default_pcf_radius() -> i32 {
    2
}
fn default_shadow_strength() -> f32 {
    0.7
}
fn default_camera_position() -> [f32; 3] {
    [0.0, 3.0, 8.0]
}
fn default_camera_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_light_color() -> [u8; 3] {
    [255, 255, 255]
}
fn default_intensity() -> f32 {
    1.0
}
fn default_range() -> f32 {
    10.0
}
fn default_spot_angle() -> f32 {
    30.0
}
fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_shading() -> String {
    "phong".to_string()
}
fn default_slices() -> u32 {
    16
}
fn default_stacks() -> u32 {
    16
}
fn default_plane_size() -> [f32; 2] {
    [10.0, 10.0]
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            background: default_background(),
            wireframe: false,
            use_shadows: true,
            shadow_map_size: default_shadow_map_size(),
            shadow_ortho_size: default_shadow_ortho_size(),
            shadow_bias: default_shadow_bias(),
            pcf_radius: default_pcf_radius(),
            shadow_strength: default_shadow_strength(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_camera_up(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

pub fn load_config(path: &str) -> Result<Config, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config '{}': {}", path, e))?;
    let config: Config =
        toml::from_str(&content).map_err(|e| format!("Failed to parse config '{}': {}", path, e))?;
    info!(
        "Loaded config: {} lights, {} objects",
        config.lights.len(),
        config.objects.len()
    );
    Ok(config)
}

fn vec3(v: &[f32; 3]) -> Vector3<f32> {
    Vector3::new(v[0], v[1], v[2])
}

fn point3(v: &[f32; 3]) -> Point3<f32> {
    Point3::new(v[0], v[1], v[2])
}

fn rgb3(c: &[u8; 3]) -> Rgba {
    Rgba::rgb(c[0], c[1], c[2])
}

impl LightConfig {
    pub fn to_light(&self) -> Result<Light, String> {
        let color = rgb3(&self.color);
        match self.r#type.as_str() {
            "directional" => {
                let direction = self
                    .direction
                    .ok_or("directional light requires a direction")?;
                Ok(Light::directional(vec3(&direction), color, self.intensity))
            }
            "point" => {
                let position = self.position.ok_or("point light requires a position")?;
                Ok(Light::point(
                    point3(&position),
                    color,
                    self.intensity,
                    self.range,
                ))
            }
            "spot" => {
                let position = self.position.ok_or("spot light requires a position")?;
                let direction = self.direction.ok_or("spot light requires a direction")?;
                Ok(Light::spot(
                    point3(&position),
                    vec3(&direction),
                    color,
                    self.intensity,
                    self.range,
                    self.angle_degrees.to_radians(),
                ))
            }
            other => Err(format!("Unknown light type: '{}'", other)),
        }
    }
}

impl ObjectConfig {
    fn build_mesh(&self) -> Result<Mesh, String> {
        if let Some(path) = &self.path {
            return load_obj(path);
        }

        let color = rgb3(&self.color);
        match self.primitive.as_deref() {
            Some("cube") => Ok(Mesh::cube(color)),
            Some("sphere") => Ok(Mesh::sphere(self.slices, self.stacks, color)),
            Some("plane") => Ok(Mesh::plane(self.plane_size[0], self.plane_size[1], color)),
            Some("triangle") => Ok(Mesh::triangle(color)),
            Some(other) => Err(format!("Unknown primitive: '{}'", other)),
            None => Err("object needs either a 'primitive' or a 'path'".to_string()),
        }
    }

    fn shading_mode(&self) -> Result<ShadingMode, String> {
        match self.shading.as_str() {
            "flat" => Ok(ShadingMode::Flat),
            "phong" => Ok(ShadingMode::Phong),
            "toon" => Ok(ShadingMode::Toon),
            other => Err(format!("Unknown shading mode: '{}'", other)),
        }
    }

    pub fn to_scene_object(&self) -> Result<SceneObject, String> {
        let mesh = self.build_mesh()?;
        let transform = SceneObject::compose_transform(
            &vec3(&self.position),
            &vec3(&self.rotation),
            &vec3(&self.scale),
        );

        let mut object = SceneObject::new(mesh, transform);
        object.shading = self.shading_mode()?;
        object.casts_shadow = self.casts_shadow;
        object.material = MaterialParams {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.shininess,
        };
        Ok(object)
    }
}

impl Config {
    pub fn shadow_settings(&self) -> ShadowSettings {
        ShadowSettings {
            size: self.render.shadow_map_size,
            extent: self.render.shadow_ortho_size,
            bias: self.render.shadow_bias,
            pcf_radius: self.render.pcf_radius,
            strength: self.render.shadow_strength,
        }
    }

    pub fn build_camera(&self) -> Camera {
        let aspect = self.render.width as f32 / self.render.height as f32;
        Camera::new_perspective(
            point3(&self.camera.position),
            point3(&self.camera.target),
            vec3(&self.camera.up),
            self.camera.fov_degrees.to_radians(),
            aspect,
            self.camera.near,
            self.camera.far,
        )
    }

    pub fn build_scene(&self) -> Result<Scene, String> {
        let lights = self
            .lights
            .iter()
            .map(|l| l.to_light())
            .collect::<Result<Vec<_>, _>>()?;
        let objects = self
            .objects
            .iter()
            .map(|o| o.to_scene_object())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scene {
            objects,
            lights,
            camera: self.build_camera(),
        })
    }
}
