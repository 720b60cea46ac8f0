pub mod camera;
pub mod light;
pub mod mesh;
pub mod scene_object;
pub mod texture;
