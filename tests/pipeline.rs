//! End-to-end render scenarios exercising the whole pipeline: vertex
//! stage, clipping, scan conversion, depth testing, shading and
//! shadow mapping.

use nalgebra::{Matrix4, Point3, Vector3};
use softrast::core::color::Rgba;
use softrast::pipeline::passes::{Scene, main_pass, shadow_pass};
use softrast::pipeline::renderer::Renderer;
use softrast::pipeline::shaders::VertexTransform;
use softrast::pipeline::shaders::flat::FlatShader;
use softrast::pipeline::shaders::phong::PhongShader;
use softrast::pipeline::shadow::ShadowSettings;
use softrast::scene::camera::Camera;
use softrast::scene::light::Light;
use softrast::scene::mesh::Mesh;
use softrast::scene::scene_object::{SceneObject, ShadingMode};

const BACKGROUND: Rgba = Rgba::rgb(30, 30, 40);

fn overhead_camera(distance: f32) -> Camera {
    Camera::new_perspective(
        Point3::new(0.0, distance, 0.0),
        Point3::origin(),
        // Looking straight down, so up cannot be Y.
        Vector3::z(),
        45.0_f32.to_radians(),
        1.0,
        0.1,
        distance * 10.0,
    )
}

fn render_flat_cube(camera_distance: f32) -> Renderer {
    let size = 64;
    let mut renderer = Renderer::new(size, size);
    renderer.clear(BACKGROUND);

    let camera = overhead_camera(camera_distance);
    let transform = VertexTransform::new(
        &Matrix4::identity(),
        &camera.view_matrix(),
        &camera.projection_matrix(),
    );
    let shader = FlatShader::new(transform, camera.position);

    let cube = Mesh::cube(Rgba::WHITE);
    renderer.draw_mesh(&cube, &shader, None).unwrap();
    renderer
}

#[test]
fn flat_white_cube_renders_constant_color_from_any_distance() {
    let near = render_flat_cube(3.0);
    let far = render_flat_cube(12.0);

    // The pixel under the image center lies on the cube's top face in
    // both renders.
    let center_near = near.framebuffer.pixel(32, 32).unwrap();
    let center_far = far.framebuffer.pixel(32, 32).unwrap();

    assert_eq!(center_near, Rgba::WHITE);
    assert_eq!(center_far, Rgba::WHITE);
}

#[test]
fn flat_cube_top_face_is_uniformly_white() {
    let renderer = render_flat_cube(3.0);

    // Every covered pixel must be exactly white; none may blend with
    // lighting or the background.
    let mut covered = 0usize;
    for y in 0..64 {
        for x in 0..64 {
            let c = renderer.framebuffer.pixel(x, y).unwrap();
            if c != BACKGROUND {
                assert_eq!(c, Rgba::WHITE, "pixel ({x}, {y})");
                covered += 1;
            }
        }
    }
    assert!(covered > 100, "cube silhouette should cover the center");
}

#[test]
fn phong_sphere_with_no_lights_is_exactly_ambient() {
    let size = 64;
    let mut renderer = Renderer::new(size, size);
    renderer.clear(BACKGROUND);

    let camera = Camera::new_perspective(
        Point3::new(0.0, 0.0, 4.0),
        Point3::origin(),
        Vector3::y(),
        45.0_f32.to_radians(),
        1.0,
        0.1,
        100.0,
    );
    let transform = VertexTransform::new(
        &Matrix4::identity(),
        &camera.view_matrix(),
        &camera.projection_matrix(),
    );
    let mut shader = PhongShader::new(transform, camera.position, Vec::new());
    shader.ambient = 0.25;

    let base = Rgba::rgb(200, 100, 40);
    let sphere = Mesh::sphere(24, 16, base);
    renderer.draw_mesh(&sphere, &shader, None).unwrap();

    let expected = Rgba::rgb(50, 25, 10);
    let mut covered = 0usize;
    for y in 0..size {
        for x in 0..size {
            let c = renderer.framebuffer.pixel(x, y).unwrap();
            if c != BACKGROUND {
                assert_eq!(c, expected, "pixel ({x}, {y})");
                covered += 1;
            }
        }
    }
    assert!(covered > 100, "sphere should cover the center");
}

#[test]
fn depth_buffer_only_ever_moves_closer() {
    let size = 32;
    let mut renderer = Renderer::new(size, size);
    renderer.clear(BACKGROUND);

    let camera = Camera::new_perspective(
        Point3::new(0.0, 0.0, 5.0),
        Point3::origin(),
        Vector3::y(),
        45.0_f32.to_radians(),
        1.0,
        0.1,
        100.0,
    );

    let cube = Mesh::cube(Rgba::WHITE);

    // Draw the same cube three times at increasing distance from the
    // camera; after the first draw, later (farther) draws must not
    // move any depth value backwards.
    let mut previous: Option<Vec<f32>> = None;
    for z in [0.0f32, -1.0, -2.0] {
        let model = SceneObject::compose_transform(
            &Vector3::new(0.0, 0.0, z),
            &Vector3::zeros(),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let transform = VertexTransform::new(
            &model,
            &camera.view_matrix(),
            &camera.projection_matrix(),
        );
        let shader = FlatShader::new(transform, camera.position);
        renderer.draw_mesh(&cube, &shader, None).unwrap();

        let current = renderer.framebuffer.depth_plane();
        if let Some(prev) = &previous {
            for (i, (&old, &new)) in prev.iter().zip(current.iter()).enumerate() {
                assert!(
                    new <= old + 1e-6,
                    "depth at index {i} moved away: {old} -> {new}"
                );
            }
        }
        previous = Some(current);
    }
}

#[test]
fn shadow_pass_darkens_the_floor_under_an_occluder_but_never_past_half() {
    let size = 96;

    let camera = Camera::new_perspective(
        Point3::new(0.0, 6.0, 6.0),
        Point3::origin(),
        Vector3::y(),
        45.0_f32.to_radians(),
        1.0,
        0.1,
        100.0,
    );

    let floor_mesh = Mesh::plane(10.0, 10.0, Rgba::rgb(200, 200, 200));
    let mut floor = SceneObject::new(floor_mesh, Matrix4::identity());
    floor.shading = ShadingMode::Phong;
    floor.casts_shadow = false;

    let blocker_transform = SceneObject::compose_transform(
        &Vector3::new(0.0, 2.0, 0.0),
        &Vector3::zeros(),
        &Vector3::new(1.5, 0.2, 1.5),
    );
    let mut blocker = SceneObject::new(Mesh::cube(Rgba::rgb(120, 40, 40)), blocker_transform);
    blocker.shading = ShadingMode::Phong;

    let lights = vec![Light::directional(
        Vector3::new(0.0, -1.0, 0.0),
        Rgba::WHITE,
        1.0,
    )];

    let render = |with_shadow: bool| -> Renderer {
        let scene = Scene {
            objects: vec![floor.clone(), blocker.clone()],
            lights: lights.clone(),
            camera: camera.clone(),
        };

        let mut renderer = Renderer::new(size, size);
        renderer.clear(BACKGROUND);

        let map = if with_shadow {
            shadow_pass(&scene.objects, &scene.lights, &ShadowSettings::default()).unwrap()
        } else {
            None
        };
        main_pass(&renderer, &scene, map.as_ref()).unwrap();
        renderer
    };

    let lit = render(false);
    let shadowed = render(true);

    // Somewhere on the floor directly under the blocker a pixel must
    // be darker with shadows on.
    let mut found_darker = false;
    for y in 0..size {
        for x in 0..size {
            let a = lit.framebuffer.pixel(x, y).unwrap();
            let b = shadowed.framebuffer.pixel(x, y).unwrap();
            if b.r < a.r {
                found_darker = true;
                // The shadow factor floors at 0.5, and ambient is not
                // scaled at all, so a shadowed pixel keeps at least
                // the ambient term plus half the diffuse.
                assert!(b.r as f32 >= a.r as f32 * 0.5 - 2.0);
            }
        }
    }
    assert!(found_darker, "shadow pass changed nothing");
}
