use clap::Parser;
use log::{error, info};
use nalgebra::{Point3, Vector3};
use softrast::core::color::Rgba;
use softrast::io::config::{Config, load_config};
use softrast::io::image::save_buffer_to_image;
use softrast::pipeline::passes::{Scene, main_pass, shadow_pass};
use softrast::pipeline::renderer::Renderer;
use softrast::scene::camera::Camera;
use softrast::scene::light::Light;
use softrast::scene::mesh::Mesh;
use softrast::scene::scene_object::{SceneObject, ShadingMode};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "softrast", about = "Software rasterizer with shadow mapping")]
struct Args {
    /// TOML scene description. Renders a built-in demo scene when
    /// omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Output PNG path (overrides the config).
    #[arg(short, long)]
    output: Option<String>,

    /// Render width in pixels (overrides the config).
    #[arg(long)]
    width: Option<usize>,

    /// Render height in pixels (overrides the config).
    #[arg(long)]
    height: Option<usize>,

    /// Draw triangle edges only.
    #[arg(long)]
    wireframe: bool,

    /// Skip the shadow pass.
    #[arg(long)]
    no_shadows: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(output) = &args.output {
        config.render.output = output.clone();
    }
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.wireframe {
        config.render.wireframe = true;
    }
    if args.no_shadows {
        config.render.use_shadows = false;
    }

    let scene = if args.config.is_some() {
        config.build_scene()?
    } else {
        info!("No config given, rendering the built-in demo scene");
        demo_scene(&config)
    };

    let mut renderer = Renderer::new(config.render.width, config.render.height);
    renderer.rasterizer.wireframe = config.render.wireframe;

    let bg = config.render.background;
    renderer.clear(Rgba::rgb(bg[0], bg[1], bg[2]));

    let shadow_map = if config.render.use_shadows {
        shadow_pass(&scene.objects, &scene.lights, &config.shadow_settings())?
    } else {
        None
    };

    main_pass(&renderer, &scene, shadow_map.as_ref())?;

    let buffer = renderer.framebuffer.color_plane();
    save_buffer_to_image(
        &buffer,
        config.render.width,
        config.render.height,
        &config.render.output,
    )?;
    info!("Saved render to {}", config.render.output);

    Ok(())
}

/// A small showcase: a toon cube and a Phong sphere over a plane, lit
/// by a warm directional light plus a cool point fill.
fn demo_scene(config: &Config) -> Scene {
    let aspect = config.render.width as f32 / config.render.height as f32;
    let camera = Camera::new_perspective(
        Point3::new(4.0, 4.0, 8.0),
        Point3::new(0.0, 0.5, 0.0),
        Vector3::y(),
        45.0_f32.to_radians(),
        aspect,
        0.1,
        100.0,
    );

    let lights = vec![
        Light::directional(Vector3::new(-0.4, -1.0, -0.3), Rgba::rgb(255, 244, 214), 1.2),
        Light::point(Point3::new(-4.0, 3.0, 2.0), Rgba::rgb(80, 90, 200), 1.5, 15.0),
    ];

    let mut floor = SceneObject::new(
        Mesh::plane(12.0, 12.0, Rgba::rgb(180, 180, 190)),
        SceneObject::compose_transform(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &Vector3::new(1.0, 1.0, 1.0),
        ),
    );
    floor.casts_shadow = false;

    let mut cube = SceneObject::new(
        Mesh::cube(Rgba::rgb(220, 80, 70)),
        SceneObject::compose_transform(
            &Vector3::new(-1.5, 1.0, 0.0),
            &Vector3::new(0.0, 25.0, 0.0),
            &Vector3::new(1.0, 1.0, 1.0),
        ),
    );
    cube.shading = ShadingMode::Toon;

    let sphere = SceneObject::new(
        Mesh::sphere(24, 16, Rgba::rgb(90, 170, 220)),
        SceneObject::compose_transform(
            &Vector3::new(1.5, 1.0, 0.5),
            &Vector3::zeros(),
            &Vector3::new(1.0, 1.0, 1.0),
        ),
    );

    Scene {
        objects: vec![floor, cube, sphere],
        lights,
        camera,
    }
}
