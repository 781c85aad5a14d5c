//! Prism - render a scene file to a PNG.
//!
//! Usage: prism <scene.json> [-o out.png] [--width W --height H] [--frames N]

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use prism_core::{load_scene, save_scene};
use prism_renderer::{Camera, RenderSettings, Renderer};

#[derive(Parser)]
#[command(name = "prism", version, about = "Progressive CPU path tracer")]
struct Cli {
    /// Scene file (JSON)
    scene: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Fraction of the viewport resolution to trace
    #[arg(long, default_value_t = 1.0)]
    render_scale: f32,

    /// Progressive frames to accumulate
    #[arg(long, default_value_t = 64)]
    frames: u32,

    #[arg(long, default_value_t = RenderSettings::default().max_bounces)]
    max_bounces: u32,

    /// Keep only the last frame instead of averaging
    #[arg(long)]
    no_accumulate: bool,

    /// Jitter primary ray origins
    #[arg(long)]
    jitter: bool,

    #[arg(long, default_value_t = 0)]
    seed: u32,

    /// Write the camera, sky, materials and lights back to this scene file
    #[arg(long)]
    save_scene: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let loaded = load_scene(&cli.scene).with_context(|| format!("Failed to load scene {}", cli.scene.display()))?;

    let settings = RenderSettings {
        render_scale: cli.render_scale,
        max_bounces: cli.max_bounces,
        accumulate: !cli.no_accumulate,
        jitter: cli.jitter,
        seed: cli.seed,
    };
    let mut renderer = Renderer::new(settings);
    let (width, height) = renderer.scaled_size(cli.width, cli.height);
    if width == 0 || height == 0 {
        return Err(anyhow!("Image size {}x{} is empty", width, height));
    }

    let mut camera = Camera::new(&loaded.camera);
    camera.on_resize(width, height);
    renderer.resize(width, height).context("Failed to allocate render buffers")?;

    info!(
        "Rendering {} frames at {}x{} ({} bounces)",
        cli.frames, width, height, settings.max_bounces
    );
    let start = Instant::now();
    for _ in 0..cli.frames {
        renderer.render(&loaded.scene, &camera)?;
    }
    info!("Rendered {} frames in {:.2?}", renderer.frame_index(), start.elapsed());

    let image = image::RgbaImage::from_raw(width, height, renderer.to_rgba_bytes())
        .ok_or_else(|| anyhow!("Render buffer does not match {}x{}", width, height))?;
    image
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!("Wrote {}", cli.output.display());

    if let Some(path) = &cli.save_scene {
        save_scene(path, &loaded.scene, camera.config())
            .with_context(|| format!("Failed to save scene {}", path.display()))?;
    }

    Ok(())
}
