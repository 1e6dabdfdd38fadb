use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mirra_core::{load_scene, presets, SceneFile};
use mirra_tracer::{render, render_parallel, Camera, RenderConfig, DEFAULT_BUCKET_SIZE, MAX_BOUNCES};

/// Render a sphere scene with mirror reflections to a PNG.
#[derive(Parser, Debug)]
#[command(name = "mirra", version)]
struct Args {
    /// JSON scene file. Without one, a built-in preset is rendered.
    scene: Option<PathBuf>,

    /// Built-in scene to render when no file is given
    #[arg(long, default_value = "demo")]
    preset: String,

    /// Output image path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Override the image width
    #[arg(long)]
    width: Option<u32>,

    /// Override the image height
    #[arg(long)]
    height: Option<u32>,

    /// Override the scene's reflection bounce limit
    #[arg(short, long)]
    bounces: Option<u32>,

    /// Bucket edge length for parallel rendering
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    bucket_size: u32,

    /// Render on the calling thread only
    #[arg(long)]
    serial: bool,

    /// Apply gamma 2.0 when writing the image
    #[arg(long)]
    gamma: bool,
}

/// Load the requested scene and apply command line overrides.
fn load(args: &Args) -> Result<SceneFile> {
    let mut file = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene file given, using preset '{}'", args.preset);
            presets::by_name(&args.preset).with_context(|| {
                format!("Available presets: {}", presets::NAMES.join(", "))
            })?
        }
    };

    if let Some(width) = args.width {
        file.camera.width = width;
    }
    if let Some(height) = args.height {
        file.camera.height = height;
    }
    if let Some(bounces) = args.bounces {
        if bounces > MAX_BOUNCES {
            log::warn!(
                "Bounce limit {} is above the compiled maximum, {} will be used",
                bounces,
                MAX_BOUNCES
            );
        }
        file.scene.bounce_limit = bounces;
    }

    Ok(file)
}

fn run(args: Args) -> Result<()> {
    let file = load(&args)?;
    if file.camera.width == 0 || file.camera.height == 0 {
        anyhow::bail!(
            "Image size must be non-zero, got {}x{}",
            file.camera.width,
            file.camera.height
        );
    }

    let camera = Camera::from_settings(&file.camera);
    let config = RenderConfig {
        bucket_size: args.bucket_size,
        gamma_correct: args.gamma,
    };

    log::info!(
        "Rendering {}x{}, {} spheres, {} lights, bounce limit {}",
        camera.image_width,
        camera.image_height,
        file.scene.spheres.len(),
        file.scene.lights.len(),
        file.scene.bounce_limit.min(MAX_BOUNCES)
    );

    let buffer = if args.serial {
        render(&camera, &file.scene)
    } else {
        render_parallel(&camera, &file.scene, &config)
    };

    let rgba = image::RgbaImage::from_raw(
        buffer.width,
        buffer.height,
        buffer.to_rgba(config.gamma_correct),
    )
    .context("Image buffer size does not match its dimensions")?;
    rgba.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    // Info by default, RUST_LOG still wins
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    run(Args::parse())
}
