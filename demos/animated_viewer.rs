use anyhow::Context;
use clap::Parser;
use macroquad::prelude::*;
use macroquad_tiled_anim::{MapRenderer, RendererConfig, Screen};
use tracing_subscriber::EnvFilter;

/// Plays back a Tiled JSON map with its animated tiles.
#[derive(Parser, Debug)]
struct Args {
    /// Map file to open
    #[arg(default_value = "assets/map.json")]
    map: String,
    /// Draw only this layer
    #[arg(long)]
    layer: Option<String>,
    /// Animation speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Sample atlases with linear filtering instead of nearest
    #[arg(long)]
    linear: bool,
    /// Leave out layers marked invisible
    #[arg(long)]
    skip_hidden: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Animated Tiles".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = RendererConfig {
        texture_filter: if args.linear {
            FilterMode::Linear
        } else {
            FilterMode::Nearest
        },
        animation_speed: args.speed,
        skip_hidden_layers: args.skip_hidden,
        ..RendererConfig::default()
    };
    let mut map = MapRenderer::load(&args.map, config)
        .await
        .with_context(|| format!("Loading map {}", args.map))?;
    let mut screen = Screen::new();
    let mut paused = false;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
            let speed = if paused { 0.0 } else { args.speed };
            map.clock_mut().set_speed(speed);
            tracing::info!(paused, "toggled animations");
        }

        clear_background(BLACK);

        map.update_animations();
        match &args.layer {
            Some(name) => map.draw_layer(&mut screen, name)?,
            None => map.draw(&mut screen),
        }

        draw_text(
            &format!("t = {} ms  [space] pause", map.clock().elapsed_ms()),
            20.0,
            30.0,
            24.0,
            WHITE,
        );

        next_frame().await;
    }
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("macroquad_tiled_anim=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}
