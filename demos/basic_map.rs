use macroquad::prelude::*;
use macroquad_tiled_anim::{MapRenderer, RendererConfig, Screen};

// ❶ Override the default 800 × 450 pixels here
fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 1280, // ← any size you like
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)] // ❷ pass the window config function here
async fn main() {
    let mut map = MapRenderer::load("assets/map.json", RendererConfig::default())
        .await
        .expect("Failed to load map");
    let mut screen = Screen::new();

    loop {
        clear_background(BLACK);

        map.update_animations();
        map.draw(&mut screen);

        // Draw the frame rate in the top-right corner
        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}
