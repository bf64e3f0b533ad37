// tests/load_tests.rs

use macroquad_tiled_anim::{
    decode_map_file_to_ir, AnimationClock, AtlasRegistry, MapError, MapRenderer, RendererConfig,
};
use std::fs;
use std::path::PathBuf;

fn temp_map(name: &str, json: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("mq_tiled_anim_{}_{}", name, std::process::id()));
    fs::create_dir_all(&path).unwrap();
    path.push("map.json");
    fs::write(&path, json).unwrap();
    path
}

const WATER_MAP: &str = r#"
{
  "tilewidth": 16,
  "tileheight": 16,
  "layers": [
    { "type": "tilelayer", "name": "ground", "width": 3, "height": 1, "data": [1, 2, 0] },
    { "type": "tilelayer", "name": "water", "width": 2, "height": 1, "data": [3, 3] }
  ],
  "tilesets": [
    {
      "firstgid": 1, "tilewidth": 16, "tileheight": 16, "tilecount": 6,
      "image": "tiles.png", "margin": 3, "spacing": 1,
      "tiles": [
        { "id": 2, "animation": [ {"tileid": 2, "duration": 100}, {"tileid": 5, "duration": 200} ] }
      ]
    }
  ]
}
"#;

#[test]
fn integration_decoded_map_feeds_the_renderer() {
    let path = temp_map("water", WATER_MAP);
    let (ir, base) = decode_map_file_to_ir(path.to_str().unwrap()).expect("decode");

    // 56px wide atlas with margin 3 and spacing 1 holds three 16px columns
    let mut atlases = AtlasRegistry::new();
    let image = base.join("tiles.png").to_string_lossy().into_owned();
    atlases.insert(image, (), 56, 39);

    let mut renderer =
        MapRenderer::with_clock(ir, atlases, AnimationClock::manual(), RendererConfig::default())
            .expect("renderer");

    let water = renderer.layer_batch("water").unwrap();
    assert_eq!(water.quad_count(), 2);
    assert_eq!(water.animated().len(), 2);

    let ground = renderer.layer_batch("ground").unwrap();
    assert_eq!(ground.quad_count(), 2);
    assert!(ground.animated().is_empty());

    fs::remove_file(&path).unwrap();
}

#[test]
fn integration_zero_duration_animation_fails_at_construction() {
    let json = WATER_MAP.replace("\"duration\": 100", "\"duration\": 0")
        .replace("\"duration\": 200", "\"duration\": 0");
    let path = temp_map("degenerate", &json);
    let (ir, base) = decode_map_file_to_ir(path.to_str().unwrap()).expect("decode");

    let mut atlases = AtlasRegistry::new();
    atlases.insert(base.join("tiles.png").to_string_lossy().into_owned(), (), 56, 39);

    let err = MapRenderer::with_clock(ir, atlases, AnimationClock::manual(), RendererConfig::default())
        .err()
        .expect("expected construction error");
    assert!(matches!(
        err,
        MapError::DegenerateAnimation { tileset: Some(1), tile: Some(2) }
    ));
    fs::remove_file(&path).unwrap();
}

#[test]
fn integration_unsupported_format() {
    let err = decode_map_file_to_ir("foo.tmx").unwrap_err();
    match err {
        MapError::InvalidMap(msg) => assert!(msg.contains("foo.tmx")),
        other => panic!("expected InvalidMap, got {:?}", other),
    }
}
