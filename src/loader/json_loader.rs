//! Tiled JSON decoding into [`IrMap`].

use crate::error::MapError;
use crate::ir_map::*;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    offsetx: f32,
    #[serde(default)]
    offsety: f32,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" or "group"
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTilesetRef {
    External {
        firstgid: u32,
        source: String,
    },
    Embedded {
        firstgid: u32,
        #[serde(flatten)]
        tileset: JsonTileset,
    },
}

#[derive(Deserialize)]
struct JsonMap {
    tilewidth: u32,
    tileheight: u32,
    layers: Vec<JsonLayer>,
    tilesets: Vec<JsonTilesetRef>,
}

#[derive(Deserialize)]
struct JsonTileset {
    tilewidth: u32,
    tileheight: u32,
    tilecount: u32,
    #[serde(default)]
    columns: u32,
    image: String,
    #[serde(default)]
    spacing: u32,
    #[serde(default)]
    margin: u32,
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize)]
struct JsonTile {
    id: u32,
    #[serde(default)]
    animation: Vec<JsonFrame>,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: u32,
    duration: u32,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn parent_dir(p: &Path) -> PathBuf {
    p.parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"))
}

/// Appends the tile layers under `layers` to `out`, walking into groups.
/// Offsets accumulate and a layer is visible only if every enclosing group is.
fn flatten_layers(
    layers: Vec<JsonLayer>,
    offset: Vec2,
    visible: bool,
    out: &mut Vec<IrLayer>,
) -> Result<(), MapError> {
    for l in layers {
        let l_offset = offset + vec2(l.offsetx, l.offsety);
        let l_visible = visible && l.visible;
        match l.kind.as_deref().unwrap_or("tilelayer") {
            "tilelayer" => {
                if l.data.len() != l.width * l.height {
                    return Err(MapError::InvalidMap(format!(
                        "Layer '{}' has {} cells, expected {}x{}",
                        l.name,
                        l.data.len(),
                        l.width,
                        l.height
                    )));
                }
                out.push(IrLayer {
                    name: l.name,
                    visible: l_visible,
                    offset: l_offset,
                    kind: IrLayerKind::Tiles {
                        width: l.width,
                        height: l.height,
                        data: l.data,
                    },
                });
            }
            "group" => flatten_layers(l.layers, l_offset, l_visible, out)?,
            other => {
                tracing::debug!(layer = %l.name, kind = other, "skipping non-tile layer");
            }
        }
    }
    Ok(())
}

fn tileset_to_ir(first_gid: u32, ts: JsonTileset, image_dir: &Path) -> Result<IrTileset, MapError> {
    if ts.tilewidth == 0 || ts.tileheight == 0 {
        return Err(MapError::InvalidMap(format!(
            "Tileset '{}' has a zero tile size",
            ts.image
        )));
    }

    Ok(IrTileset {
        first_gid,
        image: image_dir.join(&ts.image).to_string_lossy().into_owned(),
        tile_w: ts.tilewidth,
        tile_h: ts.tileheight,
        tilecount: ts.tilecount,
        // Tiled writes 0 for tilesets without a grid; derive in that case
        columns: Some(ts.columns).filter(|c| *c > 0),
        spacing: ts.spacing,
        margin: ts.margin,
        tiles: ts
            .tiles
            .into_iter()
            .map(|tile| IrTileMetadata {
                id: tile.id,
                animation: tile
                    .animation
                    .into_iter()
                    .map(|f| IrFrame {
                        tile_id: f.tileid,
                        duration: f.duration,
                    })
                    .collect(),
            })
            .collect(),
    })
}

/// Decodes a Tiled JSON map (and its external JSON tilesets) into an [`IrMap`].
///
/// Returns the map together with the directory the map file lives in.
pub fn decode_map_file_to_ir(path: &str) -> Result<(IrMap, PathBuf), MapError> {
    let p = Path::new(path);
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Map file must be a JSON file: {path}"
        )));
    }

    let j: JsonMap = read_json(p)?;
    let map_dir = parent_dir(p);

    // Tileset order is kept as declared: gid resolution takes the first match
    let mut ir_tilesets = Vec::with_capacity(j.tilesets.len());
    for ts in j.tilesets {
        let tileset = match ts {
            JsonTilesetRef::External { firstgid, source } => {
                if !source.ends_with(".json") {
                    return Err(MapError::InvalidMap(format!(
                        "External tileset must be JSON: {}",
                        source
                    )));
                }
                let ts_path = map_dir.join(&source);
                let ext: JsonTileset = read_json(&ts_path)?;
                tileset_to_ir(firstgid, ext, &parent_dir(&ts_path))?
            }
            JsonTilesetRef::Embedded { firstgid, tileset } => {
                tileset_to_ir(firstgid, tileset, &map_dir)?
            }
        };
        ir_tilesets.push(tileset);
    }

    let mut ir_layers = Vec::with_capacity(j.layers.len());
    flatten_layers(j.layers, Vec2::ZERO, true, &mut ir_layers)?;

    Ok((
        IrMap {
            tile_w: j.tilewidth,
            tile_h: j.tileheight,
            tilesets: ir_tilesets,
            layers: ir_layers,
        },
        map_dir,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gid::FLIP_H;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tiled_anim_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn parses_external_tileset_with_animation() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::create_dir_all(dir.join("sets")).expect("failed to create sets dir");

        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            {
              "type":"tilelayer",
              "name":"ground",
              "width":2,
              "height":2,
              "offsetx": 4,
              "offsety": 8,
              "data":[1,0,0,2147483650]
            },
            { "type":"objectgroup", "name":"spawns", "objects":[] }
          ],
          "tilesets":[{"firstgid":1,"source":"sets/water.json"}]
        }"#;

        let tileset_json = r#"{
          "tilewidth":16,
          "tileheight":16,
          "tilecount":4,
          "columns":0,
          "image":"water.png",
          "margin":3,
          "spacing":1,
          "tiles":[
            { "id":0, "animation":[{"tileid":0,"duration":100},{"tileid":1,"duration":200}] },
            { "id":2 }
          ]
        }"#;

        fs::write(&map_path, map_json).expect("failed to write map");
        fs::write(dir.join("sets/water.json"), tileset_json).expect("failed to write tileset");

        let (ir, base) = decode_map_file_to_ir(map_path.to_str().expect("path utf8")).expect("decode");
        assert_eq!(base, dir);

        assert_eq!(ir.layers.len(), 1);
        let ground = &ir.layers[0];
        assert_eq!(ground.offset, vec2(4.0, 8.0));
        let IrLayerKind::Tiles { data, .. } = &ground.kind;
        assert_eq!(data[3], FLIP_H | 2);

        let ts = &ir.tilesets[0];
        assert_eq!(ts.columns, None);
        assert_eq!((ts.margin, ts.spacing), (3, 1));
        assert_eq!(
            Path::new(&ts.image),
            dir.join("sets").join("water.png").as_path()
        );
        assert_eq!(
            ts.tiles[0].animation,
            vec![
                IrFrame { tile_id: 0, duration: 100 },
                IrFrame { tile_id: 1, duration: 200 }
            ]
        );
        assert!(ts.tiles[1].animation.is_empty());
    }

    #[test]
    fn parses_embedded_tilesets_in_declared_order() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 8,
          "tileheight": 8,
          "layers": [],
          "tilesets":[
            {"firstgid":50,"tilewidth":8,"tileheight":8,"tilecount":10,"columns":5,"image":"b.png"},
            {"firstgid":1,"tilewidth":8,"tileheight":8,"tilecount":20,"columns":4,"image":"a.png"}
          ]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let (ir, _) = decode_map_file_to_ir(map_path.to_str().expect("path utf8")).expect("decode");
        let firsts: Vec<u32> = ir.tilesets.iter().map(|t| t.first_gid).collect();
        assert_eq!(firsts, vec![50, 1]);
        assert_eq!(ir.tilesets[0].columns, Some(5));
        assert_eq!(Path::new(&ir.tilesets[1].image), dir.join("a.png").as_path());
    }

    #[test]
    fn out_of_range_gids_are_left_for_the_renderer() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            {"type":"tilelayer","name":"ground","width":1,"height":1,"data":[99]}
          ],
          "tilesets":[{"firstgid":1,"tilewidth":16,"tileheight":16,"tilecount":1,"columns":1,"image":"t.png"}]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let (ir, _) = decode_map_file_to_ir(map_path.to_str().expect("path utf8")).expect("decode");
        assert_eq!(ir.layers[0].placements().next().map(|p| p.gid), Some(99));
    }

    #[test]
    fn group_layers_are_flattened_with_their_offset_and_visibility() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            {"type":"tilelayer","name":"ground","width":1,"height":1,"data":[1]},
            {
              "type":"group",
              "name":"decor",
              "offsetx": 10,
              "offsety": 20,
              "layers": [
                {"type":"tilelayer","name":"trees","width":1,"height":1,"offsetx":1,"offsety":2,"data":[1]},
                {
                  "type":"group",
                  "name":"inner",
                  "visible": false,
                  "layers": [
                    {"type":"tilelayer","name":"fog","width":1,"height":1,"data":[1]}
                  ]
                }
              ]
            }
          ],
          "tilesets":[{"firstgid":1,"tilewidth":16,"tileheight":16,"tilecount":1,"columns":1,"image":"t.png"}]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let (ir, _) = decode_map_file_to_ir(map_path.to_str().expect("path utf8")).expect("decode");
        let names: Vec<&str> = ir.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["ground", "trees", "fog"]);
        assert_eq!(ir.layers[1].offset, vec2(11.0, 22.0));
        assert!(ir.layers[1].visible);
        assert_eq!(ir.layers[2].offset, vec2(10.0, 20.0));
        assert!(!ir.layers[2].visible);
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        fs::write(&map_path, "{ not json").expect("failed to write map");

        let err = decode_map_file_to_ir(map_path.to_str().expect("path utf8"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_tileset_file() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [],
          "tilesets":[{"firstgid":1,"source":"missing_tileset.json"}]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let err = decode_map_file_to_ir(map_path.to_str().expect("path utf8"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn rejects_layer_with_wrong_cell_count() {
        let dir = temp_dir();
        let map_path = dir.join("map.json");
        let map_json = r#"{
          "tilewidth": 16,
          "tileheight": 16,
          "layers": [
            {"type":"tilelayer","name":"oops","width":2,"height":2,"data":[1,2,3]}
          ],
          "tilesets":[]
        }"#;
        fs::write(&map_path, map_json).expect("failed to write map");

        let err = decode_map_file_to_ir(map_path.to_str().expect("path utf8"))
            .err()
            .expect("expected decode error");
        assert!(matches!(err, MapError::InvalidMap(msg) if msg.contains("oops")));
    }

    #[test]
    fn rejects_non_json_map_path() {
        let err = decode_map_file_to_ir("level.tmx").err().expect("expected error");
        assert!(matches!(err, MapError::InvalidMap(_)));
    }
}
