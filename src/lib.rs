#![warn(missing_docs)]

//! Batched Tiled map renderer for Macroquad, with animated tiles.
//!
//! Tile layers are turned into one vertex batch per atlas image. Animated
//! tiles keep a back-reference into their batch so each frame only their
//! texture coordinates are rewritten.

mod config;
mod error;
#[allow(missing_docs)]
mod gid;
mod ir_map;
mod loader {
    pub mod json_loader;
}
mod map;
#[allow(missing_docs)]
mod render;

pub use config::RendererConfig;
pub use error::MapError;
pub use gid::{Flip, TileId, TilePlacement, FLIP_D, FLIP_H, FLIP_V, GID_MASK};
pub use ir_map::{IrFrame, IrLayer, IrLayerKind, IrMap, IrTileMetadata, IrTileset};
pub use loader::json_loader::decode_map_file_to_ir;
pub use map::MapRenderer;
pub use render::animation::{current_local_index, Animation, AnimationClock};
pub use render::atlas::{Atlas, AtlasId, AtlasRegistry};
pub use render::batch::{AnimatedEntry, LayerBatch, TileVertex};
pub use render::resolver::{ResolvedTileset, TilesetId, TilesetResolver};
pub use render::target::{DrawTarget, Screen};
pub use render::texcoords::{compute_tex_coords, derive_columns, TexRect, TileGrid};
