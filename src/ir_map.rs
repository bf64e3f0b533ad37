//! Format-agnostic map model handed to the renderer.

use crate::gid::{TileId, TilePlacement};
use macroquad::prelude::*;

/// Canonical, format-agnostic map.
#[derive(Debug, Clone)]
pub struct IrMap {
    /// Map grid cell width in pixels. Informational: quads are sized by
    /// their tileset's tile size.
    pub tile_w: u32,
    /// Map grid cell height in pixels. Informational, like `tile_w`.
    pub tile_h: u32,
    /// Tilesets in declaration order; gid lookup takes the first match
    pub tilesets: Vec<IrTileset>,
    /// Tile layers; draw order is array order
    pub layers: Vec<IrLayer>,
}

impl IrMap {
    /// Finds a layer by name, returning its index in draw order.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }
}

/// One image atlas with a regular grid.
#[derive(Debug, Clone)]
pub struct IrTileset {
    /// Gid of the tileset's local index 0
    pub first_gid: u32,
    /// Atlas image path, already resolved against the declaring file
    pub image: String,
    /// Tile width in pixels
    pub tile_w: u32,
    /// Tile height in pixels
    pub tile_h: u32,
    /// Number of tiles in the atlas
    pub tilecount: u32,
    /// Explicit column count; `None` derives it from the atlas width
    pub columns: Option<u32>,
    /// Pixels between adjacent tiles, 0 if not used
    pub spacing: u32,
    /// Pixels around the tile grid, 0 if not used
    pub margin: u32,
    /// Per-tile metadata, only for tiles that carry any
    pub tiles: Vec<IrTileMetadata>,
}

/// Metadata attached to a single tile of a tileset.
#[derive(Debug, Clone, Default)]
pub struct IrTileMetadata {
    /// Local index inside the tileset
    pub id: u32,
    /// Animation frames, empty when the tile is static
    pub animation: Vec<IrFrame>,
}

/// One step of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrFrame {
    /// Local index shown during this frame
    pub tile_id: u32,
    /// Frame duration in milliseconds
    pub duration: u32,
}

/// Layer payloads the renderer understands.
#[derive(Debug, Clone)]
pub enum IrLayerKind {
    /// Row-major grid of raw gids (flip flags included)
    Tiles {
        /// Columns in the grid
        width: usize,
        /// Rows in the grid
        height: usize,
        /// Raw gids, `width * height` entries
        data: Vec<u32>,
    },
}

/// A named layer of the map.
#[derive(Debug, Clone)]
pub struct IrLayer {
    /// Layer name, assumed unique within the map
    pub name: String,
    /// Whether the layer is drawn by whole-map draws
    pub visible: bool,
    /// World offset for this layer
    pub offset: Vec2,
    /// Layer contents
    pub kind: IrLayerKind,
}

impl IrLayer {
    /// Every cell of the layer in row-major order, empty cells included.
    pub fn placements(&self) -> impl Iterator<Item = TilePlacement> + '_ {
        let IrLayerKind::Tiles { width, data, .. } = &self.kind;
        let width = (*width).max(1);
        data.iter().enumerate().map(move |(idx, raw)| {
            TilePlacement::from_raw((idx % width) as u32, (idx / width) as u32, TileId(*raw))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gid::{Flip, FLIP_V};

    fn layer(width: usize, data: Vec<u32>) -> IrLayer {
        IrLayer {
            name: "ground".into(),
            visible: true,
            offset: Vec2::ZERO,
            kind: IrLayerKind::Tiles {
                width,
                height: data.len() / width,
                data,
            },
        }
    }

    #[test]
    fn placements_walk_row_major() {
        let l = layer(3, vec![1, 0, 2, 3, FLIP_V | 4, 0]);
        let cells: Vec<(u32, u32, u32)> = l.placements().map(|p| (p.col, p.row, p.gid)).collect();
        assert_eq!(
            cells,
            vec![(0, 0, 1), (1, 0, 0), (2, 0, 2), (0, 1, 3), (1, 1, 4), (2, 1, 0)]
        );
        let flipped = l.placements().nth(4).expect("fifth cell");
        assert_eq!(flipped.flip, Flip::new(false, true, false));
    }
}
