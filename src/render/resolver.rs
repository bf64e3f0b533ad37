//! Global tile id to (tileset, local index) resolution and per-tile metadata.

use crate::error::MapError;
use crate::ir_map::{IrMap, IrTileset};
use crate::render::animation::Animation;
use crate::render::atlas::{AtlasId, AtlasRegistry};
use crate::render::texcoords::{derive_columns, TileGrid};
use std::collections::HashMap;
use std::sync::Arc;

/// Index of a tileset in map declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilesetId(pub usize);

/// A tileset with its atlas bound, columns resolved and animations validated.
#[derive(Debug, Clone)]
pub struct ResolvedTileset {
    pub first_gid: u32,
    pub tilecount: u32,
    pub atlas: AtlasId,
    pub grid: TileGrid,
    animations: HashMap<u32, Arc<Animation>>,
}

impl ResolvedTileset {
    fn new<T>(ts: &IrTileset, atlases: &AtlasRegistry<T>) -> Result<Self, MapError> {
        let atlas = atlases
            .id_of(&ts.image)
            .ok_or_else(|| MapError::UnknownAtlas(ts.image.clone()))?;
        // id_of succeeded, so the atlas is present
        let width = atlases.get(atlas).map(|a| a.width).unwrap_or(0);
        let columns = match ts.columns {
            Some(0) => {
                return Err(MapError::InvalidAtlasGeometry {
                    atlas: ts.image.clone(),
                    width,
                    margin: ts.margin,
                    spacing: ts.spacing,
                    tile_width: ts.tile_w,
                })
            }
            Some(c) => c,
            None => derive_columns(&ts.image, width, ts.margin, ts.spacing, ts.tile_w)?,
        };

        let mut animations = HashMap::new();
        for tile in ts.tiles.iter().filter(|t| !t.animation.is_empty()) {
            let anim = Animation::new(tile.animation.clone()).map_err(|_| {
                MapError::DegenerateAnimation {
                    tileset: Some(ts.first_gid),
                    tile: Some(tile.id),
                }
            })?;
            animations.insert(tile.id, Arc::new(anim));
        }

        Ok(Self {
            first_gid: ts.first_gid,
            tilecount: ts.tilecount,
            atlas,
            grid: TileGrid {
                tile_w: ts.tile_w,
                tile_h: ts.tile_h,
                margin: ts.margin,
                spacing: ts.spacing,
                columns,
            },
            animations,
        })
    }

    #[inline]
    fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tilecount
    }

    /// Animation attached to local tile `local`, if any.
    #[inline]
    pub fn animation(&self, local: u32) -> Option<&Arc<Animation>> {
        self.animations.get(&local)
    }

    pub fn animated_tiles(&self) -> usize {
        self.animations.len()
    }
}

/// Maps global tile ids to their tileset and local index.
#[derive(Debug, Clone)]
pub struct TilesetResolver {
    tilesets: Vec<ResolvedTileset>,
}

impl TilesetResolver {
    /// Binds every tileset of `map` to its atlas in `atlases`.
    ///
    /// Fails on a missing atlas, an explicit column count of zero, an atlas
    /// too narrow for one column, or an animation whose frame durations sum
    /// to zero.
    pub fn new<T>(map: &IrMap, atlases: &AtlasRegistry<T>) -> Result<Self, MapError> {
        let tilesets = map
            .tilesets
            .iter()
            .map(|ts| ResolvedTileset::new(ts, atlases))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tilesets })
    }

    /// Owning tileset and local index of `gid`; `None` for `0` or ids outside
    /// every tileset. Tilesets are scanned in declaration order and the first
    /// range containing `gid` wins.
    #[inline]
    pub fn resolve(&self, gid: u32) -> Option<(TilesetId, u32)> {
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .position(|ts| ts.contains(gid))
            .map(|i| (TilesetId(i), gid - self.tilesets[i].first_gid))
    }

    #[inline]
    pub fn tileset(&self, id: TilesetId) -> &ResolvedTileset {
        &self.tilesets[id.0]
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }
}
